//! Request routing subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest (method, path, body)
//!     → route.rs (resolve (method, path) → Route)
//!     → router.rs (parse JSON body, call registry store)
//!     → envelope.rs (status / auth envelope / error payload)
//!     → OutboundResponse (status, headers, body)
//! ```
//!
//! # Design Decisions
//! - Exact path matching; there are only three endpoints
//! - Registry failures are reported in-band with HTTP 200, except
//!   persistence failures which return 500
//! - Transport-agnostic: no axum extractors below this layer

pub mod envelope;
pub mod route;
pub mod router;

pub use envelope::{AuthEnvelope, ErrorPayload, StatusPayload, UserSummary};
pub use route::Route;
pub use router::{Credentials, RequestRouter, RouterError};
