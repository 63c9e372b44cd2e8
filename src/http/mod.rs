//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware: request ID, trace, timeout, body limit)
//!     → request.rs (buffer body, build InboundRequest)
//!     → routing (dispatch, registry store)
//!     → response.rs (OutboundResponse → axum Response, default headers)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{InboundRequest, X_REQUEST_ID};
pub use response::OutboundResponse;
pub use server::HttpServer;
