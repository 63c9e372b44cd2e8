//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → http/server.rs layers (body size limit, request timeout)
//!     → routing
//!
//! Outgoing response:
//!     → headers.rs (JSON content type, CORS)
//!     → client
//! ```
//!
//! # Design Decisions
//! - Request limits are enforced before the body reaches the router
//! - Handled errors never leak internal error text to clients

pub mod headers;
