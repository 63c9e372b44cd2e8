//! Inbound request representation.
//!
//! # Responsibilities
//! - Decode an HTTP request into method, path, headers and a buffered body
//! - Expose the request ID assigned by the request-ID layer
//!
//! # Design Decisions
//! - The router sees only `InboundRequest`, never framework types
//! - The body is buffered up to the configured limit before routing

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, HeaderName, Method, Request};

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// A decoded request, independent of the HTTP framework.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl InboundRequest {
    pub fn new(method: Method, path: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Buffer an axum request, failing if the body exceeds `limit` bytes.
    pub async fn from_http(request: Request<Body>, limit: usize) -> Result<Self, axum::Error> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, limit).await?;
        Ok(Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            headers: parts.headers,
            body,
        })
    }

    /// The request ID, or `"unknown"` if none was assigned.
    pub fn request_id(&self) -> &str {
        self.headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}
