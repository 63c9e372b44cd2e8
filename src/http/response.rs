//! Outbound response representation.
//!
//! # Responsibilities
//! - Carry status, headers and body produced by the router
//! - Always include the JSON content type and CORS headers
//! - Convert into an axum response at the transport boundary

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::security::headers::apply_default_headers;

/// A response ready to be encoded by the transport.
#[derive(Debug, Clone)]
pub struct OutboundResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl OutboundResponse {
    /// Response with default headers and no body.
    pub fn empty(status: StatusCode) -> Self {
        let mut headers = HeaderMap::new();
        apply_default_headers(&mut headers);
        Self {
            status,
            headers,
            body: Bytes::new(),
        }
    }

    /// Response with default headers and `payload` serialized as JSON.
    pub fn json<T: Serialize>(status: StatusCode, payload: &T) -> Self {
        let mut response = Self::empty(status);
        match serde_json::to_vec(payload) {
            Ok(body) => response.body = Bytes::from(body),
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode response body");
                response.status = StatusCode::INTERNAL_SERVER_ERROR;
                response.body = Bytes::from_static(br#"{"error":"Internal server error"}"#);
            }
        }
        response
    }
}

impl IntoResponse for OutboundResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
