//! Response header policy.
//!
//! # Responsibilities
//! - Add permissive CORS headers so browser front-ends on any origin can call the API
//! - Mark every response body as JSON
//!
//! # Design Decisions
//! - Applied to every response, including 404 and preflight
//! - Only the methods the service actually routes are advertised

use axum::http::{header, HeaderMap, HeaderValue};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Insert the JSON content type and CORS headers, replacing existing values.
pub fn apply_default_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(CONTENT_TYPE_JSON),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}
