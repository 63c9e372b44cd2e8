//! Dispatch table from (method, path) to handled operation.

use axum::http::Method;

pub const STATUS_PATH: &str = "/api/status";
pub const REGISTER_PATH: &str = "/api/register";
pub const LOGIN_PATH: &str = "/api/login";

/// The operation a request dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `OPTIONS` on any path: headers only, no store access.
    Preflight,
    /// `GET /api/status`.
    Status,
    /// `POST /api/register`.
    Register,
    /// `POST /api/login`.
    Login,
    /// Anything else.
    NotFound,
}

impl Route {
    /// Resolve a request line. Paths match exactly and case-sensitively.
    pub fn resolve(method: &Method, path: &str) -> Self {
        if *method == Method::OPTIONS {
            return Route::Preflight;
        }
        match (method, path) {
            (&Method::GET, STATUS_PATH) => Route::Status,
            (&Method::POST, REGISTER_PATH) => Route::Register,
            (&Method::POST, LOGIN_PATH) => Route::Login,
            _ => Route::NotFound,
        }
    }

    /// Label for logs and metrics.
    pub fn name(self) -> &'static str {
        match self {
            Route::Preflight => "preflight",
            Route::Status => "status",
            Route::Register => "register",
            Route::Login => "login",
            Route::NotFound => "not_found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_table() {
        let cases = [
            (Method::OPTIONS, "/anything", Route::Preflight),
            (Method::OPTIONS, "/api/login", Route::Preflight),
            (Method::GET, "/api/status", Route::Status),
            (Method::POST, "/api/register", Route::Register),
            (Method::POST, "/api/login", Route::Login),
            (Method::GET, "/api/register", Route::NotFound),
            (Method::POST, "/api/status", Route::NotFound),
            (Method::PUT, "/api/login", Route::NotFound),
            (Method::GET, "/", Route::NotFound),
            (Method::POST, "/api/login/", Route::NotFound),
            (Method::POST, "/API/LOGIN", Route::NotFound),
        ];

        for (method, path, expected) in cases {
            assert_eq!(Route::resolve(&method, path), expected, "{method} {path}");
        }
    }
}
