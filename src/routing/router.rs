//! Request router: turns an inbound request into a response envelope.
//!
//! Stateless across requests. Each request moves through
//! `AwaitingDispatch → {Preflight, Status, Register, Login, NotFound} → Responded`;
//! every path ends in a response, never a panic or a dropped connection.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::http::request::InboundRequest;
use crate::http::response::OutboundResponse;
use crate::observability::metrics;
use crate::registry::{RegistryError, RegistryStore, UserRecord};
use crate::routing::envelope::{
    AuthEnvelope, ErrorPayload, StatusPayload, MSG_ALREADY_EXISTS, MSG_AUTHENTICATED,
    MSG_INTERNAL, MSG_INVALID_INPUT, MSG_NOT_FOUND, MSG_PERSIST_FAILED, MSG_REGISTERED,
};
use crate::routing::route::Route;

/// Errors detected before the registry is consulted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouterError {
    /// The body is not a JSON object.
    #[error("Malformed request body: {0}")]
    MalformedRequest(String),
}

/// Username and face token extracted from a request body.
///
/// Missing or non-string fields become empty strings, which the store
/// rejects as invalid input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub face_data: String,
}

impl Credentials {
    pub fn from_json(body: &[u8]) -> Result<Self, RouterError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| RouterError::MalformedRequest(e.to_string()))?;
        let Value::Object(fields) = value else {
            return Err(RouterError::MalformedRequest(
                "expected a JSON object".to_string(),
            ));
        };

        let field = |name: &str| {
            fields
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Ok(Self {
            username: field("username"),
            face_data: field("faceData"),
        })
    }
}

/// Routes decoded requests to the registry.
#[derive(Debug, Clone)]
pub struct RequestRouter {
    store: Arc<RegistryStore>,
}

impl RequestRouter {
    pub fn new(store: Arc<RegistryStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<RegistryStore> {
        &self.store
    }

    /// Handle one request.
    ///
    /// Runs registry I/O synchronously; call from a blocking context.
    pub fn handle(&self, request: &InboundRequest) -> OutboundResponse {
        let route = Route::resolve(&request.method, &request.path);
        tracing::debug!(
            request_id = %request.request_id(),
            method = %request.method,
            path = %request.path,
            route = route.name(),
            "Dispatching request"
        );

        match route {
            Route::Preflight => OutboundResponse::empty(StatusCode::OK),
            Route::Status => OutboundResponse::json(StatusCode::OK, &StatusPayload::running()),
            Route::Register => self.with_credentials(request, |c| {
                let result = self.store.register(&c.username, &c.face_data);
                metrics::record_registration(outcome(&result));
                auth_response(result, MSG_REGISTERED)
            }),
            Route::Login => self.with_credentials(request, |c| {
                let result = self.store.login(&c.username, &c.face_data);
                metrics::record_login(outcome(&result));
                auth_response(result, MSG_AUTHENTICATED)
            }),
            Route::NotFound => {
                tracing::debug!(method = %request.method, path = %request.path, "No route matched");
                OutboundResponse::empty(StatusCode::NOT_FOUND)
            }
        }
    }

    fn with_credentials<F>(&self, request: &InboundRequest, op: F) -> OutboundResponse
    where
        F: FnOnce(&Credentials) -> OutboundResponse,
    {
        match Credentials::from_json(&request.body) {
            Ok(credentials) => op(&credentials),
            Err(e) => {
                tracing::warn!(
                    request_id = %request.request_id(),
                    path = %request.path,
                    error = %e,
                    "Rejected malformed request"
                );
                OutboundResponse::json(StatusCode::OK, &ErrorPayload::new(e.to_string()))
            }
        }
    }
}

fn auth_response(result: Result<UserRecord, RegistryError>, success: &str) -> OutboundResponse {
    match result {
        Ok(record) => OutboundResponse::json(StatusCode::OK, &AuthEnvelope::success(success, &record)),
        Err(RegistryError::InvalidInput) => {
            OutboundResponse::json(StatusCode::OK, &AuthEnvelope::failure(MSG_INVALID_INPUT))
        }
        Err(RegistryError::AlreadyExists(_)) => {
            OutboundResponse::json(StatusCode::OK, &AuthEnvelope::failure(MSG_ALREADY_EXISTS))
        }
        Err(RegistryError::NotFound(_)) => {
            OutboundResponse::json(StatusCode::OK, &AuthEnvelope::failure(MSG_NOT_FOUND))
        }
        Err(RegistryError::Storage(_)) => OutboundResponse::json(
            StatusCode::INTERNAL_SERVER_ERROR,
            &AuthEnvelope::failure(MSG_PERSIST_FAILED),
        ),
        Err(e @ RegistryError::DuplicateId(_)) => {
            tracing::error!(error = %e, "Registry rejected a generated id");
            OutboundResponse::json(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorPayload::new(MSG_INTERNAL),
            )
        }
    }
}

fn outcome(result: &Result<UserRecord, RegistryError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(RegistryError::InvalidInput) => "invalid_input",
        Err(RegistryError::AlreadyExists(_)) => "already_exists",
        Err(RegistryError::NotFound(_)) => "not_found",
        Err(RegistryError::Storage(_)) | Err(RegistryError::DuplicateId(_)) => "error",
    }
}
