//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with a single catch-all handler
//! - Wire up middleware (tracing, limits, timeout, request ID)
//! - Bind server to listener
//! - Hand decoded requests to the request router on the blocking pool
//! - Record per-request metrics

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::request::InboundRequest;
use crate::http::response::OutboundResponse;
use crate::observability::metrics;
use crate::registry::RegistryStore;
use crate::routing::envelope::{ErrorPayload, MSG_INTERNAL};
use crate::routing::{RequestRouter, Route};
use crate::security::headers::apply_default_headers;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<RequestRouter>,
    pub max_body_size: usize,
}

/// HTTP front end for the registry service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server backed by `store`.
    pub fn new(config: ServiceConfig, store: Arc<RegistryStore>) -> Self {
        let state = AppState {
            router: Arc::new(RequestRouter::new(store)),
            max_body_size: config.security.max_body_size,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::map_response(with_default_headers))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown requested, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Covers responses produced by the limit and timeout layers too.
async fn with_default_headers(mut response: Response) -> Response {
    apply_default_headers(response.headers_mut());
    response
}

/// Decode the request, run the router off the async workers, encode the result.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let route = Route::resolve(request.method(), request.uri().path());

    let inbound = match InboundRequest::from_http(request, state.max_body_size).await {
        Ok(inbound) => inbound,
        Err(e) => {
            tracing::warn!(route = route.name(), error = %e, "Request body rejected");
            metrics::record_request(route.name(), StatusCode::PAYLOAD_TOO_LARGE.as_u16(), start_time);
            return OutboundResponse::json(
                StatusCode::PAYLOAD_TOO_LARGE,
                &ErrorPayload::new("Request body too large"),
            )
            .into_response();
        }
    };
    let request_id = inbound.request_id().to_string();

    let router = Arc::clone(&state.router);
    let response = match tokio::task::spawn_blocking(move || router.handle(&inbound)).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Request handler failed");
            OutboundResponse::json(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorPayload::new(MSG_INTERNAL),
            )
        }
    };

    tracing::debug!(
        request_id = %request_id,
        route = route.name(),
        status = response.status.as_u16(),
        "Request handled"
    );
    metrics::record_request(route.name(), response.status.as_u16(), start_time);
    response.into_response()
}
