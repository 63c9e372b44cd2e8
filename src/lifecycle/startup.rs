//! Startup orchestration.
//!
//! # Responsibilities
//! - Open the registry store (data directory, lock, initial file)
//! - Bind the listener
//! - Build the HTTP server
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The store opens before the listener binds (traffic only when ready)

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::http::HttpServer;
use crate::registry::store::OpenError;
use crate::registry::RegistryStore;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to open registry: {0}")]
    Store(#[from] OpenError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },
}

/// A server whose store is open and whose listener is bound.
pub struct Prepared {
    pub server: HttpServer,
    pub listener: TcpListener,
    pub local_addr: SocketAddr,
}

/// Open the store and bind the listener described by `config`.
pub async fn prepare(config: ServiceConfig) -> Result<Prepared, StartupError> {
    let store = Arc::new(RegistryStore::open(&config.storage)?);
    tracing::info!(
        path = %store.path().display(),
        users = store.len(),
        "Registry store ready"
    );

    let address = config.listener.bind_address.clone();
    let bind_error = |source| StartupError::Bind {
        address: address.clone(),
        source,
    };
    let listener = TcpListener::bind(&address).await.map_err(bind_error)?;
    let local_addr = listener.local_addr().map_err(bind_error)?;
    tracing::info!(address = %local_addr, "Listening for connections");

    Ok(Prepared {
        server: HttpServer::new(config, store),
        listener,
        local_addr,
    })
}
