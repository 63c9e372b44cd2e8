//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::Path;

use face_auth::config::ServiceConfig;
use face_auth::lifecycle::{self, Shutdown};
use tokio::task::JoinHandle;

/// A running service bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Trigger shutdown and wait until the server, and its store, are gone.
    pub async fn stop(self) {
        self.shutdown.trigger();
        let _ = self.handle.await;
    }
}

/// Config pointing at `data_dir` with an ephemeral listener.
pub fn test_config(data_dir: &Path) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.storage.data_dir = data_dir.to_path_buf();
    config
}

pub async fn start_server(data_dir: &Path) -> TestServer {
    start_with_config(test_config(data_dir)).await
}

pub async fn start_with_config(config: ServiceConfig) -> TestServer {
    let prepared = lifecycle::prepare(config).await.unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    let addr = prepared.local_addr;
    let handle = tokio::spawn(async move {
        let _ = prepared.server.run(prepared.listener, server_shutdown).await;
    });

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

/// A client that does not keep idle connections, so shutdown drains quickly.
#[allow(dead_code)]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
