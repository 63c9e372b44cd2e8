//! Face-auth service (v1)
//!
//! Account registration and login keyed by username, with an opaque face
//! token stored per user.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌──────────────────────────────────────────────────┐
//!                   │                  FACE-AUTH SERVICE               │
//!                   │                                                  │
//!   Client Request  │  ┌─────────┐    ┌──────────────┐    ┌──────────┐ │
//!   ────────────────┼─▶│  http   │───▶│   routing    │───▶│ registry │ │
//!                   │  │ server  │    │ (dispatch +  │    │  store   │ │
//!                   │  └─────────┘    │  envelopes)  │    └────┬─────┘ │
//!   Client Response │       ▲         └──────┬───────┘         │       │
//!   ◀───────────────┼───────┴────────────────┘                 ▼       │
//!                   │                                   users.json     │
//!                   │                                   (atomic write) │
//!                   │                                                  │
//!                   │  Cross-cutting: config · observability ·         │
//!                   │                 security headers · lifecycle     │
//!                   └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use face_auth::config;
use face_auth::lifecycle::{self, Shutdown};
use face_auth::observability;

#[derive(Parser)]
#[command(name = "face-auth")]
#[command(about = "Username + face token registration and login service", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = config::load_or_default(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
        config::validation::validate_config(&config).map_err(config::ConfigError::Validation)?;
    }

    observability::logging::init_tracing(&config.observability)?;
    tracing::info!("face-auth v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        registry = %config.storage.registry_path().display(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let prepared = lifecycle::prepare(config).await?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();
    prepared
        .server
        .run(prepared.listener, shutdown.subscribe())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
