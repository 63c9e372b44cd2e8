//! Metrics collection and exposition.
//!
//! # Metrics
//! - `auth_requests_total` (counter): requests by route, status
//! - `auth_request_duration_seconds` (histogram): latency by route
//! - `auth_registrations_total` (counter): registration outcomes
//! - `auth_logins_total` (counter): login outcomes
//! - `registry_users` (gauge): registered users
//! - `registry_load_anomalies_total` (counter): unusable registry files by kind
//! - `registry_persist_failures_total` (counter): failed registry writes
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(route: &'static str, status: u16, start: Instant) {
    counter!(
        "auth_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("auth_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_registration(outcome: &'static str) {
    counter!("auth_registrations_total", "outcome" => outcome).increment(1);
}

pub fn record_login(outcome: &'static str) {
    counter!("auth_logins_total", "outcome" => outcome).increment(1);
}

pub fn record_registry_size(users: usize) {
    gauge!("registry_users").set(users as f64);
}

pub fn record_load_anomaly(kind: &'static str) {
    counter!("registry_load_anomalies_total", "kind" => kind).increment(1);
}

pub fn record_persist_failure() {
    counter!("registry_persist_failures_total").increment(1);
}
