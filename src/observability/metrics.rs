//! Metrics collection and exposition.
//!
//! # Metrics
//! - `account_sync_fetch_total` (counter): fetches by op, outcome
//! - `account_sync_stale_commits_total` (counter): results dropped as superseded
//! - `account_sync_detail_fanout` (histogram): detail lookups per history refresh
//! - `account_sync_generation` (gauge): latest generation issued
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_fetch(op: &'static str, outcome: &'static str) {
    counter!("account_sync_fetch_total", "op" => op, "outcome" => outcome).increment(1);
}

pub fn record_stale_commit(op: &'static str) {
    counter!("account_sync_stale_commits_total", "op" => op).increment(1);
}

pub fn record_detail_fanout(count: usize) {
    histogram!("account_sync_detail_fanout").record(count as f64);
}

pub fn record_generation(generation: u64) {
    gauge!("account_sync_generation").set(generation as f64);
}
