//! Metrics collection and exposition.
//!
//! # Metrics
//! - `vts_requests_total` (counter): requests by module, status
//! - `vts_request_duration_seconds` (histogram): latency by module
//! - `vts_connections_aborted_total` (counter): connections closed without a response
//! - `vts_table_operations_total` (counter): table commands by op, outcome
//! - `vts_active_connections` (gauge): current connection count

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_request(module: &str, status: u16, started: Instant) {
    let module = module.to_string();
    metrics::counter!(
        "vts_requests_total",
        "module" => module.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("vts_request_duration_seconds", "module" => module)
        .record(started.elapsed().as_secs_f64());
}

pub fn record_table_operation(op: &str, ok: bool) {
    metrics::counter!(
        "vts_table_operations_total",
        "op" => op.to_string(),
        "outcome" => if ok { "ok" } else { "error" }
    )
    .increment(1);
}

pub fn record_connection_aborted() {
    metrics::counter!("vts_connections_aborted_total").increment(1);
}

pub fn set_active_connections(count: u64) {
    metrics::gauge!("vts_active_connections").set(count as f64);
}
