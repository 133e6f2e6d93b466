//! Metrics collection and exposition.
//!
//! # Metrics
//! - `urlconf_requests_total` (counter): requests by method, status, route
//! - `urlconf_request_duration_seconds` (histogram): dispatch latency by route
//!
//! # Design Decisions
//! - Routes are labelled by name, or by pattern when unnamed, so label
//!   cardinality is bounded by the route table
//! - Unmatched requests share the `none` route label

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one dispatched request.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    ::metrics::counter!(
        "urlconf_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "route" => route.to_string()
    )
    .increment(1);

    ::metrics::histogram!(
        "urlconf_request_duration_seconds",
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
