//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_attempts_total` (counter): attempts by route, outcome
//! - `gateway_attempt_duration_seconds` (histogram): per-attempt latency by route
//! - `gateway_invocations_total` (counter): executor results by kind
//! - `gateway_invocation_duration_seconds` (histogram): whole-invocation latency
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Prometheus exporter is opt-in from configuration

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one route attempt.
pub fn record_attempt(route: &str, outcome: &'static str, elapsed: Duration) {
    metrics::counter!(
        "gateway_attempts_total",
        "route" => route.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("gateway_attempt_duration_seconds", "route" => route.to_string())
        .record(elapsed.as_secs_f64());
}

/// Record the final result of one executor invocation.
pub fn record_invocation(result: &'static str, start: Instant) {
    metrics::counter!("gateway_invocations_total", "result" => result).increment(1);
    metrics::histogram!("gateway_invocation_duration_seconds", "result" => result)
        .record(start.elapsed().as_secs_f64());
}

/// Record a swallowed error from a background poller.
pub fn record_poll_error(poller: &'static str) {
    metrics::counter!("gateway_poll_errors_total", "poller" => poller).increment(1);
}
