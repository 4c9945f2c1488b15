//! Metrics collection and exposition.
//!
//! # Metrics
//! - `version_negotiation_total` (counter): negotiations by `outcome`
//!   (`matched`, `missing`, `unsatisfied`)
//! - `version_route_decisions_total` (counter): exact-version route
//!   decisions by `decision` (`continue`, `delegate`)

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_negotiation(outcome: &'static str) {
    counter!("version_negotiation_total", "outcome" => outcome).increment(1);
}

pub fn record_route_decision(decision: &'static str) {
    counter!("version_route_decisions_total", "decision" => decision).increment(1);
}
