//! Metrics collection and exposition.
//!
//! # Metrics
//! - `tracker_publish_total` (counter): publishes by outcome (changed/refreshed)
//! - `tracker_lookup_total` (counter): lookups by found
//! - `tracker_history_len` (gauge): superseded URLs retained
//! - `tracker_probe_total` (counter): backend reachability probes by result
//! - `tracker_generation_total` (counter): generation calls by outcome
//! - `tracker_generation_duration_seconds` (histogram): generation latency
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_publish(changed: bool) {
    let outcome = if changed { "changed" } else { "refreshed" };
    metrics::counter!("tracker_publish_total", "outcome" => outcome).increment(1);
}

pub fn record_publish_rejected() {
    metrics::counter!("tracker_publish_total", "outcome" => "rejected").increment(1);
}

pub fn record_lookup(found: bool) {
    metrics::counter!("tracker_lookup_total", "found" => found.to_string()).increment(1);
}

pub fn record_history_len(len: usize) {
    metrics::gauge!("tracker_history_len").set(len as f64);
}

pub fn record_probe(reachable: bool) {
    let result = if reachable { "reachable" } else { "unreachable" };
    metrics::counter!("tracker_probe_total", "result" => result).increment(1);
}

pub fn record_generation(outcome: &'static str, start: Instant) {
    metrics::counter!("tracker_generation_total", "outcome" => outcome).increment(1);
    metrics::histogram!("tracker_generation_duration_seconds").record(start.elapsed().as_secs_f64());
}
