//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): responses by status and kind (`text`, `binary`, `error`)
//! - `proxy_fetch_duration_seconds` (histogram): origin fetch latency, retries included
//! - `proxy_rewritten_bytes_total` (counter): bytes emitted by the text path

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Serve Prometheus metrics on `addr`. Must run inside the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(status: u16, kind: &'static str) {
    metrics::counter!("proxy_requests_total", "status" => status.to_string(), "kind" => kind)
        .increment(1);
}

pub fn record_fetch(start: Instant) {
    metrics::histogram!("proxy_fetch_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_rewritten(bytes: usize) {
    metrics::counter!("proxy_rewritten_bytes_total").increment(bytes as u64);
}
