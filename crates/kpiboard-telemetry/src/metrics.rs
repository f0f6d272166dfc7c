//! Prometheus metrics for kpiboard.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. A failure means duplicate metric
//! names, which is a programming error caught on first use.

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram, register_int_counter_vec, Encoder, Histogram, IntCounterVec, TextEncoder,
};

use crate::error::{TelemetryError, TelemetryResult};

/// KPI fetch attempts by outcome (ok / failed / discarded).
pub static FETCH_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "kpiboard_fetch_total",
        "KPI fetch attempts by outcome",
        &["outcome"]
    )
    .unwrap()
});

/// KPI fetch latency in milliseconds.
pub static FETCH_LATENCY_MS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "kpiboard_fetch_latency_ms",
        "KPI fetch latency in milliseconds",
        vec![5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0]
    )
    .unwrap()
});

/// Pages rendered by resulting state (loading / loaded / failed).
pub static PAGE_RENDER_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "kpiboard_page_render_total",
        "Dashboard pages rendered by state",
        &["state"]
    )
    .unwrap()
});

/// Metrics facade.
pub struct Metrics;

impl Metrics {
    /// Record a fetch that resolved with a snapshot.
    pub fn fetch_ok(latency_ms: f64) {
        FETCH_TOTAL.with_label_values(&["ok"]).inc();
        FETCH_LATENCY_MS.observe(latency_ms);
    }

    /// Record a fetch that resolved with an error.
    pub fn fetch_failed(latency_ms: f64) {
        FETCH_TOTAL.with_label_values(&["failed"]).inc();
        FETCH_LATENCY_MS.observe(latency_ms);
    }

    /// Record a fetch result dropped because its view was torn down.
    pub fn fetch_discarded() {
        FETCH_TOTAL.with_label_values(&["discarded"]).inc();
    }

    /// Record one rendered page.
    pub fn page_rendered(state: &str) {
        PAGE_RENDER_TOTAL.with_label_values(&[state]).inc();
    }

    /// Encode the default registry in the Prometheus text format.
    pub fn encode_text() -> TelemetryResult<String> {
        let encoder = TextEncoder::new();
        let mut buf = Vec::new();
        encoder
            .encode(&prometheus::gather(), &mut buf)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}
