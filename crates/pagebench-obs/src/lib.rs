//! Observability utilities: fetch and batch metrics

use std::time::Duration;

use once_cell::sync::Lazy;
use prometheus::{Encoder, HistogramVec, IntCounterVec, TextEncoder};

static FETCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    prometheus::register_int_counter_vec!("pagebench_fetches_total", "Pages fetched and sliced", &["strategy"])
        .expect("fetch counter")
});
static BATCH_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    prometheus::register_histogram_vec!(
        "pagebench_batch_seconds",
        "Wall-clock time of one batch",
        &["strategy"],
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .expect("batch histogram")
});
static BATCH_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    prometheus::register_int_counter_vec!("pagebench_batch_failures_total", "Batches aborted by an error", &["strategy"])
        .expect("failure counter")
});

pub fn init() {
    // Touch statics so every family shows up in the first render.
    let _ = &*FETCHES;
    let _ = &*BATCH_SECONDS;
    let _ = &*BATCH_FAILURES;
}

pub fn record_fetch(strategy: &str) {
    FETCHES.with_label_values(&[strategy]).inc();
}

pub fn record_batch(strategy: &str, elapsed: Duration, ok: bool) {
    BATCH_SECONDS.with_label_values(&[strategy]).observe(elapsed.as_secs_f64());
    if !ok {
        BATCH_FAILURES.with_label_values(&[strategy]).inc();
    }
}

pub fn fetch_count(strategy: &str) -> u64 {
    FETCHES.with_label_values(&[strategy]).get()
}

/// Prometheus text exposition of everything registered so far.
pub fn render() -> prometheus::Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
