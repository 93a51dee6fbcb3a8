//! Prometheus metrics for query resolution
//!
//! Counters are process-wide; the caches and aggregates they describe are
//! not.

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_histogram, CounterVec, Encoder, Histogram, TextEncoder,
};

lazy_static! {
    /// Counter: request-cache lookups by entity and outcome (hit/miss)
    pub static ref CACHE_OPERATIONS: CounterVec = register_counter_vec!(
        "feedgraph_cache_operations_total",
        "Request cache lookups by entity and outcome",
        &["entity", "outcome"]
    )
    .expect("Failed to create cache_operations metric");

    /// Counter: full-table scans issued against the store
    pub static ref STORE_SCANS: CounterVec = register_counter_vec!(
        "feedgraph_store_scans_total",
        "Full-table store scans by table",
        &["table"]
    )
    .expect("Failed to create store_scans metric");

    /// Counter: aggregate builds (should be at most one per request and kind)
    pub static ref AGGREGATE_BUILDS: CounterVec = register_counter_vec!(
        "feedgraph_aggregate_builds_total",
        "Aggregate folds by kind",
        &["kind"]
    )
    .expect("Failed to create aggregate_builds metric");

    /// Counter: field-level resolution failures by kind
    pub static ref FIELD_ERRORS: CounterVec = register_counter_vec!(
        "feedgraph_field_errors_total",
        "Field resolution failures by kind",
        &["kind"]
    )
    .expect("Failed to create field_errors metric");

    /// Histogram: whole-request duration (seconds)
    pub static ref REQUEST_DURATION: Histogram = register_histogram!(
        "feedgraph_request_duration_seconds",
        "Duration of query execution",
        vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]
    )
    .expect("Failed to create request_duration metric");
}

pub fn record_cache_hit(entity: &str) {
    CACHE_OPERATIONS.with_label_values(&[entity, "hit"]).inc();
}

pub fn record_cache_miss(entity: &str) {
    CACHE_OPERATIONS.with_label_values(&[entity, "miss"]).inc();
}

pub fn record_store_scan(table: &str) {
    STORE_SCANS.with_label_values(&[table]).inc();
}

pub fn record_aggregate_build(kind: &str) {
    AGGREGATE_BUILDS.with_label_values(&[kind]).inc();
}

pub fn record_field_error(kind: &str) {
    FIELD_ERRORS.with_label_values(&[kind]).inc();
}

pub fn record_request_duration(duration_secs: f64) {
    REQUEST_DURATION.observe(duration_secs);
}

/// Encode all metrics as Prometheus text format
pub fn encode_metrics() -> crate::Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| crate::FeedGraphError::Other(format!("Failed to encode metrics: {}", e)))?;
    String::from_utf8(buffer)
        .map_err(|e| crate::FeedGraphError::Other(format!("Metrics are not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_includes_recorded_metrics() {
        record_cache_hit("user");
        record_cache_miss("tweet");
        record_store_scan("favorites");
        record_aggregate_build("favorite_counts");
        record_field_error("integrity");
        record_request_duration(0.002);

        let output = encode_metrics().unwrap();
        assert!(output.contains("feedgraph_cache_operations_total"));
        assert!(output.contains("feedgraph_store_scans_total"));
        assert!(output.contains("feedgraph_request_duration_seconds"));
    }
}
