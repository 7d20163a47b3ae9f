//! Telemetry store metrics collection.
//!
//! Provides standardized metrics for monitoring persistence:
//! - Append counters by sink and outcome
//! - Flush latency histograms
//! - Retry and drop counters

use metrics::{counter, histogram};

// =============================================================================
// Metric Names
// =============================================================================

/// Metric name constants for consistency.
pub mod names {
    /// Signal records persisted, by sink.
    pub const RECORDS_PERSISTED_TOTAL: &str = "telemetry_records_persisted_total";

    /// Signal records dropped after retries were exhausted, by sink.
    pub const RECORDS_DROPPED_TOTAL: &str = "telemetry_records_dropped_total";

    /// Append retry attempts, by sink.
    pub const RETRIES_TOTAL: &str = "telemetry_retries_total";

    /// Append latency in seconds, by sink and outcome.
    pub const APPEND_LATENCY_SECONDS: &str = "telemetry_append_latency_seconds";
}

// =============================================================================
// Recording Functions
// =============================================================================

/// Record metrics for a completed append attempt.
pub fn record_append(sink: &str, outcome: &str, batch_len: usize, latency_ms: f64) {
    if outcome == "ok" {
        counter!(
            names::RECORDS_PERSISTED_TOTAL,
            "sink" => sink.to_string()
        )
        .increment(batch_len as u64);
    }

    histogram!(
        names::APPEND_LATENCY_SECONDS,
        "sink" => sink.to_string(),
        "outcome" => outcome.to_string()
    )
    .record(latency_ms / 1000.0);
}

/// Record a retry attempt.
pub fn record_retry(sink: &str) {
    counter!(
        names::RETRIES_TOTAL,
        "sink" => sink.to_string()
    )
    .increment(1);
}

/// Record records dropped after retries were exhausted.
pub fn record_dropped(sink: &str, count: usize) {
    counter!(
        names::RECORDS_DROPPED_TOTAL,
        "sink" => sink.to_string()
    )
    .increment(count as u64);
}

// =============================================================================
// Tests
// =============================================================================
