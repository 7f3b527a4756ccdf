// Path: crates/telemetry/src/sinks.rs
//! Defines abstract traits for metrics reporting, decoupling issuance logic from the backend.

use once_cell::sync::OnceCell;

// --- Static Sink Access ---

/// A no-op sink for use in tests or when metrics are disabled.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

/// The installed `MetricsSink`, if any.
pub static SINK: OnceCell<&'static dyn MetricsSink> = OnceCell::new();
static NOP_SINK: NopSink = NopSink;

/// Returns the configured error metrics sink, or a no-op sink.
pub fn error_metrics() -> &'static dyn ErrorMetricsSink {
    match SINK.get() {
        Some(sink) => sink.as_error_sink(),
        None => &NOP_SINK,
    }
}

/// Returns the configured issuance metrics sink, or a no-op sink.
pub fn issuance_metrics() -> &'static dyn IssuanceMetricsSink {
    match SINK.get() {
        Some(sink) => sink.as_issuance_sink(),
        None => &NOP_SINK,
    }
}

// --- Trait Definitions ---

/// A sink for metrics of the issuance and verification flows.
pub trait IssuanceMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the counter of confirmed issuances, labeled by path (`contract` or `direct`).
    fn inc_issuances(&self, path: &str);
    /// Observes how many rounds the pipeline waited before a call was confirmed.
    fn observe_confirmation_rounds(&self, rounds: u64);
    /// Observes the latency of one orchestrator stage, labeled by stage name.
    fn observe_stage_latency(&self, stage: &str, duration_secs: f64);
    /// Increments the counter of verification reads, labeled by verdict.
    fn inc_verifications(&self, verdict: &str);
}
impl IssuanceMetricsSink for NopSink {
    fn inc_issuances(&self, _path: &str) {}
    fn observe_confirmation_rounds(&self, _rounds: u64) {}
    fn observe_stage_latency(&self, _stage: &str, _duration_secs: f64) {}
    fn inc_verifications(&self, _verdict: &str) {}
}

/// A sink for recording structured error metrics.
pub trait ErrorMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments a counter for a specific error, categorized by where it surfaced and its code.
    fn inc_error(&self, kind: &'static str, code: &'static str);
}
impl ErrorMetricsSink for NopSink {
    fn inc_error(&self, _kind: &'static str, _code: &'static str) {}
}

/// A unified sink implementing every domain-specific trait, the single point of
/// implementation for backends like Prometheus.
pub trait MetricsSink: IssuanceMetricsSink + ErrorMetricsSink {
    /// Views this sink as its issuance half.
    fn as_issuance_sink(&self) -> &dyn IssuanceMetricsSink;
    /// Views this sink as its error half.
    fn as_error_sink(&self) -> &dyn ErrorMetricsSink;
}

impl<T> MetricsSink for T
where
    T: IssuanceMetricsSink + ErrorMetricsSink,
{
    fn as_issuance_sink(&self) -> &dyn IssuanceMetricsSink {
        self
    }

    fn as_error_sink(&self) -> &dyn ErrorMetricsSink {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninstalled_sinks_are_noops() {
        // Must not panic without an installed backend.
        issuance_metrics().inc_issuances("direct");
        issuance_metrics().observe_confirmation_rounds(2);
        error_metrics().inc_error("pipeline", "CONFIRMATION_TIMEOUT");
    }
}
