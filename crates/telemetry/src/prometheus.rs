// Path: crates/telemetry/src/prometheus.rs
//! A concrete implementation of the metrics sinks using the Prometheus crate.

use crate::sinks::*;
use once_cell::sync::OnceCell;
use prometheus::{
    exponential_buckets, register_histogram, register_histogram_vec, register_int_counter_vec,
    Encoder, Histogram, HistogramVec, IntCounterVec, TextEncoder,
};

// --- Metric Statics ---
// Collectors are registered with the default registry by `install`.

static ISSUANCES_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static VERIFICATIONS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static CONFIRMATION_ROUNDS: OnceCell<Histogram> = OnceCell::new();
static STAGE_LATENCY_SECONDS: OnceCell<HistogramVec> = OnceCell::new();
static ERRORS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();

/// The Prometheus-backed sink. Recording before [`install`] is a no-op.
#[derive(Debug, Clone, Copy)]
pub struct PrometheusSink;

impl IssuanceMetricsSink for PrometheusSink {
    fn inc_issuances(&self, path: &str) {
        if let Some(m) = ISSUANCES_TOTAL.get() {
            m.with_label_values(&[path]).inc();
        }
    }
    fn observe_confirmation_rounds(&self, rounds: u64) {
        if let Some(m) = CONFIRMATION_ROUNDS.get() {
            m.observe(rounds as f64);
        }
    }
    fn observe_stage_latency(&self, stage: &str, duration_secs: f64) {
        if let Some(m) = STAGE_LATENCY_SECONDS.get() {
            m.with_label_values(&[stage]).observe(duration_secs);
        }
    }
    fn inc_verifications(&self, verdict: &str) {
        if let Some(m) = VERIFICATIONS_TOTAL.get() {
            m.with_label_values(&[verdict]).inc();
        }
    }
}

impl ErrorMetricsSink for PrometheusSink {
    fn inc_error(&self, kind: &'static str, code: &'static str) {
        if let Some(m) = ERRORS_TOTAL.get() {
            m.with_label_values(&[kind, code]).inc();
        }
    }
}

/// Registers every collector and returns the sink. Safe to call more than once.
pub fn install() -> Result<&'static dyn MetricsSink, prometheus::Error> {
    ISSUANCES_TOTAL.get_or_try_init(|| {
        register_int_counter_vec!(
            "credchain_issuances_total",
            "Total confirmed credential issuances, by path.",
            &["path"]
        )
    })?;
    VERIFICATIONS_TOTAL.get_or_try_init(|| {
        register_int_counter_vec!(
            "credchain_verifications_total",
            "Total verification reads, by verdict.",
            &["verdict"]
        )
    })?;
    CONFIRMATION_ROUNDS.get_or_try_init(|| {
        register_histogram!(
            "credchain_confirmation_rounds",
            "Rounds waited before a submitted call was confirmed.",
            vec![0.0, 1.0, 2.0, 3.0, 4.0, 6.0, 8.0, 16.0]
        )
    })?;
    STAGE_LATENCY_SECONDS.get_or_try_init(|| {
        register_histogram_vec!(
            "credchain_stage_latency_seconds",
            "Latency of issuance stages.",
            &["stage"],
            exponential_buckets(0.01, 2.0, 14)?
        )
    })?;
    ERRORS_TOTAL.get_or_try_init(|| {
        register_int_counter_vec!(
            "credchain_errors_total",
            "Total number of errors, categorized by where they surfaced and their code.",
            &["kind", "code"]
        )
    })?;

    static PROMETHEUS_SINK: PrometheusSink = PrometheusSink;
    let sink: &'static dyn MetricsSink = &PROMETHEUS_SINK;
    // A sink installed earlier stays in place.
    let _ = SINK.set(sink);
    Ok(sink)
}

/// Renders every registered metric in the Prometheus text exposition format.
pub fn render() -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&prometheus::gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_is_idempotent_and_renders() {
        let sink = install().unwrap();
        install().unwrap();
        sink.inc_issuances("direct");
        sink.observe_confirmation_rounds(1);
        sink.inc_error("pipeline", "CONFIRMATION_TIMEOUT");
        let text = render().unwrap();
        assert!(text.contains("credchain_issuances_total"));
        assert!(text.contains("path=\"direct\""));
        assert!(text.contains("CONFIRMATION_TIMEOUT"));
        // The global accessors now route to Prometheus.
        issuance_metrics().inc_issuances("contract");
        assert!(render().unwrap().contains("path=\"contract\""));
    }
}
