// Path: crates/telemetry/src/time.rs
use crate::sinks::IssuanceMetricsSink;
use std::time::Instant;

/// Reports the lifetime of a scope as the latency of one orchestrator stage.
pub struct StageTimer<'a> {
    sink: &'a dyn IssuanceMetricsSink,
    stage: &'static str,
    start: Instant,
}

impl<'a> StageTimer<'a> {
    /// Starts timing `stage`.
    pub fn new(sink: &'a dyn IssuanceMetricsSink, stage: &'static str) -> Self {
        Self {
            sink,
            stage,
            start: Instant::now(),
        }
    }
}

impl Drop for StageTimer<'_> {
    fn drop(&mut self) {
        self.sink
            .observe_stage_latency(self.stage, self.start.elapsed().as_secs_f64());
    }
}
