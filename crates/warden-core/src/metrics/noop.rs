use crate::metrics::backend::{CycleOutcome, MetricsBackend};

/// Metrics backend that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_cycle_started(&self) {}

    #[inline(always)]
    fn record_cycle_completed(&self, _: CycleOutcome, _: u64) {}

    #[inline(always)]
    fn record_cycle_skipped(&self) {}

    #[inline(always)]
    fn record_duplicate_retired(&self) {}

    #[inline(always)]
    fn record_retire_error(&self, _: &str) {}
}
