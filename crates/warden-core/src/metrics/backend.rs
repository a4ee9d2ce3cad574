use std::sync::Arc;

/// How an update cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Success,
    Failure,
}

impl CycleOutcome {
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            CycleOutcome::Success => "success",
            CycleOutcome::Failure => "failure",
        }
    }
}

/// Metrics sink for the scheduling engine.
pub trait MetricsBackend: Send + Sync + 'static {
    /// A trigger acquired the gate and a cycle is starting.
    fn record_cycle_started(&self);

    /// A cycle finished, successfully or not.
    ///
    /// # Arguments
    /// - `outcome`: result of the update operation
    /// - `duration_ms`: wall time between start and finish notifications
    fn record_cycle_completed(&self, outcome: CycleOutcome, duration_ms: u64);

    /// A trigger fired while a cycle was still running and was dropped.
    fn record_cycle_skipped(&self);

    /// A duplicate warden instance was stopped during reconciliation.
    fn record_duplicate_retired(&self);

    /// A stop or image removal for a duplicate instance failed.
    ///
    /// `action` is a low-cardinality label such as `"stop"` or `"remove_image"`.
    fn record_retire_error(&self, action: &str);
}

pub type MetricsHandle = Arc<dyn MetricsBackend>;
