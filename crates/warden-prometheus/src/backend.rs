use std::sync::Arc;

use prometheus::{
    Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
    proto::MetricFamily,
};

use warden_core::{CycleOutcome, MetricsBackend};

const NAMESPACE: &str = "warden";

/// Prometheus metrics backend.
///
/// ## Label cardinality
/// All labels are bounded:
/// - `outcome`: "success", "failure"
/// - `action`: "stop", "remove_image"
#[derive(Clone)]
pub struct PrometheusMetrics {
    cycles_started: Counter,
    cycles_completed: CounterVec,
    cycle_duration: Histogram,
    cycles_skipped: Counter,
    duplicates_retired: Counter,
    retire_errors: CounterVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Create a backend registering into `registry`.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let cycles_started = Counter::with_opts(
            Opts::new("cycles_started_total", "Update cycles that acquired the gate")
                .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(cycles_started.clone()))?;

        let cycles_completed = CounterVec::new(
            Opts::new("cycles_completed_total", "Update cycles that finished")
                .namespace(NAMESPACE),
            &["outcome"],
        )?;
        registry.register(Box::new(cycles_completed.clone()))?;

        let cycle_duration = Histogram::with_opts(
            HistogramOpts::new("cycle_duration_seconds", "Update cycle duration in seconds")
                .namespace(NAMESPACE)
                .buckets(vec![0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0, 300.0, 900.0]),
        )?;
        registry.register(Box::new(cycle_duration.clone()))?;

        let cycles_skipped = Counter::with_opts(
            Opts::new(
                "cycles_skipped_total",
                "Triggers dropped because a cycle was still running",
            )
            .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(cycles_skipped.clone()))?;

        let duplicates_retired = Counter::with_opts(
            Opts::new(
                "duplicates_retired_total",
                "Duplicate warden instances stopped at startup",
            )
            .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(duplicates_retired.clone()))?;

        let retire_errors = CounterVec::new(
            Opts::new(
                "retire_errors_total",
                "Failed operations while retiring duplicate instances",
            )
            .namespace(NAMESPACE),
            &["action"],
        )?;
        registry.register(Box::new(retire_errors.clone()))?;

        Ok(Self {
            cycles_started,
            cycles_completed,
            cycle_duration,
            cycles_skipped,
            duplicates_retired,
            retire_errors,
            registry,
        })
    }

    /// Create a backend with its own registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Render every registered metric in the text exposition format.
    pub fn encode_text(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buf = Vec::new();
        encoder.encode(&self.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_cycle_started(&self) {
        self.cycles_started.inc();
    }

    fn record_cycle_completed(&self, outcome: CycleOutcome, duration_ms: u64) {
        self.cycles_completed
            .with_label_values(&[outcome.as_label()])
            .inc();
        self.cycle_duration.observe(duration_ms as f64 / 1000.0);
    }

    fn record_cycle_skipped(&self) {
        self.cycles_skipped.inc();
    }

    fn record_duplicate_retired(&self) {
        self.duplicates_retired.inc();
    }

    fn record_retire_error(&self, action: &str) {
        self.retire_errors.with_label_values(&[action]).inc();
    }
}
