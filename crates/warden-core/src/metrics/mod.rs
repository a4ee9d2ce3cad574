//! Metrics collection abstraction.
//!
//! Backends (prometheus, ...) implement [`MetricsBackend`] and are handed to the
//! controller and reconciler as a [`MetricsHandle`].
mod backend;
pub use backend::{CycleOutcome, MetricsBackend, MetricsHandle};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
