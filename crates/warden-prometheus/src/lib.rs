//! Prometheus metrics backend for the warden update agent.
//!
//! Provides [`PrometheusMetrics`], an implementation of [`warden_core::MetricsBackend`].
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use warden_core::MetricsHandle;
//! use warden_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let handle: MetricsHandle = Arc::new(metrics.clone());
//! # let _ = handle;
//!
//! // Serve this from `/metrics`.
//! let body = metrics.encode_text()?;
//! assert!(body.contains("warden_cycles_started_total"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `warden_cycles_started_total` - Counter
//! - `warden_cycles_completed_total{outcome}` - Counter
//! - `warden_cycle_duration_seconds` - Histogram
//! - `warden_cycles_skipped_total` - Counter
//! - `warden_duplicates_retired_total` - Counter
//! - `warden_retire_errors_total{action}` - Counter
//!
//! No HTTP server is included; the agent binary mounts [`PrometheusMetrics::encode_text`]
//! on its own router.
mod backend;
pub use backend::PrometheusMetrics;
