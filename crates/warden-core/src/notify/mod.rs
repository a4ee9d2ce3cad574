//! Hooks fired around every update cycle.
//!
//! Delivery (mail, chat webhooks) lives behind [`Notifier`]; the controller only
//! guarantees the call order: `cycle_started`, the cycle, `cycle_finished`.
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

/// Fire-and-forget notification hooks.
///
/// Implementations must not fail the cycle: errors are theirs to log.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn cycle_started(&self);

    /// Called after every cycle, whether it succeeded or not.
    async fn cycle_finished(&self);
}

/// Notifier that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn cycle_started(&self) {}

    async fn cycle_finished(&self) {}
}

/// Writes cycle boundaries to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn cycle_started(&self) {
        info!("update cycle started");
    }

    async fn cycle_finished(&self) {
        info!("update cycle finished");
    }
}

/// Forwards every hook to each inner notifier, in registration order.
#[derive(Default, Clone)]
pub struct FanoutNotifier {
    inner: Vec<Arc<dyn Notifier>>,
}

impl FanoutNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.inner.push(notifier);
        self
    }
}

#[async_trait]
impl Notifier for FanoutNotifier {
    async fn cycle_started(&self) {
        for n in &self.inner {
            n.cycle_started().await;
        }
    }

    async fn cycle_finished(&self) {
        for n in &self.inner {
            n.cycle_finished().await;
        }
    }
}
