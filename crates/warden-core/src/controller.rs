//! Update controller.
//!
//! Wires the schedule, the single-flight gate, notifications and metrics around an
//! [`UpdateCycle`]. [`Controller::run`] owns the process lifetime: it keeps firing
//! cycles until the shutdown future resolves, then waits for the in-flight cycle.
use std::{future::Future, sync::Arc};

use chrono::Utc;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument};

use crate::{
    config::AgentConfig,
    cycle::{CycleError, CycleParams, UpdateCycle},
    error::CoreError,
    gate::SingleFlight,
    metrics::{CycleOutcome, MetricsHandle, noop_metrics},
    notify::Notifier,
    scheduler::Scheduler,
};

/// Result of a single trigger.
#[derive(Debug)]
pub enum CycleAttempt {
    /// Another cycle held the gate; nothing ran.
    Skipped,
    /// The cycle ran to completion with this result.
    Completed(Result<(), CycleError>),
}

impl CycleAttempt {
    pub fn is_skipped(&self) -> bool {
        matches!(self, CycleAttempt::Skipped)
    }
}

/// Why [`Controller::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Shutdown was requested and the in-flight cycle, if any, has finished.
    Interrupted,
}

impl ExitReason {
    /// Process exit status for this reason.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExitReason::Interrupted => 1,
        }
    }
}

#[derive(Clone)]
pub struct Controller {
    config: Arc<AgentConfig>,
    cycle: Arc<dyn UpdateCycle>,
    notifier: Arc<dyn Notifier>,
    metrics: MetricsHandle,
    gate: SingleFlight,
    params: Arc<CycleParams>,
}

impl Controller {
    pub fn new(
        config: AgentConfig,
        cycle: Arc<dyn UpdateCycle>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let params = Arc::new(config.cycle_params());
        Self {
            config: Arc::new(config),
            cycle,
            notifier,
            metrics: noop_metrics(),
            gate: SingleFlight::new(),
            params,
        }
    }

    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// The gate shared by every trigger of this controller.
    pub fn gate(&self) -> &SingleFlight {
        &self.gate
    }

    /// Handle one trigger.
    ///
    /// Returns [`CycleAttempt::Skipped`] immediately if a cycle is already running.
    /// Otherwise runs the cycle between the start/finish notifications. A failing
    /// cycle is logged and reported but never stops the controller.
    #[instrument(level = "debug", skip(self), fields(tag = %self.params.tag, cycle = self.cycle.name()))]
    pub async fn attempt(&self) -> CycleAttempt {
        let Some(_permit) = self.gate.try_acquire() else {
            debug!("skipped update cycle because another one is still running");
            self.metrics.record_cycle_skipped();
            return CycleAttempt::Skipped;
        };

        self.metrics.record_cycle_started();
        let started = Instant::now();

        self.notifier.cycle_started().await;
        let result = self.cycle.run(&self.params).await;
        if let Err(e) = &result {
            error!(error = %e, "update cycle failed");
        }
        self.notifier.cycle_finished().await;

        let outcome = match result {
            Ok(()) => CycleOutcome::Success,
            Err(_) => CycleOutcome::Failure,
        };
        let elapsed_ms = started.elapsed().as_millis().min(u64::MAX as u128) as u64;
        self.metrics.record_cycle_completed(outcome, elapsed_ms);
        debug!(outcome = outcome.as_label(), elapsed_ms, "update cycle done");

        CycleAttempt::Completed(result)
    }

    /// Schedule cycles until `shutdown` resolves.
    ///
    /// After `shutdown` the scheduler stops producing triggers, then this waits,
    /// without a deadline, for the running cycle to finish. Triggers that were already
    /// spawned but have not acquired the gate are skipped.
    pub async fn run<S>(&self, shutdown: S) -> Result<ExitReason, CoreError>
    where
        S: Future<Output = ()>,
    {
        let scheduler = Scheduler::new(self.config.schedule())?;
        let first = scheduler.next_after(Utc::now());

        info!(tag = %self.config.tag(), schedule = %self.config.schedule(), "starting update controller");
        match first {
            Some(at) => info!(first_run = %at.format("%Y-%m-%d %H:%M:%S %Z"), "first run scheduled"),
            None => info!("schedule has no upcoming runs"),
        }

        let this = self.clone();
        let handle = scheduler.start(move || {
            let c = this.clone();
            async move {
                c.attempt().await;
            }
        });

        shutdown.await;
        handle.stop().await;

        info!("waiting for running update to be finished");
        self.gate.drain().await;
        info!("shutdown complete");

        Ok(ExitReason::Interrupted)
    }
}
