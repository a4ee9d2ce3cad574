//! Update trigger.
//!
//! Turns a [`ScheduleSpec`] into a stream of callback invocations on a background
//! task. Each firing runs on its own task, so a slow callback never delays the timer
//! and overlapping firings are possible by construction (the gate resolves them).
use std::{future::Future, str::FromStr, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use warden_model::ScheduleSpec;

use crate::error::CoreError;

enum Trigger {
    Cron(Box<cron::Schedule>),
    Every(chrono::Duration),
}

/// Compiled schedule.
pub struct Scheduler {
    spec: ScheduleSpec,
    trigger: Trigger,
}

impl Scheduler {
    pub fn new(spec: &ScheduleSpec) -> Result<Self, CoreError> {
        let trigger = match spec {
            ScheduleSpec::Cron(expr) => cron::Schedule::from_str(expr)
                .map(|s| Trigger::Cron(Box::new(s)))
                .map_err(|e| CoreError::Scheduler(format!("invalid cron '{expr}': {e}")))?,
            ScheduleSpec::Every(interval) => chrono::Duration::from_std(*interval)
                .map(Trigger::Every)
                .map_err(|e| CoreError::Scheduler(format!("interval out of range: {e}")))?,
        };
        Ok(Self {
            spec: spec.clone(),
            trigger,
        })
    }

    /// First fire time strictly after `after`, or `None` if the schedule is exhausted.
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match &self.trigger {
            Trigger::Cron(schedule) => schedule.after(&after).next(),
            Trigger::Every(interval) => after.checked_add_signed(*interval),
        }
    }

    /// Start firing `callback` on a background task.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start<F, Fut>(self, callback: F) -> SchedulerHandle
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let (next_tx, next_rx) = watch::channel(None);
        let join = tokio::spawn(run_loop(self, Arc::new(callback), cancel.clone(), next_tx));

        SchedulerHandle {
            cancel,
            next: next_rx,
            join,
        }
    }
}

/// Handle to a running scheduler.
pub struct SchedulerHandle {
    cancel: CancellationToken,
    next: watch::Receiver<Option<DateTime<Utc>>>,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Next planned fire time; `None` once stopped or exhausted.
    pub fn next_run(&self) -> Option<DateTime<Utc>> {
        *self.next.borrow()
    }

    /// Stop producing ticks.
    ///
    /// Returns once the timer loop has exited; callbacks already spawned keep running.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.join.await {
            warn!(error = %e, "scheduler loop ended abnormally");
        }
    }
}

async fn run_loop<F, Fut>(
    scheduler: Scheduler,
    callback: Arc<F>,
    cancel: CancellationToken,
    next_tx: watch::Sender<Option<DateTime<Utc>>>,
) where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    // Never compute from a point earlier than the last fire, or a timer that wakes a
    // hair early would fire the same cron occurrence twice.
    let mut cursor = Utc::now();

    loop {
        let now = Utc::now().max(cursor);
        let Some(at) = scheduler.next_after(now) else {
            warn!(schedule = %scheduler.spec, "schedule has no upcoming runs; scheduler stopped");
            next_tx.send_replace(None);
            return;
        };
        next_tx.send_replace(Some(at));
        debug!(next_run = %at, "scheduled next run");

        let wait = (at - now).to_std().unwrap_or(Duration::ZERO);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                next_tx.send_replace(None);
                debug!("scheduler stopped");
                return;
            }
            _ = tokio::time::sleep(wait) => {}
        }

        cursor = at;
        let cb = Arc::clone(&callback);
        tokio::spawn(async move { cb().await });
    }
}
