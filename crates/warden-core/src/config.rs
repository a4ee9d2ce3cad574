//! Immutable agent configuration.
//!
//! Built once at startup through [`AgentConfigBuilder`] and then shared by reference
//! with every component. Validation failures are returned as [`ConfigError`] so the
//! caller decides how to terminate.
use std::time::Duration;

use thiserror::Error;
use warden_model::{Filter, Flag, ModelError, ReconcilePolicy, ScheduleSpec, StopTimeout};

use crate::cycle::CycleParams;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("only schedule or interval can be defined, not both")]
    ConflictingSchedule,

    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("stop timeout must not be negative, got {0}")]
    NegativeTimeout(StopTimeout),

    #[error("a tag is required to select managed containers")]
    MissingTag,
}

impl From<ModelError> for ConfigError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::ConflictingSchedule => ConfigError::ConflictingSchedule,
            other => ConfigError::InvalidSchedule(other.to_string()),
        }
    }
}

/// Validated agent configuration.
#[derive(Clone, Debug)]
pub struct AgentConfig {
    tag: String,
    schedule: ScheduleSpec,
    cleanup: Flag,
    no_restart: Flag,
    stop_timeout: Duration,
    reconcile_policy: ReconcilePolicy,
}

impl AgentConfig {
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn schedule(&self) -> &ScheduleSpec {
        &self.schedule
    }

    pub fn cleanup(&self) -> Flag {
        self.cleanup
    }

    pub fn no_restart(&self) -> Flag {
        self.no_restart
    }

    pub fn stop_timeout(&self) -> Duration {
        self.stop_timeout
    }

    pub fn reconcile_policy(&self) -> ReconcilePolicy {
        self.reconcile_policy
    }

    /// Parameters handed to each update cycle: the tag filter plus the operator toggles.
    pub fn cycle_params(&self) -> CycleParams {
        CycleParams {
            tag: self.tag.clone(),
            filter: Filter::tag(self.tag.clone()),
            cleanup: self.cleanup,
            no_restart: self.no_restart,
            stop_timeout: self.stop_timeout,
        }
    }
}

/// Collects raw operator input; [`AgentConfigBuilder::build`] validates it.
#[derive(Clone, Debug, Default)]
pub struct AgentConfigBuilder {
    tag: Option<String>,
    interval_secs: Option<u64>,
    cron: Option<String>,
    cleanup: Flag,
    no_restart: Flag,
    stop_timeout: StopTimeout,
    reconcile_policy: ReconcilePolicy,
}

impl AgentConfigBuilder {
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Fixed poll interval in seconds. Mutually exclusive with [`Self::cron`].
    pub fn interval_secs(mut self, secs: u64) -> Self {
        self.interval_secs = Some(secs);
        self
    }

    /// Cron expression. Mutually exclusive with [`Self::interval_secs`].
    pub fn cron(mut self, expr: impl Into<String>) -> Self {
        self.cron = Some(expr.into());
        self
    }

    pub fn cleanup(mut self, cleanup: impl Into<Flag>) -> Self {
        self.cleanup = cleanup.into();
        self
    }

    pub fn no_restart(mut self, no_restart: impl Into<Flag>) -> Self {
        self.no_restart = no_restart.into();
        self
    }

    pub fn stop_timeout(mut self, timeout: StopTimeout) -> Self {
        self.stop_timeout = timeout;
        self
    }

    pub fn reconcile_policy(mut self, policy: ReconcilePolicy) -> Self {
        self.reconcile_policy = policy;
        self
    }

    /// Validate and freeze the configuration.
    ///
    /// Checks run in order: schedule, stop timeout, tag.
    pub fn build(self) -> Result<AgentConfig, ConfigError> {
        let schedule = ScheduleSpec::resolve(self.interval_secs, self.cron)?;

        let stop_timeout = self
            .stop_timeout
            .to_duration()
            .ok_or(ConfigError::NegativeTimeout(self.stop_timeout))?;

        let tag = self
            .tag
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingTag)?;

        Ok(AgentConfig {
            tag,
            schedule,
            cleanup: self.cleanup,
            no_restart: self.no_restart,
            stop_timeout,
            reconcile_policy: self.reconcile_policy,
        })
    }
}
