pub mod client;
pub mod config;
pub mod controller;
pub mod cycle;
pub mod error;
pub mod gate;
pub mod metrics;
pub mod notify;
pub mod reconcile;
pub mod scheduler;

pub use client::{ClientError, ContainerClient};
pub use config::{AgentConfig, AgentConfigBuilder, ConfigError};
pub use controller::{Controller, CycleAttempt, ExitReason};
pub use cycle::{CycleError, CycleParams, UpdateCycle};
pub use error::CoreError;
pub use gate::{FlightPermit, SingleFlight};
pub use metrics::{CycleOutcome, MetricsBackend, MetricsHandle, NoOpMetrics, noop_metrics};
pub use notify::{FanoutNotifier, LogNotifier, NoopNotifier, Notifier};
pub use reconcile::{ReconcileReport, Reconciler, RetireAction, RetireFailure, reconcile};
pub use scheduler::{Scheduler, SchedulerHandle};

pub mod prelude {
    pub use crate::client::{ClientError, ContainerClient};
    pub use crate::config::AgentConfig;
    pub use crate::controller::Controller;
    pub use crate::cycle::{CycleError, CycleParams, UpdateCycle};
    pub use crate::error::CoreError;
    pub use crate::notify::Notifier;
}
