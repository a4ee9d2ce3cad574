mod domain;
pub use domain::{Flag, Labels, StopTimeout};
pub use domain::{LABEL_MANAGER, LABEL_TAG};

mod error;
pub use error::{ModelError, ModelResult};

mod container;
pub use container::{ContainerView, Filter, created_before, sort_by_created};

mod schedule;
pub use schedule::{DEFAULT_POLL_INTERVAL, ScheduleSpec, normalize_cron_expr};

mod strategy;
pub use strategy::ReconcilePolicy;
