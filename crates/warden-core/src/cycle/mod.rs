//! Update cycle seam.
//!
//! What an update cycle actually does (pull, recreate, restart) is outside the core;
//! the controller only knows how to invoke it once per trigger.
mod error;
pub use error::CycleError;

use std::time::Duration;

use async_trait::async_trait;
use warden_model::{Filter, Flag};

/// Inputs handed to every update cycle.
#[derive(Clone, Debug)]
pub struct CycleParams {
    /// Tag the cycle is scoped to.
    pub tag: String,
    /// Selects the containers the cycle is allowed to touch.
    pub filter: Filter,
    /// Remove superseded images after updating.
    pub cleanup: Flag,
    /// Do not restart containers after updating.
    pub no_restart: Flag,
    /// Grace period for stopping a container.
    pub stop_timeout: Duration,
}

/// One pass of the update algorithm over all containers matching [`CycleParams::filter`].
#[async_trait]
pub trait UpdateCycle: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    async fn run(&self, params: &CycleParams) -> Result<(), CycleError>;
}
