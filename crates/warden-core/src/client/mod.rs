//! Container runtime seam.
//!
//! The core never talks to a container engine directly; it goes through
//! [`ContainerClient`], which concrete backends implement.
mod error;
pub use error::ClientError;

use std::time::Duration;

use async_trait::async_trait;
use warden_model::{ContainerView, Filter};

/// Minimal container runtime contract used by reconciliation and update cycles.
#[async_trait]
pub trait ContainerClient: Send + Sync {
    /// List running containers accepted by `filter`.
    ///
    /// A failure here means the runtime could not be enumerated at all.
    async fn list_containers(&self, filter: &Filter) -> Result<Vec<ContainerView>, ClientError>;

    /// Ask the runtime to stop `container`, killing it after `grace`.
    async fn stop_container(
        &self,
        container: &ContainerView,
        grace: Duration,
    ) -> Result<(), ClientError>;

    /// Remove the image backing `container`.
    async fn remove_image(&self, container: &ContainerView) -> Result<(), ClientError>;
}
