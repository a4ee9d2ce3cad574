use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use warden_core::{ContainerClient, CycleError, CycleParams, UpdateCycle};
use warden_model::sort_by_created;

/// Update cycle that only reports the containers it is scoped to.
///
/// Used when no update command is configured, so the schedule and tag selection
/// can be observed without touching anything.
pub struct ListOnlyCycle {
    client: Arc<dyn ContainerClient>,
}

impl ListOnlyCycle {
    pub fn new(client: Arc<dyn ContainerClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UpdateCycle for ListOnlyCycle {
    fn name(&self) -> &'static str {
        "list-only"
    }

    async fn run(&self, params: &CycleParams) -> Result<(), CycleError> {
        let mut containers = self.client.list_containers(&params.filter).await?;
        sort_by_created(&mut containers);

        info!(tag = %params.tag, count = containers.len(), "containers in scope");
        for c in &containers {
            info!(container = %c.name, image = %c.image, created = %c.created_at, "in scope");
        }
        Ok(())
    }
}
