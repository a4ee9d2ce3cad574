use thiserror::Error;

use crate::{client::ClientError, config::ConfigError};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to list containers: {0}")]
    Listing(#[source] ClientError),

    #[error("failed to retire {failed} duplicate instance operation(s)")]
    Retire { failed: usize },

    #[error("scheduler error: {0}")]
    Scheduler(String),
}
