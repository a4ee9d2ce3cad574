use thiserror::Error;

use crate::client::ClientError;

#[derive(Debug, Error)]
pub enum CycleError {
    #[error("runtime error: {0}")]
    Client(#[from] ClientError),

    #[error("update command failed: {0}")]
    Command(String),

    #[error("internal error: {0}")]
    Internal(String),
}
