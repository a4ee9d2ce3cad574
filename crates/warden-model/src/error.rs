use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("only schedule or interval can be defined, not both")]
    ConflictingSchedule,

    #[error("invalid schedule '{expr}': {reason}")]
    InvalidSchedule { expr: String, reason: String },

    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    #[error("unknown reconcile policy: {0}")]
    UnknownReconcilePolicy(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
