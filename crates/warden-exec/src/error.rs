use thiserror::Error;
use warden_core::{ClientError, CycleError};

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {}: {stderr}", describe_exit(.code))]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("failed to decode output: {0}")]
    Decode(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("code {c}"),
        None => "a signal".to_string(),
    }
}

impl From<ExecError> for ClientError {
    fn from(e: ExecError) -> Self {
        match e {
            ExecError::Spawn { program, source } => {
                ClientError::Unreachable(format!("cannot run `{program}`: {source}"))
            }
            ExecError::NonZeroExit {
                command, stderr, ..
            } => ClientError::Command { command, stderr },
            ExecError::Decode(msg) => ClientError::Decode(msg),
            ExecError::Io(e) => ClientError::from(e),
            ExecError::InvalidConfig(msg) => ClientError::Unreachable(msg),
        }
    }
}

impl From<ExecError> for CycleError {
    fn from(e: ExecError) -> Self {
        match e {
            e @ (ExecError::NonZeroExit { .. } | ExecError::Spawn { .. }) => {
                CycleError::Command(e.to_string())
            }
            other => CycleError::Internal(other.to_string()),
        }
    }
}
