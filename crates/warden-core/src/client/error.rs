use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("container runtime unreachable: {0}")]
    Unreachable(String),

    #[error("runtime command `{command}` failed: {stderr}")]
    Command { command: String, stderr: String },

    #[error("malformed runtime response: {0}")]
    Decode(String),

    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::Io(e.to_string())
    }
}
