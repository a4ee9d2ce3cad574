//! Logging bootstrap for warden processes.
//!
//! Everything in the workspace logs through `tracing`; this crate owns the one place
//! where a subscriber is configured and installed.
mod config;
mod error;
mod format;
mod init;
mod level;
mod timer;

pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use format::LoggerFormat;
pub use init::init_logger;
pub use level::LoggerLevel;
pub use timer::UtcRfc3339;
