//! Process-backed implementations of the core collaborator traits.
//!
//! - [`DockerCli`]: a [`warden_core::ContainerClient`] driving the `docker` binary;
//! - [`HookCycle`]: an [`warden_core::UpdateCycle`] running an operator shell command;
//! - [`ListOnlyCycle`]: an update cycle that only reports what it would touch.
mod error;
pub use error::ExecError;

mod command;
pub use command::OutputLogConfig;

mod docker;
pub use docker::{DEFAULT_API_VERSION, DockerCli, DockerCliConfig, parse_inspect};

mod cycle;
pub use cycle::{HookCycle, ListOnlyCycle};
