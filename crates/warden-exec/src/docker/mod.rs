//! [`ContainerClient`] backed by the `docker` command line client.
//!
//! Every call is a short-lived `docker` process. Connection settings are passed the
//! way the CLI reads them: `DOCKER_HOST`, `DOCKER_TLS_VERIFY` and `DOCKER_API_VERSION`.
mod inspect;
pub use inspect::parse_inspect;

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument, trace, warn};
use warden_core::{ClientError, ContainerClient};
use warden_model::{ContainerView, Filter, Flag};

use crate::{
    ExecError,
    command::{Captured, capture},
};

/// Oldest engine API the client negotiates down to.
pub const DEFAULT_API_VERSION: &str = "1.24";

#[derive(Debug, Clone)]
pub struct DockerCliConfig {
    /// Path or name of the docker binary.
    pub binary: String,
    /// Daemon socket; `None` leaves the CLI default in place.
    pub host: Option<String>,
    /// Use TLS and verify the remote.
    pub tls_verify: Flag,
    /// Value for `DOCKER_API_VERSION`.
    pub api_version: String,
}

impl Default for DockerCliConfig {
    fn default() -> Self {
        Self {
            binary: "docker".to_string(),
            host: None,
            tls_verify: Flag::disabled(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl DockerCliConfig {
    pub fn validate(&self) -> Result<(), ExecError> {
        if self.binary.trim().is_empty() {
            return Err(ExecError::InvalidConfig("docker binary is empty".into()));
        }
        if self.host.as_deref().is_some_and(|h| h.trim().is_empty()) {
            return Err(ExecError::InvalidConfig("docker host is empty".into()));
        }
        Ok(())
    }
}

pub struct DockerCli {
    config: DockerCliConfig,
}

impl DockerCli {
    pub fn new(config: DockerCliConfig) -> Result<Self, ExecError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DockerCliConfig {
        &self.config
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.config.binary);
        cmd.args(args);
        if let Some(host) = &self.config.host {
            cmd.env("DOCKER_HOST", host);
        }
        if self.config.tls_verify.is_enabled() {
            cmd.env("DOCKER_TLS_VERIFY", "1");
        }
        cmd.env("DOCKER_API_VERSION", &self.config.api_version);
        cmd
    }

    async fn exec(&self, args: &[&str]) -> Result<Captured, ExecError> {
        trace!(binary = %self.config.binary, ?args, "running docker command");
        capture(self.command(args), &self.config.binary).await
    }
}

#[async_trait]
impl ContainerClient for DockerCli {
    #[instrument(level = "debug", skip(self), fields(filter = filter.name()))]
    async fn list_containers(&self, filter: &Filter) -> Result<Vec<ContainerView>, ClientError> {
        let ids = self
            .exec(&["ps", "-q", "--no-trunc"])
            .await?
            .into_stdout("docker ps")?;

        let ids: Vec<&str> = ids.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        if ids.is_empty() {
            debug!("no running containers");
            return Ok(Vec::new());
        }

        let mut args = vec!["inspect", "--type", "container"];
        args.extend(&ids);
        let out = self.exec(&args).await?;

        // A container that exits between `ps` and `inspect` makes inspect fail while
        // still printing the others.
        let json = if !out.status.success() && out.stdout.trim_start().starts_with('[') {
            warn!(stderr = %out.stderr.trim(), "some containers vanished while inspecting");
            out.stdout
        } else {
            out.into_stdout("docker inspect")?
        };

        let views = parse_inspect(&json)?;
        Ok(views.into_iter().filter(|c| filter.matches(c)).collect())
    }

    #[instrument(level = "debug", skip(self, container), fields(container = %container.name))]
    async fn stop_container(
        &self,
        container: &ContainerView,
        grace: Duration,
    ) -> Result<(), ClientError> {
        let secs = grace.as_secs().to_string();
        let args = ["stop", "--time", secs.as_str(), container.id.as_str()];
        self.exec(&args).await?.into_stdout("docker stop")?;
        debug!("container stopped");
        Ok(())
    }

    #[instrument(level = "debug", skip(self, container), fields(image = %container.image))]
    async fn remove_image(&self, container: &ContainerView) -> Result<(), ClientError> {
        let args = ["image", "rm", container.image.as_str()];
        self.exec(&args).await?.into_stdout("docker image rm")?;
        debug!("image removed");
        Ok(())
    }
}
