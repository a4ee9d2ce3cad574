use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument};
use warden_core::{CycleError, CycleParams, UpdateCycle};
use warden_model::Flag;

use crate::{
    ExecError,
    command::{OutputLogConfig, stream},
};

/// Runs an operator-supplied shell command as the update step.
///
/// The command sees the cycle parameters as environment variables:
/// `WARDEN_TAG`, `WARDEN_CLEANUP`, `WARDEN_NO_RESTART`, `WARDEN_NO_PULL` and
/// `WARDEN_STOP_TIMEOUT_SECS`. A non-zero exit fails the cycle.
#[derive(Debug, Clone)]
pub struct HookCycle {
    shell: String,
    command: String,
    no_pull: Flag,
    log: OutputLogConfig,
}

impl HookCycle {
    pub fn new(command: impl Into<String>) -> Result<Self, ExecError> {
        let command = command.into();
        if command.trim().is_empty() {
            return Err(ExecError::InvalidConfig("update command is empty".into()));
        }
        Ok(Self {
            shell: "sh".to_string(),
            command,
            no_pull: Flag::disabled(),
            log: OutputLogConfig::default(),
        })
    }

    pub fn with_no_pull(mut self, no_pull: impl Into<Flag>) -> Self {
        self.no_pull = no_pull.into();
        self
    }

    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn with_log_config(mut self, log: OutputLogConfig) -> Self {
        self.log = log;
        self
    }

    fn build(&self, params: &CycleParams) -> Command {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c").arg(&self.command);
        cmd.env("WARDEN_TAG", &params.tag)
            .env("WARDEN_CLEANUP", bool_env(params.cleanup))
            .env("WARDEN_NO_RESTART", bool_env(params.no_restart))
            .env("WARDEN_NO_PULL", bool_env(self.no_pull))
            .env("WARDEN_STOP_TIMEOUT_SECS", params.stop_timeout.as_secs().to_string());
        cmd
    }
}

fn bool_env(flag: Flag) -> &'static str {
    if flag.is_enabled() { "true" } else { "false" }
}

#[async_trait]
impl UpdateCycle for HookCycle {
    fn name(&self) -> &'static str {
        "hook"
    }

    #[instrument(level = "debug", skip(self, params), fields(tag = %params.tag))]
    async fn run(&self, params: &CycleParams) -> Result<(), CycleError> {
        debug!(command = %self.command, "running update command");

        let (status, stderr) = stream(self.build(params), &self.shell, self.log).await?;
        if !status.success() {
            return Err(ExecError::NonZeroExit {
                command: self.command.clone(),
                code: status.code(),
                stderr,
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use warden_model::Filter;

    fn params() -> CycleParams {
        CycleParams {
            tag: "prod".into(),
            filter: Filter::tag("prod"),
            cleanup: Flag::enabled(),
            no_restart: Flag::disabled(),
            stop_timeout: Duration::from_secs(30),
        }
    }

    #[test]
    fn empty_command_is_rejected() {
        assert!(matches!(HookCycle::new("  "), Err(ExecError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn exports_cycle_parameters() {
        let hook = HookCycle::new(
            r#"test "$WARDEN_TAG" = prod \
              && test "$WARDEN_CLEANUP" = true \
              && test "$WARDEN_NO_RESTART" = false \
              && test "$WARDEN_NO_PULL" = true \
              && test "$WARDEN_STOP_TIMEOUT_SECS" = 30"#,
        )
        .unwrap()
        .with_no_pull(true);

        hook.run(&params()).await.unwrap();
    }

    #[tokio::test]
    async fn non_zero_exit_fails_the_cycle() {
        let hook = HookCycle::new("echo pull failed >&2; exit 3").unwrap();

        match hook.run(&params()).await.unwrap_err() {
            CycleError::Command(msg) => {
                assert!(msg.contains("code 3"), "{msg}");
                assert!(msg.contains("pull failed"), "{msg}");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_shell_fails_the_cycle() {
        let hook = HookCycle::new("true")
            .unwrap()
            .with_shell("/nonexistent/sh");
        assert!(matches!(hook.run(&params()).await, Err(CycleError::Command(_))));
    }
}
