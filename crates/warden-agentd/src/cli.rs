use std::net::SocketAddr;

use clap::Parser;
use warden_core::{AgentConfig, AgentConfigBuilder, ConfigError};
use warden_exec::DockerCliConfig;
use warden_model::{ReconcilePolicy, StopTimeout};
use warden_observe::{LoggerConfig, LoggerFormat};

const DEFAULT_DOCKER_HOST: &str = "unix:///var/run/docker.sock";

#[derive(Parser, Debug)]
#[command(
    name = "warden",
    version,
    about = "Keeps the containers of one tag up to date, with exactly one agent per tag"
)]
pub struct Cli {
    /// Daemon socket to connect to.
    #[arg(short = 'H', long, env = "DOCKER_HOST", default_value = DEFAULT_DOCKER_HOST)]
    pub host: String,

    /// Poll interval in seconds. Mutually exclusive with --schedule.
    #[arg(short, long, env = "WARDEN_POLL_INTERVAL")]
    pub interval: Option<u64>,

    /// Cron expression (5 or 6 fields, or `@every <duration>`). Mutually exclusive with --interval.
    #[arg(short, long, env = "WARDEN_SCHEDULE")]
    pub schedule: Option<String>,

    /// Do not pull new images.
    #[arg(long, env = "WARDEN_NO_PULL")]
    pub no_pull: bool,

    /// Do not restart containers after updating.
    #[arg(long, env = "WARDEN_NO_RESTART")]
    pub no_restart: bool,

    /// Remove old images after updating, and the images of retired duplicate agents.
    #[arg(long, env = "WARDEN_CLEANUP")]
    pub cleanup: bool,

    /// Use TLS and verify the remote daemon.
    #[arg(long, env = "DOCKER_TLS_VERIFY")]
    pub tlsverify: bool,

    /// Grace period before a stopped container is killed (e.g. `10s`, `1m30s`).
    #[arg(long, env = "WARDEN_TIMEOUT", default_value = "10s", allow_hyphen_values = true)]
    pub stop_timeout: StopTimeout,

    /// Tag of the containers this agent manages.
    #[arg(long, env = "WARDEN_TAG")]
    pub tag: Option<String>,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,

    /// Log output format: text, json or journald.
    #[arg(long, env = "WARDEN_LOG_FORMAT", default_value = "text")]
    pub log_format: LoggerFormat,

    /// Shell command run as the update step of every cycle.
    #[arg(long, env = "WARDEN_UPDATE_COMMAND")]
    pub update_command: Option<String>,

    /// Serve prometheus metrics on this address.
    #[arg(long, env = "WARDEN_METRICS_ADDR")]
    pub metrics_addr: Option<SocketAddr>,

    /// What to do when retiring a duplicate agent fails: best-effort or strict.
    #[arg(long, env = "WARDEN_RECONCILE_POLICY", default_value = "best-effort")]
    pub reconcile_policy: ReconcilePolicy,
}

impl Cli {
    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            format: self.log_format,
            ..Default::default()
        }
        .with_debug(self.debug)
    }

    pub fn config_builder(&self) -> AgentConfigBuilder {
        let mut b = AgentConfig::builder()
            .cleanup(self.cleanup)
            .no_restart(self.no_restart)
            .stop_timeout(self.stop_timeout)
            .reconcile_policy(self.reconcile_policy);
        if let Some(tag) = &self.tag {
            b = b.tag(tag);
        }
        if let Some(secs) = self.interval {
            b = b.interval_secs(secs);
        }
        if let Some(expr) = &self.schedule {
            b = b.cron(expr);
        }
        b
    }

    pub fn agent_config(&self) -> Result<AgentConfig, ConfigError> {
        self.config_builder().build()
    }

    pub fn docker_config(&self) -> DockerCliConfig {
        DockerCliConfig {
            host: Some(self.host.clone()),
            tls_verify: self.tlsverify.into(),
            ..Default::default()
        }
    }
}
