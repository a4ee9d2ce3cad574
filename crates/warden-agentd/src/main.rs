mod cli;
mod metrics;
mod shutdown;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

use warden_core::{
    ContainerClient, Controller, ExitReason, LogNotifier, MetricsHandle, Reconciler,
    UpdateCycle, noop_metrics,
};
use warden_exec::{DockerCli, HookCycle, ListOnlyCycle};
use warden_observe::init_logger;
use warden_prometheus::PrometheusMetrics;

use crate::{cli::Cli, shutdown::shutdown_signal};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1) logger
    init_logger(&cli.logger_config())?;

    let code = match run(cli).await {
        Ok(reason) => {
            info!(?reason, "exiting");
            reason.exit_code()
        }
        Err(e) => {
            error!("{e:#}");
            1
        }
    };
    std::process::exit(code)
}

async fn run(cli: Cli) -> anyhow::Result<ExitReason> {
    // 2) configuration
    let config = cli.agent_config().context("invalid configuration")?;
    info!(tag = config.tag(), schedule = %config.schedule(), "configuration loaded");

    // 3) collaborators
    let docker: Arc<dyn ContainerClient> =
        Arc::new(DockerCli::new(cli.docker_config()).context("invalid docker settings")?);

    let cycle: Arc<dyn UpdateCycle> = match &cli.update_command {
        Some(command) => Arc::new(HookCycle::new(command.as_str())?.with_no_pull(cli.no_pull)),
        None => {
            if cli.no_pull {
                warn!("--no-pull has no effect without --update-command");
            }
            info!("no update command configured; cycles only list managed containers");
            Arc::new(ListOnlyCycle::new(Arc::clone(&docker)))
        }
    };

    // 4) metrics
    let metrics: MetricsHandle = match cli.metrics_addr {
        Some(addr) => {
            let prom = PrometheusMetrics::new().context("failed to register metrics")?;
            metrics::serve(addr, prom.clone()).await?;
            Arc::new(prom)
        }
        None => noop_metrics(),
    };

    // 5) one agent per tag
    let report = Reconciler::new(Arc::clone(&docker))
        .with_policy(config.reconcile_policy())
        .with_metrics(Arc::clone(&metrics))
        .reconcile(config.tag(), config.cleanup())
        .await
        .context("failed to reconcile running instances")?;
    if !report.is_noop() {
        info!(
            retired = report.retired.len(),
            failed = report.failures.len(),
            "duplicate instances handled"
        );
    }

    // 6) schedule until interrupted
    let controller = Controller::new(config, cycle, Arc::new(LogNotifier)).with_metrics(metrics);
    Ok(controller.run(shutdown_signal()).await?)
}
