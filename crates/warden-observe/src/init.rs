use tracing::Subscriber;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{LoggerConfig, LoggerError, LoggerFormat, LoggerResult, UtcRfc3339};

/// Install the global tracing subscriber described by `cfg`.
///
/// Can be called once per process; a second call returns [`LoggerError::AlreadyInitialized`].
///
/// ```no_run
/// use warden_observe::{LoggerConfig, init_logger};
///
/// init_logger(&LoggerConfig::default()).expect("logger");
/// tracing::info!("logger initialized");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    let filter = cfg.level.to_env_filter();
    let registry = tracing_subscriber::registry().with(filter);

    match cfg.format {
        LoggerFormat::Text => install(
            registry.with(
                fmt::layer()
                    .with_ansi(cfg.should_use_color())
                    .with_target(cfg.with_targets)
                    .with_timer(UtcRfc3339),
            ),
        ),
        LoggerFormat::Json => install(
            registry.with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_target(cfg.with_targets)
                    .with_timer(UtcRfc3339),
            ),
        ),
        #[cfg(target_os = "linux")]
        LoggerFormat::Journald => {
            let journald = tracing_journald::layer()
                .map_err(|e| LoggerError::JournaldInitFailed(e.to_string()))?;
            install(registry.with(journald))
        }
        #[cfg(not(target_os = "linux"))]
        LoggerFormat::Journald => Err(LoggerError::JournaldNotSupported),
    }
}

fn install<S>(subscriber: S) -> LoggerResult<()>
where
    S: Subscriber + Send + Sync + 'static,
{
    subscriber
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)
}
