use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use crate::{LoggerFormat, LoggerLevel};

/// Logger configuration.
///
/// Missing fields fall back to their defaults when deserialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// `EnvFilter` expression, e.g. `"info"` or `"warden_core=debug,info"`.
    pub level: LoggerLevel,
    /// Include the event target (module path) in text/json output.
    pub with_targets: bool,
    /// Allow ANSI colors in text output.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::Text,
            level: LoggerLevel::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Switch to `debug` verbosity when `debug` is set; keeps the configured level otherwise.
    pub fn with_debug(mut self, debug: bool) -> Self {
        if debug {
            self.level = LoggerLevel::debug();
        }
        self
    }

    /// Colors are used only when enabled *and* stdout is a terminal.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }
}
