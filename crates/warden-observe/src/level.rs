use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::LoggerError;

/// Validated `EnvFilter` expression.
///
/// The raw string is kept so the level can be logged and serialized back;
/// [`LoggerLevel::to_env_filter`] rebuilds the filter when the subscriber is installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoggerLevel(String);

impl LoggerLevel {
    pub fn new(s: impl Into<String>) -> Result<Self, LoggerError> {
        Self::try_from(s.into())
    }

    pub fn info() -> Self {
        Self("info".to_string())
    }

    pub fn debug() -> Self {
        Self("debug".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_env_filter(&self) -> EnvFilter {
        // Validated in `try_from`; the fallback only guards against future
        // changes in EnvFilter's grammar.
        EnvFilter::try_new(&self.0).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

impl Default for LoggerLevel {
    fn default() -> Self {
        Self::info()
    }
}

impl FromStr for LoggerLevel {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl TryFrom<String> for LoggerLevel {
    type Error = LoggerError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match EnvFilter::try_new(&s) {
            Ok(_) => Ok(Self(s)),
            Err(e) => Err(LoggerError::InvalidLevel(format!("{s}: {e}"))),
        }
    }
}

impl From<LoggerLevel> for String {
    fn from(l: LoggerLevel) -> Self {
        l.0
    }
}

#[cfg(test)]
mod tests {
    use super::LoggerLevel;

    #[test]
    fn accepts_directives() {
        for lvl in ["info", "debug", "warn", "warden_core=trace,info"] {
            assert!(lvl.parse::<LoggerLevel>().is_ok(), "expected {lvl} to parse");
        }
    }

    #[test]
    fn rejects_bad_directives() {
        for lvl in ["warden_core=lol", "a=trace,b=wat"] {
            assert!(lvl.parse::<LoggerLevel>().is_err(), "expected {lvl} to fail");
        }
    }

    #[test]
    fn serde_keeps_raw_string() {
        let lvl: LoggerLevel = serde_json::from_str(r#""warden_exec=debug,info""#).unwrap();
        assert_eq!(lvl.as_str(), "warden_exec=debug,info");
        assert_eq!(
            serde_json::to_string(&lvl).unwrap(),
            r#""warden_exec=debug,info""#
        );
    }
}
