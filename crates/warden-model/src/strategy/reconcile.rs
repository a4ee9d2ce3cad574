use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::{ModelError, ModelResult};

/// How failures while retiring duplicate warden instances are treated.
///
/// - `BestEffort`: stop/remove failures are logged and startup continues.
/// - `Strict`: every duplicate is still attempted, but any failure aborts startup.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReconcilePolicy {
    #[default]
    BestEffort,
    Strict,
}

impl FromStr for ReconcilePolicy {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best-effort" | "besteffort" | "" => Ok(ReconcilePolicy::BestEffort),
            "strict" => Ok(ReconcilePolicy::Strict),
            other => Err(ModelError::UnknownReconcilePolicy(other.to_string())),
        }
    }
}

impl fmt::Display for ReconcilePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReconcilePolicy::BestEffort => "best-effort",
            ReconcilePolicy::Strict => "strict",
        })
    }
}
