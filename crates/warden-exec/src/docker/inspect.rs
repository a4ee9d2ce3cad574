use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use warden_model::{ContainerView, Labels};

use crate::ExecError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectEntry {
    id: String,
    name: String,
    image: String,
    created: DateTime<Utc>,
    #[serde(default)]
    config: Option<InspectConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectConfig {
    #[serde(default)]
    labels: Option<BTreeMap<String, String>>,
}

/// Map `docker inspect` JSON output to container views.
///
/// `Name` loses its leading `/`; a `null` or missing label map means no labels.
pub fn parse_inspect(json: &str) -> Result<Vec<ContainerView>, ExecError> {
    let entries: Vec<InspectEntry> =
        serde_json::from_str(json).map_err(|e| ExecError::Decode(e.to_string()))?;

    Ok(entries
        .into_iter()
        .map(|e| {
            let labels = Labels::from(e.config.and_then(|c| c.labels).unwrap_or_default());
            let name = e.name.strip_prefix('/').unwrap_or(&e.name).to_string();
            ContainerView::from_labels(e.id, name, e.image, e.created, &labels)
        })
        .collect())
}
