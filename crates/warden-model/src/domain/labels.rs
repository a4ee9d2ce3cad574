use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{LABEL_MANAGER, LABEL_TAG};

/// Container labels as reported by the runtime.
///
/// Only the two warden keys are interpreted; everything else is carried as-is.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Labels(BTreeMap<String, String>);

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, val: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), val.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// `true` only for the literal value `"true"` under [`LABEL_MANAGER`].
    pub fn marks_manager(&self) -> bool {
        self.get(LABEL_MANAGER) == Some("true")
    }

    /// Value of [`LABEL_TAG`]; an empty value is still a tag.
    pub fn managed_tag(&self) -> Option<&str> {
        self.get(LABEL_TAG)
    }
}

impl From<BTreeMap<String, String>> for Labels {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}
