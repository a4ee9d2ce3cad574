use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Labels;

/// Read-only projection of a running container, as reported by a runtime client.
///
/// Only the fields needed to select containers and pick a survivor among duplicate
/// warden instances are carried here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerView {
    /// Runtime identifier used for stop/remove calls.
    pub id: String,
    /// Human-readable name; may be reused by later containers.
    pub name: String,
    /// Image backing this container (used when cleaning up images).
    pub image: String,
    /// Creation time, used only for relative ordering.
    pub created_at: DateTime<Utc>,
    /// `true` when this container is itself a running warden instance.
    pub is_manager: bool,
    /// Tag the container is managed under; `None` means untagged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_tag: Option<String>,
}

impl ContainerView {
    /// Create an untagged, non-manager view.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        image: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: image.into(),
            created_at,
            is_manager: false,
            managed_tag: None,
        }
    }

    /// Build a view from raw runtime labels.
    ///
    /// - [`crate::LABEL_MANAGER`] set to `"true"` marks a manager instance;
    /// - [`crate::LABEL_TAG`] (any value, including empty) becomes `managed_tag`.
    pub fn from_labels(
        id: impl Into<String>,
        name: impl Into<String>,
        image: impl Into<String>,
        created_at: DateTime<Utc>,
        labels: &Labels,
    ) -> Self {
        Self {
            is_manager: labels.marks_manager(),
            managed_tag: labels.managed_tag().map(str::to_string),
            ..Self::new(id, name, image, created_at)
        }
    }

    /// Mark this view as a warden instance.
    pub fn as_manager(mut self) -> Self {
        self.is_manager = true;
        self
    }

    /// Attach a managed tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.managed_tag = Some(tag.into());
        self
    }

    /// Returns the managed tag, if any.
    pub fn tag(&self) -> Option<&str> {
        self.managed_tag.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LABEL_MANAGER, LABEL_TAG};
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn labels_mark_manager_and_tag() {
        let mut labels = Labels::new();
        labels.insert(LABEL_MANAGER, "true").insert(LABEL_TAG, "prod");

        let view = ContainerView::from_labels("c1", "warden", "sha256:aa", ts(), &labels);
        assert!(view.is_manager);
        assert_eq!(view.tag(), Some("prod"));
    }

    #[test]
    fn manager_label_requires_literal_true() {
        let mut labels = Labels::new();
        labels.insert(LABEL_MANAGER, "yes");

        let view = ContainerView::from_labels("c1", "app", "img", ts(), &labels);
        assert!(!view.is_manager);
        assert_eq!(view.tag(), None);
    }

    #[test]
    fn empty_tag_label_is_still_a_tag() {
        let mut labels = Labels::new();
        labels.insert(LABEL_TAG, "");

        let view = ContainerView::from_labels("c1", "app", "img", ts(), &labels);
        assert_eq!(view.tag(), Some(""));
    }
}
