//! Well-known container label keys.
//!
//! Runtime clients read these labels when projecting a container into a
//! [`crate::ContainerView`].

/// Label marking a container as a running warden instance.
///
/// The container counts as a manager instance only when the value is `"true"`.
pub const LABEL_MANAGER: &str = "io.warden.manager";

/// Label carrying the tag a container is managed under (or manages, for warden instances).
pub const LABEL_TAG: &str = "io.warden.tag";
