use super::ContainerView;

/// Returns `true` when `a` was created strictly before `b`.
#[inline]
pub fn created_before(a: &ContainerView, b: &ContainerView) -> bool {
    a.created_at < b.created_at
}

/// Sort oldest first.
///
/// The sort is stable: containers with equal creation times keep their input order,
/// so the last element is always a well-defined survivor.
pub fn sort_by_created(containers: &mut [ContainerView]) {
    containers.sort_by(|a, b| a.created_at.cmp(&b.created_at));
}
