use std::{fmt, sync::Arc};

use super::ContainerView;

/// Pure predicate over a [`ContainerView`].
///
/// Filters are immutable once built, cheap to clone and safe to share across tasks.
#[derive(Clone)]
pub struct Filter {
    name: &'static str,
    pred: Arc<dyn Fn(&ContainerView) -> bool + Send + Sync>,
}

impl Filter {
    /// Wrap an arbitrary predicate.
    pub fn new<F>(name: &'static str, pred: F) -> Self
    where
        F: Fn(&ContainerView) -> bool + Send + Sync + 'static,
    {
        Self {
            name,
            pred: Arc::new(pred),
        }
    }

    /// Accepts every container.
    pub fn all() -> Self {
        Self::new("all", |_| true)
    }

    /// Selects running warden instances that manage `tag`.
    pub fn manager_instances(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self::new("manager-instances", move |c| {
            c.is_manager && c.tag() == Some(tag.as_str())
        })
    }

    /// Selects every container labelled with `tag`, manager instances included.
    pub fn tag(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self::new("tag", move |c| c.tag() == Some(tag.as_str()))
    }

    #[inline]
    pub fn matches(&self, container: &ContainerView) -> bool {
        (self.pred)(container)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter").field("name", &self.name).finish()
    }
}
