//! Container projection and the pure helpers that select and order containers.
mod view;
pub use view::ContainerView;

mod filter;
pub use filter::Filter;

mod order;
pub use order::{created_before, sort_by_created};
