//! Update cycle implementations.
mod hook;
pub use hook::HookCycle;

mod list;
pub use list::ListOnlyCycle;
