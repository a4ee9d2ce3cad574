mod flag;
pub use flag::Flag;

mod labels;
pub use labels::Labels;

mod timeout;
pub use timeout::StopTimeout;
pub(crate) use timeout::parse_signed_millis;

mod constants;
pub use constants::{LABEL_MANAGER, LABEL_TAG};
