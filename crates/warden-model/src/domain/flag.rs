use serde::{Deserialize, Serialize};

/// Boolean switch with explicit enable/disable semantics.
///
/// Used for operator toggles such as image cleanup or restart suppression.
/// Defaults to disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flag(bool);

impl Flag {
    pub const fn enabled() -> Self {
        Self(true)
    }

    pub const fn disabled() -> Self {
        Self(false)
    }

    pub const fn is_enabled(&self) -> bool {
        self.0
    }

    pub const fn is_disabled(&self) -> bool {
        !self.0
    }
}

impl From<bool> for Flag {
    fn from(b: bool) -> Self {
        Self(b)
    }
}

impl From<Flag> for bool {
    fn from(f: Flag) -> Self {
        f.0
    }
}

#[cfg(test)]
mod tests {
    use super::Flag;

    #[test]
    fn default_is_disabled() {
        let f = Flag::default();
        assert!(f.is_disabled());
        assert!(!f.is_enabled());
    }

    #[test]
    fn converts_from_and_into_bool() {
        let on: Flag = true.into();
        let off: Flag = false.into();

        assert_eq!(on, Flag::enabled());
        assert_eq!(off, Flag::disabled());
        assert!(bool::from(on));
        assert!(!bool::from(off));
    }

    #[test]
    fn serializes_as_plain_bool() {
        let json = serde_json::to_string(&Flag::enabled()).unwrap();
        assert_eq!(json, "true");

        let back: Flag = serde_json::from_str("false").unwrap();
        assert!(back.is_disabled());
    }
}
