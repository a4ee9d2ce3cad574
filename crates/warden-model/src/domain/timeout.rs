use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Grace period a container gets between the stop request and a forced kill.
///
/// Stored as signed milliseconds: operators can type `-5s`, and configuration
/// validation is the place that rejects it, not the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StopTimeout(i64);

impl StopTimeout {
    pub const DEFAULT: StopTimeout = StopTimeout(10_000);

    pub const fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub const fn from_secs(secs: i64) -> Self {
        Self(secs.saturating_mul(1_000))
    }

    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns `None` for negative values.
    pub fn to_duration(&self) -> Option<Duration> {
        u64::try_from(self.0).ok().map(Duration::from_millis)
    }
}

impl Default for StopTimeout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for StopTimeout {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        parse_signed_millis(s).map(Self)
    }
}

impl TryFrom<String> for StopTimeout {
    type Error = ModelError;
    fn try_from(s: String) -> ModelResult<Self> {
        s.parse()
    }
}

impl From<StopTimeout> for String {
    fn from(t: StopTimeout) -> Self {
        t.to_string()
    }
}

impl fmt::Display for StopTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 1_000 == 0 {
            write!(f, "{}s", self.0 / 1_000)
        } else {
            write!(f, "{}ms", self.0)
        }
    }
}

/// Parses a human duration into signed milliseconds.
///
/// Accepts a bare integer (seconds) or anything `humantime` understands
/// (`1h30m`, `500ms`, `250us`, ...), optionally prefixed with a sign.
/// Sub-millisecond remainders are truncated.
pub(crate) fn parse_signed_millis(input: &str) -> ModelResult<i64> {
    let invalid = || ModelError::InvalidDuration(input.to_string());

    let s = input.trim();
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if body.is_empty() || body.starts_with(['-', '+']) {
        return Err(invalid());
    }

    let millis = if body.bytes().all(|b| b.is_ascii_digit()) {
        body.parse::<i64>()
            .ok()
            .and_then(|secs| secs.checked_mul(1_000))
            .ok_or_else(invalid)?
    } else {
        let d = humantime::parse_duration(body).map_err(|_| invalid())?;
        i64::try_from(d.as_millis()).map_err(|_| invalid())?
    };

    Ok(if negative { -millis } else { millis })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_forms() {
        let cases = [
            ("10s", 10_000),
            ("500ms", 500),
            ("2m", 120_000),
            ("1h30m", 5_400_000),
            ("1m 30s", 90_000),
            ("2000us", 2),
            ("1500000ns", 1),
            ("+4s", 4_000),
            ("15", 15_000),
            ("0", 0),
            ("-5s", -5_000),
            (" 3s ", 3_000),
        ];
        for (input, expected) in cases {
            assert_eq!(
                parse_signed_millis(input).unwrap(),
                expected,
                "unexpected value for {input:?}"
            );
        }
    }

    #[test]
    fn rejects_garbage() {
        for input in ["", "-", "--5s", "s", "10x", "ten seconds", "5s3", "1..2s"] {
            assert!(
                parse_signed_millis(input).is_err(),
                "expected error for {input:?}"
            );
        }
    }

    #[test]
    fn negative_timeout_is_representable() {
        let t: StopTimeout = "-1s".parse().unwrap();
        assert!(t.is_negative());
        assert!(t.to_duration().is_none());
    }

    #[test]
    fn default_is_ten_seconds() {
        let t = StopTimeout::default();
        assert_eq!(t.to_duration(), Some(Duration::from_secs(10)));
        assert_eq!(t.to_string(), "10s");
    }

    #[test]
    fn display_keeps_sub_second_precision() {
        assert_eq!(StopTimeout::from_millis(1_500).to_string(), "1500ms");
        assert_eq!(StopTimeout::from_secs(60).to_string(), "60s");
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&StopTimeout::from_secs(30)).unwrap();
        assert_eq!(json, r#""30s""#);

        let back: StopTimeout = serde_json::from_str(r#""250ms""#).unwrap();
        assert_eq!(back.as_millis(), 250);
    }
}
