use std::{fmt, str::FromStr, time::Duration};

use chrono::Utc;

use crate::{
    domain::parse_signed_millis,
    error::{ModelError, ModelResult},
};

/// Poll interval used when neither an interval nor a cron expression is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(300);

/// Prefix of the synthesized fixed-interval expression.
const EVERY_PREFIX: &str = "@every ";

/// When update cycles should be triggered.
///
/// Resolved once at startup and never mutated; computing the next fire time is
/// the scheduler's job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScheduleSpec {
    /// Cron expression in seconds-first form (6 or 7 fields) or an `@`-descriptor.
    Cron(String),
    /// Fixed interval between runs.
    Every(Duration),
}

impl ScheduleSpec {
    /// Pick the schedule from the two mutually exclusive configuration inputs.
    ///
    /// - both set: [`ModelError::ConflictingSchedule`];
    /// - cron only: the expression (cron or `@every <duration>`), validated;
    /// - otherwise: a fixed interval (`interval_secs` or [`DEFAULT_POLL_INTERVAL`]).
    pub fn resolve(interval_secs: Option<u64>, cron: Option<String>) -> ModelResult<Self> {
        match (interval_secs, cron) {
            (Some(_), Some(_)) => Err(ModelError::ConflictingSchedule),
            (None, Some(expr)) => expr.parse(),
            (Some(secs), None) => Self::every(Duration::from_secs(secs)),
            (None, None) => Self::every(DEFAULT_POLL_INTERVAL),
        }
    }

    /// Fixed-interval schedule.
    ///
    /// Zero intervals are rejected, and so are intervals whose next run would not be
    /// representable as a calendar time.
    pub fn every(interval: Duration) -> ModelResult<Self> {
        let invalid = |reason: &str| ModelError::InvalidSchedule {
            expr: Self::Every(interval).to_string(),
            reason: reason.to_string(),
        };
        if interval.is_zero() {
            return Err(invalid("interval must be greater than zero"));
        }
        chrono::Duration::from_std(interval)
            .ok()
            .and_then(|d| Utc::now().checked_add_signed(d))
            .ok_or_else(|| invalid("interval is out of range"))?;
        Ok(Self::Every(interval))
    }

    /// Cron schedule. Five-field expressions are accepted and normalized.
    pub fn cron(expr: &str) -> ModelResult<Self> {
        let normalized = normalize_cron_expr(expr);
        cron::Schedule::from_str(&normalized).map_err(|e| ModelError::InvalidSchedule {
            expr: expr.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::Cron(normalized))
    }
}

impl FromStr for ScheduleSpec {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        let s = s.trim();
        match s.strip_prefix(EVERY_PREFIX) {
            Some(rest) => {
                let ms = parse_signed_millis(rest)?;
                let ms = u64::try_from(ms).map_err(|_| ModelError::InvalidSchedule {
                    expr: s.to_string(),
                    reason: "interval must not be negative".into(),
                })?;
                Self::every(Duration::from_millis(ms))
            }
            None => Self::cron(s),
        }
    }
}

impl fmt::Display for ScheduleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleSpec::Cron(expr) => f.write_str(expr),
            ScheduleSpec::Every(d) if d.subsec_millis() == 0 => {
                write!(f, "{EVERY_PREFIX}{}s", d.as_secs())
            }
            ScheduleSpec::Every(d) => write!(f, "{EVERY_PREFIX}{}ms", d.as_millis()),
        }
    }
}

/// Accept standard crontab syntax.
///
/// - 5-field expressions (`m h dom mon dow`) get a leading `0` seconds field;
/// - numeric day-of-week values use crontab numbering (`0`-`6`, `0` and `7` are
///   Sunday) and are rewritten to day names, which the `cron` crate reads
///   unambiguously;
/// - `@` descriptors pass through unchanged.
pub fn normalize_cron_expr(expr: &str) -> String {
    let expr = expr.trim();
    if expr.starts_with('@') {
        return expr.to_string();
    }

    let mut fields: Vec<String> = expr.split_whitespace().map(str::to_string).collect();
    if fields.len() == 5 {
        fields.insert(0, "0".to_string());
    }
    if let Some(dow) = fields.get_mut(5) {
        *dow = normalize_dow_field(dow);
    }
    fields.join(" ")
}

const DAY_NAMES: [&str; 8] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];

fn day_name(token: &str) -> Option<&'static str> {
    token.parse::<usize>().ok().and_then(|n| DAY_NAMES.get(n).copied())
}

/// Rewrite each comma-separated item of a day-of-week field.
///
/// Tokens that are not plain `0`-`7` numbers are left for the cron parser to judge.
fn normalize_dow_field(field: &str) -> String {
    field
        .split(',')
        .map(|item| {
            let (range, step) = match item.split_once('/') {
                Some((range, step)) => (range, Some(step)),
                None => (item, None),
            };
            let with_step = |r: String| match step {
                Some(step) => format!("{r}/{step}"),
                None => r,
            };

            match range.split_once('-') {
                Some((lo, hi)) => match (day_name(lo), day_name(hi)) {
                    // `5-7` and `1-0` end on Sunday, which sorts first for the
                    // cron crate; split the range at Saturday.
                    (Some(l), Some("SUN")) if step.is_none() && l != "SUN" => {
                        format!("{l}-SAT,SUN")
                    }
                    (Some(l), Some(h)) => with_step(format!("{l}-{h}")),
                    _ => item.to_string(),
                },
                None => match day_name(range) {
                    Some(name) => with_step(name.to_string()),
                    None => item.to_string(),
                },
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_five_minutes() {
        let spec = ScheduleSpec::resolve(None, None).unwrap();
        assert_eq!(spec, ScheduleSpec::Every(Duration::from_secs(300)));
        assert_eq!(spec.to_string(), "@every 300s");
    }

    #[test]
    fn interval_only_is_synthesized() {
        let spec = ScheduleSpec::resolve(Some(30), None).unwrap();
        assert_eq!(spec.to_string(), "@every 30s");
    }

    #[test]
    fn cron_only_is_used_verbatim() {
        let spec = ScheduleSpec::resolve(None, Some("0 0 4 * * *".into())).unwrap();
        assert_eq!(spec, ScheduleSpec::Cron("0 0 4 * * *".into()));
    }

    #[test]
    fn both_modes_conflict() {
        let err = ScheduleSpec::resolve(Some(60), Some("0 0 4 * * *".into())).unwrap_err();
        assert!(matches!(err, ModelError::ConflictingSchedule));
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(ScheduleSpec::resolve(Some(0), None).is_err());
    }

    #[test]
    fn huge_interval_is_rejected() {
        let err = ScheduleSpec::resolve(Some(u64::MAX), None).unwrap_err();
        assert!(matches!(err, ModelError::InvalidSchedule { .. }));

        // Fits in a chrono duration but lands past the last representable date.
        let err = ScheduleSpec::every(Duration::from_secs(10_000_000_000_000)).unwrap_err();
        assert!(matches!(err, ModelError::InvalidSchedule { .. }));

        assert!(ScheduleSpec::every(Duration::from_secs(366 * 24 * 3_600)).is_ok());
    }

    #[test]
    fn five_field_cron_gains_seconds() {
        let spec = ScheduleSpec::cron("*/5 * * * *").unwrap();
        assert_eq!(spec, ScheduleSpec::Cron("0 */5 * * * *".into()));
    }

    fn weekdays_after(expr: &str, from: &str, n: usize) -> Vec<chrono::Weekday> {
        use chrono::{Datelike, Utc};

        let ScheduleSpec::Cron(normalized) = ScheduleSpec::cron(expr).unwrap() else {
            panic!("expected a cron schedule");
        };
        let from: chrono::DateTime<Utc> = from.parse().unwrap();
        cron::Schedule::from_str(&normalized)
            .unwrap()
            .after(&from)
            .take(n)
            .map(|t| t.weekday())
            .collect()
    }

    #[test]
    fn weekday_range_uses_crontab_numbering() {
        use chrono::Weekday::*;

        // 2024-01-06 is a Saturday.
        let days = weekdays_after("0 4 * * 1-5", "2024-01-06T00:00:00Z", 5);
        assert_eq!(days, [Mon, Tue, Wed, Thu, Fri]);
    }

    #[test]
    fn zero_and_seven_are_sunday() {
        use chrono::Weekday::*;

        assert_eq!(weekdays_after("0 4 * * 0", "2024-01-06T00:00:00Z", 2), [Sun, Sun]);
        assert_eq!(weekdays_after("0 4 * * 7", "2024-01-06T00:00:00Z", 1), [Sun]);
        assert_eq!(
            weekdays_after("0 4 * * 5-7", "2024-01-01T00:00:00Z", 3),
            [Fri, Sat, Sun]
        );
    }

    #[test]
    fn day_of_week_rewrite() {
        assert_eq!(normalize_cron_expr("0 4 * * 1-5"), "0 0 4 * * MON-FRI");
        assert_eq!(normalize_cron_expr("0 0 4 * * 0,6"), "0 0 4 * * SUN,SAT");
        assert_eq!(normalize_cron_expr("0 4 * * */2"), "0 0 4 * * */2");
        assert_eq!(normalize_cron_expr("0 4 * * 1-5/2"), "0 0 4 * * MON-FRI/2");
        assert_eq!(normalize_cron_expr("0 4 * * Mon"), "0 0 4 * * Mon");
        assert_eq!(normalize_cron_expr("@daily"), "@daily");
    }

    #[test]
    fn descriptors_pass_through() {
        let spec = ScheduleSpec::cron("@hourly").unwrap();
        assert_eq!(spec, ScheduleSpec::Cron("@hourly".into()));
    }

    #[test]
    fn invalid_cron_is_rejected() {
        let err = ScheduleSpec::cron("not a cron").unwrap_err();
        assert!(matches!(err, ModelError::InvalidSchedule { .. }));
    }

    #[test]
    fn parses_every_expressions() {
        let spec: ScheduleSpec = "@every 1m30s".parse().unwrap();
        assert_eq!(spec, ScheduleSpec::Every(Duration::from_secs(90)));

        assert!("@every -5s".parse::<ScheduleSpec>().is_err());
        assert!("@every 0s".parse::<ScheduleSpec>().is_err());
    }

    #[test]
    fn every_expression_is_accepted_as_schedule() {
        let spec = ScheduleSpec::resolve(None, Some("@every 2h".into())).unwrap();
        assert_eq!(spec, ScheduleSpec::Every(Duration::from_secs(7_200)));
    }
}
