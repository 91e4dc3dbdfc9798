//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use regex::Regex;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").expect("relative time pattern is valid")
});

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Converts local midnight of `date` to UTC.
///
/// Ambiguous midnights (DST fall-back) resolve to the earlier instant. When
/// midnight does not exist (DST spring-forward) the next hour is used.
pub fn local_midnight_to_utc(date: NaiveDate) -> DateTime<Utc> {
    local_midnight_in(date, &Local)
}

fn local_midnight_in<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(midnight + TimeDelta::hours(1)))
                .earliest()
        })
        .map_or_else(
            || Utc.from_utc_datetime(&midnight),
            |dt| dt.with_timezone(&Utc),
        )
}

/// Parses a datetime argument relative to `now`.
///
/// Supports:
/// - RFC 3339: "2025-01-27T09:00:00Z"
/// - Local date, meaning local midnight: "2025-01-27"
/// - Relative: "2 hours ago", "30 minutes ago", "1 day ago", "1 week ago"
pub fn parse_datetime(s: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(local_midnight_to_utc(date));
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use RFC 3339 (e.g., 2025-01-27T09:00:00Z), a date (2025-01-27) or relative (e.g., '2 days ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    Ok(now - TimeDelta::minutes(n * minutes_per_unit))
}

/// Formats an elapsed time as "Xh Ym", or "Xm" under one hour.
/// Negative durations render as 0m.
pub fn format_duration(duration: TimeDelta) -> String {
    let total_minutes = duration.num_minutes().max(0);
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::FixedOffset;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 29, 16, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_rfc3339() {
        let parsed = parse_datetime("2025-01-27T09:00:00+02:00", now()).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 1, 27, 7, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_relative() {
        assert_eq!(
            parse_datetime("2 hours ago", now()).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 29, 14, 0, 0).unwrap()
        );
        assert_eq!(
            parse_datetime("1 week ago", now()).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 22, 16, 0, 0).unwrap()
        );
        assert_eq!(
            parse_datetime("30 minutes ago", now()).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 29, 15, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_date_is_local_midnight() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 27).unwrap();
        assert_eq!(
            parse_datetime("2025-01-27", now()).unwrap(),
            local_midnight_to_utc(date)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_datetime("last tuesday", now()).unwrap_err();
        assert!(err.to_string().contains("Invalid datetime"));
    }

    #[test]
    fn test_parse_rejects_huge_relative_value() {
        let err = parse_datetime("99999999 weeks ago", now()).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_local_midnight_in_fixed_offset() {
        let tz = FixedOffset::west_opt(8 * 3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 27).unwrap();
        assert_eq!(
            local_midnight_in(date, &tz),
            Utc.with_ymd_and_hms(2025, 1, 27, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_format_duration_hours_and_minutes() {
        assert_eq!(format_duration(TimeDelta::minutes(150)), "2h 30m");
        assert_eq!(format_duration(TimeDelta::hours(1)), "1h 0m");
    }

    #[test]
    fn test_format_duration_minutes_only() {
        assert_eq!(format_duration(TimeDelta::minutes(45)), "45m");
        assert_eq!(format_duration(TimeDelta::seconds(59)), "0m");
    }

    #[test]
    fn test_format_duration_negative_is_zero() {
        assert_eq!(format_duration(TimeDelta::minutes(-5)), "0m");
    }
}
