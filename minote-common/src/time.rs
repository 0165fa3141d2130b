//! Timestamp utilities
//!
//! All journal timestamps are local wall-clock values at one-second
//! granularity, exchanged as `yyyy-MM-dd HH:mm:ss` (Gregorian calendar,
//! no locale dependence). Callers must stay consistent about the zone.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, Timelike};

/// chrono format string for `yyyy-MM-dd HH:mm:ss`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// chrono format string for `yyyy-MM-dd`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Current local time, truncated to whole seconds
pub fn now() -> NaiveDateTime {
    truncate_to_seconds(Local::now().naive_local())
}

/// Drop sub-second precision
pub fn truncate_to_seconds(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_nanosecond(0).unwrap_or(ts)
}

/// Format a timestamp as `yyyy-MM-dd HH:mm:ss`
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a `yyyy-MM-dd HH:mm:ss` timestamp; surrounding whitespace is ignored
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT).ok()
}

/// Format a date as `yyyy-MM-dd`
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Absolute distance between two timestamps in whole seconds
pub fn seconds_apart(a: &NaiveDateTime, b: &NaiveDateTime) -> i64 {
    (*a - *b).num_seconds().abs()
}

/// Start of a look-back window ending at `end`
///
/// Saturates at the earliest representable timestamp.
pub fn days_before(end: &NaiveDateTime, days: u32) -> NaiveDateTime {
    end.checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(NaiveDateTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap()
    }

    #[test]
    fn test_now_has_no_subsecond_part() {
        assert_eq!(now().nanosecond(), 0);
    }

    #[test]
    fn test_now_returns_recent_timestamp() {
        let timestamp = now();
        // Between 2000-01-01 and 2100-01-01
        assert!(timestamp.and_utc().timestamp() > 946_684_800);
        assert!(timestamp.and_utc().timestamp() < 4_102_444_800);
    }

    #[test]
    fn test_format_and_parse() {
        let t = ts("2024-01-01 10:00:00");
        assert_eq!(format_timestamp(&t), "2024-01-01 10:00:00");
        assert_eq!(parse_timestamp("2024-01-01 10:00:00"), Some(t));
        assert_eq!(parse_timestamp("  2024-01-01 10:00:00 "), Some(t));
    }

    #[test]
    fn test_parse_rejects_other_formats() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("2024/01/01 10:00:00"), None);
        assert_eq!(parse_timestamp("2024-01-01T10:00:00"), None);
        assert_eq!(parse_timestamp("2024-01-01"), None);
        assert_eq!(parse_timestamp("2024-13-01 10:00:00"), None);
    }

    #[test]
    fn test_seconds_apart_is_symmetric() {
        let a = ts("2024-01-01 10:00:00");
        let b = ts("2024-01-01 10:04:00");
        assert_eq!(seconds_apart(&a, &b), 240);
        assert_eq!(seconds_apart(&b, &a), 240);
        assert_eq!(seconds_apart(&a, &a), 0);
    }

    #[test]
    fn test_days_before() {
        let end = ts("2024-03-31 12:00:00");
        assert_eq!(days_before(&end, 30), ts("2024-03-01 12:00:00"));
    }

    #[test]
    fn test_days_before_saturates() {
        let end = ts("2024-03-31 12:00:00");
        assert_eq!(days_before(&end, u32::MAX), NaiveDateTime::MIN);
    }

    #[test]
    fn test_format_date() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
        assert_eq!(format_date(&d), "2024-02-09");
    }
}
