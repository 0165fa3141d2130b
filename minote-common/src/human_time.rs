//! Human-readable duration and range display
//!
//! Display strings follow the journal's own locale: hours and minutes in
//! Chinese units, clock ranges as `HH:mm - HH:mm`.

use chrono::NaiveDateTime;

const SECONDS_PER_HOUR: i64 = 3600;
const SECONDS_PER_MINUTE: i64 = 60;

/// Shown when a record has no complete time range
pub const NO_RANGE: &str = "无时间段";

/// Format a total journal duration.
///
/// Hours are shown only when non-zero; seconds are truncated. Negative
/// input is treated as zero.
///
/// # Examples
///
/// ```
/// use minote_common::human_time::format_total_duration;
///
/// assert_eq!(format_total_duration(0), "0分钟");
/// assert_eq!(format_total_duration(59), "0分钟");
/// assert_eq!(format_total_duration(45 * 60), "45分钟");
/// assert_eq!(format_total_duration(2 * 3600 + 5 * 60), "2小时5分钟");
/// ```
pub fn format_total_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / SECONDS_PER_HOUR;
    let minutes = seconds % SECONDS_PER_HOUR / SECONDS_PER_MINUTE;

    if hours > 0 {
        format!("{}小时{}分钟", hours, minutes)
    } else {
        format!("{}分钟", minutes)
    }
}

/// Format an explicit time range as `HH:mm - HH:mm`
pub fn format_time_range(start: Option<&NaiveDateTime>, end: Option<&NaiveDateTime>) -> String {
    match (start, end) {
        (Some(start), Some(end)) => {
            format!("{} - {}", start.format("%H:%M"), end.format("%H:%M"))
        }
        _ => NO_RANGE.to_string(),
    }
}
