//! Journal statistics

use minote_common::human_time::{format_time_range, format_total_duration};
use minote_common::time::format_timestamp;
use minote_common::MoodRecord;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JournalStats {
    pub total_records: usize,
    /// Records with both range ends present
    pub timed_records: usize,
    /// Sum of all ranges in seconds (inverted ranges count as zero)
    pub total_duration_secs: i64,
}

impl JournalStats {
    pub fn from_records(records: &[MoodRecord]) -> Self {
        records.iter().fold(Self::default(), |mut stats, record| {
            stats.total_records += 1;
            if let Some(duration) = record.duration() {
                stats.timed_records += 1;
                stats.total_duration_secs += duration.num_seconds();
            }
            stats
        })
    }

    /// Total duration as `X小时Y分钟`
    pub fn total_duration_display(&self) -> String {
        format_total_duration(self.total_duration_secs)
    }
}

impl fmt::Display for JournalStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records, {} with a time range, total {}",
            self.total_records,
            self.timed_records,
            self.total_duration_display()
        )
    }
}

/// One-line listing of a record: event time, mood, activity, range, note
pub fn record_line(record: &MoodRecord) -> String {
    let range = format_time_range(record.start_time.as_ref(), record.end_time.as_ref());
    let mut line = format!(
        "{}  {}  {}  {}",
        format_timestamp(&record.event_time),
        record.mood,
        record.activity.as_deref().unwrap_or("-"),
        range
    );
    let note = record.note.trim();
    if !note.is_empty() {
        line.push_str("  ");
        line.push_str(&note.replace('\n', " "));
    }
    line
}
