//! CSV row codec for mood records
//!
//! One record per line, comma-delimited, no quoting. Field order of the
//! current schema:
//!
//! `eventTime, mood, activity, note, startTime, endTime, createdAt`
//!
//! Older exports are still readable; the schema is picked by field count:
//!
//! | fields | schema      | order                                              |
//! |--------|-------------|----------------------------------------------------|
//! | >= 7   | `Current`   | eventTime, mood, activity, note, start, end, created |
//! | 6      | `RangeOnly` | start, end, mood, activity, note, created          |
//! | 5      | `Legacy`    | eventTime, mood, activity, note, created           |
//!
//! The note escaping is lossy: commas become semicolons on the way out and
//! every semicolon becomes a comma on the way in, so a semicolon the user
//! typed comes back as a comma.

use chrono::NaiveDateTime;
use minote_common::time::{format_timestamp, parse_timestamp};
use minote_common::MoodRecord;
use thiserror::Error;

/// Field delimiter
pub const DELIMITER: char = ',';

/// Stand-in for the delimiter inside free text
pub const DELIMITER_SUBSTITUTE: char = ';';

/// Header row of the current schema
pub const HEADER_FIELDS: [&str; 7] = [
    "记录时间", "心情", "活动", "笔记", "开始时间", "结束时间", "创建时间",
];

/// Fewest fields any known schema has
pub const MIN_FIELDS: usize = 5;

/// Export schema a row was written with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    /// 5 fields, no time range
    Legacy,
    /// 6 fields, time range only (eventTime taken from startTime)
    RangeOnly,
    /// 7 fields, eventTime plus optional time range
    Current,
}

impl SchemaVersion {
    /// Pick the schema for a row with `count` fields
    pub fn from_field_count(count: usize) -> Option<Self> {
        match count {
            0..=4 => None,
            5 => Some(Self::Legacy),
            6 => Some(Self::RangeOnly),
            _ => Some(Self::Current),
        }
    }
}

/// Why a row could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("blank line")]
    Blank,

    #[error("expected at least {MIN_FIELDS} fields, found {found}")]
    TooFewFields { found: usize },

    #[error("{field} is not a yyyy-MM-dd HH:mm:ss timestamp: '{value}'")]
    BadTimestamp { field: &'static str, value: String },
}

/// Header line of the current schema (no trailing newline)
pub fn encode_header() -> String {
    HEADER_FIELDS.join(",")
}

/// Encode one record as a row of the current schema (no trailing newline)
pub fn encode_row(record: &MoodRecord) -> String {
    let fields = [
        format_timestamp(&record.event_time),
        escape_label(&record.mood),
        record.activity.as_deref().map(escape_label).unwrap_or_default(),
        escape_note(&record.note),
        format_optional(record.start_time.as_ref()),
        format_optional(record.end_time.as_ref()),
        format_timestamp(&record.created_at),
    ];
    fields.join(",")
}

/// Decode one data row into a new record
///
/// The record gets a fresh id and no external link; `created_at` is taken
/// from the row.
pub fn decode_row(line: &str) -> Result<MoodRecord, RowError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(RowError::Blank);
    }

    let fields: Vec<&str> = line.split(DELIMITER).collect();
    let schema = SchemaVersion::from_field_count(fields.len())
        .ok_or(RowError::TooFewFields { found: fields.len() })?;

    let record = match schema {
        SchemaVersion::Current => {
            let event_time = required_timestamp("eventTime", fields[0])?;
            let start_time = optional_timestamp("startTime", fields[4])?;
            let end_time = optional_timestamp("endTime", fields[5])?;
            let created_at = required_timestamp("createdAt", fields[6])?;
            MoodRecord::new(
                event_time,
                unescape_note(fields[1]),
                optional_label(fields[2]),
                unescape_note(fields[3]),
            )
            .with_range(start_time, end_time)
            .with_created_at(created_at)
        }
        SchemaVersion::RangeOnly => {
            let start_time = required_timestamp("startTime", fields[0])?;
            let end_time = required_timestamp("endTime", fields[1])?;
            let created_at = required_timestamp("createdAt", fields[5])?;
            MoodRecord::new(
                start_time,
                unescape_note(fields[2]),
                optional_label(fields[3]),
                unescape_note(fields[4]),
            )
            .with_range(Some(start_time), Some(end_time))
            .with_created_at(created_at)
        }
        SchemaVersion::Legacy => {
            let event_time = required_timestamp("eventTime", fields[0])?;
            let created_at = required_timestamp("createdAt", fields[4])?;
            MoodRecord::new(
                event_time,
                unescape_note(fields[1]),
                optional_label(fields[2]),
                unescape_note(fields[3]),
            )
            .with_created_at(created_at)
        }
    };

    Ok(record)
}

/// Replace line breaks with a space and the delimiter with its substitute
pub fn escape_note(note: &str) -> String {
    note.replace("\r\n", " ")
        .replace(|c: char| c == '\n' || c == '\r', " ")
        .replace(DELIMITER, &DELIMITER_SUBSTITUTE.to_string())
}

/// Turn every delimiter substitute back into the delimiter
pub fn unescape_note(note: &str) -> String {
    note.replace(DELIMITER_SUBSTITUTE, &DELIMITER.to_string())
}

// Labels share the note escaping, including its loss of user semicolons
fn escape_label(label: &str) -> String {
    escape_note(label)
}

fn optional_label(field: &str) -> Option<String> {
    if field.is_empty() {
        None
    } else {
        Some(unescape_note(field))
    }
}

fn format_optional(ts: Option<&NaiveDateTime>) -> String {
    ts.map(format_timestamp).unwrap_or_default()
}

fn required_timestamp(field: &'static str, value: &str) -> Result<NaiveDateTime, RowError> {
    parse_timestamp(value).ok_or_else(|| RowError::BadTimestamp {
        field,
        value: value.to_string(),
    })
}

fn optional_timestamp(
    field: &'static str,
    value: &str,
) -> Result<Option<NaiveDateTime>, RowError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    required_timestamp(field, value).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    fn sample() -> MoodRecord {
        MoodRecord::new(
            ts("2024-01-01 10:00:00"),
            "开心",
            Some("学习".to_string()),
            "复习,第二章\n效率不错",
        )
        .with_range(Some(ts("2024-01-01 09:00:00")), Some(ts("2024-01-01 10:00:00")))
        .with_created_at(ts("2024-01-01 10:01:00"))
    }

    fn assert_same_content(decoded: &MoodRecord, original: &MoodRecord, note: &str) {
        assert_eq!(decoded.event_time, original.event_time);
        assert_eq!(decoded.start_time, original.start_time);
        assert_eq!(decoded.end_time, original.end_time);
        assert_eq!(decoded.mood, original.mood);
        assert_eq!(decoded.activity, original.activity);
        assert_eq!(decoded.note, note);
        assert_eq!(decoded.created_at, original.created_at);
        assert!(decoded.external_ref.is_none());
    }

    #[test]
    fn test_header_matches_field_order() {
        assert_eq!(
            encode_header(),
            "记录时间,心情,活动,笔记,开始时间,结束时间,创建时间"
        );
    }

    #[test]
    fn test_encode_row_layout() {
        assert_eq!(
            encode_row(&sample()),
            "2024-01-01 10:00:00,开心,学习,复习;第二章 效率不错,2024-01-01 09:00:00,2024-01-01 10:00:00,2024-01-01 10:01:00"
        );
    }

    #[test]
    fn test_encode_absent_optionals_as_empty() {
        let record = MoodRecord::new(ts("2024-01-01 10:00:00"), "平静", None, "")
            .with_created_at(ts("2024-01-01 10:00:00"));
        assert_eq!(
            encode_row(&record),
            "2024-01-01 10:00:00,平静,,,,,2024-01-01 10:00:00"
        );
    }

    #[test]
    fn test_round_trip_restores_commas_and_flattens_newlines() {
        let original = sample();
        let decoded = decode_row(&encode_row(&original)).unwrap();
        assert_same_content(&decoded, &original, "复习,第二章 效率不错");
        assert_ne!(decoded.id, original.id);
    }

    #[test]
    fn test_round_trip_every_range_combination() {
        let start = Some(ts("2024-01-01 09:00:00"));
        let end = Some(ts("2024-01-01 09:30:00"));
        for (s, e) in [(None, None), (start, None), (None, end), (start, end)] {
            let original = MoodRecord::new(ts("2024-01-01 10:00:00"), "难过", None, "plain")
                .with_range(s, e)
                .with_created_at(ts("2024-01-02 08:00:00"));
            let decoded = decode_row(&encode_row(&original)).unwrap();
            assert_same_content(&decoded, &original, "plain");
        }
    }

    #[test]
    fn test_user_semicolons_come_back_as_commas() {
        let original = MoodRecord::new(ts("2024-01-01 10:00:00"), "开心", None, "a;b")
            .with_created_at(ts("2024-01-01 10:00:00"));
        let decoded = decode_row(&encode_row(&original)).unwrap();
        assert_eq!(decoded.note, "a,b");
    }

    #[test]
    fn test_carriage_returns_flattened() {
        assert_eq!(escape_note("a\r\nb\rc\nd"), "a b c d");
    }

    #[test]
    fn test_round_trip_labels_with_delimiter() {
        let original =
            MoodRecord::new(ts("2024-01-01 10:00:00"), "开心,激动", Some("a,b".into()), "")
                .with_created_at(ts("2024-01-01 10:00:00"));
        let row = encode_row(&original);
        assert_eq!(row.split(DELIMITER).count(), 7);
        let decoded = decode_row(&row).unwrap();
        assert_same_content(&decoded, &original, "");
    }

    #[test]
    fn test_round_trip_empty_activity() {
        let mut original = MoodRecord::new(ts("2024-01-01 10:00:00"), "开心", None, "")
            .with_created_at(ts("2024-01-01 10:00:00"));
        original.activity = Some(String::new());
        let decoded = decode_row(&encode_row(&original)).unwrap();
        assert_eq!(decoded.activity, None);
        assert_eq!(decoded.activity_label(), original.activity_label());
    }

    #[test]
    fn test_decode_legacy_row() {
        let record =
            decode_row("2024-01-01 10:00:00,开心,学习,笔记内容,2024-01-01 09:00:00").unwrap();
        assert_eq!(record.event_time, ts("2024-01-01 10:00:00"));
        assert_eq!(record.mood, "开心");
        assert_eq!(record.activity.as_deref(), Some("学习"));
        assert_eq!(record.note, "笔记内容");
        assert_eq!(record.start_time, None);
        assert_eq!(record.end_time, None);
        assert_eq!(record.created_at, ts("2024-01-01 09:00:00"));
    }

    #[test]
    fn test_decode_range_only_row() {
        let record = decode_row(
            "2024-01-01 09:00:00,2024-01-01 10:00:00,平静,休息,午睡,2024-01-01 10:05:00",
        )
        .unwrap();
        assert_eq!(record.event_time, ts("2024-01-01 09:00:00"));
        assert_eq!(record.start_time, Some(ts("2024-01-01 09:00:00")));
        assert_eq!(record.end_time, Some(ts("2024-01-01 10:00:00")));
        assert_eq!(record.mood, "平静");
        assert_eq!(record.activity.as_deref(), Some("休息"));
        assert_eq!(record.note, "午睡");
    }

    #[test]
    fn test_extra_trailing_fields_ignored() {
        let record = decode_row(
            "2024-01-01 10:00:00,开心,,note,,,2024-01-01 10:00:00,extra,more",
        )
        .unwrap();
        assert_eq!(record.note, "note");
        assert_eq!(record.activity, None);
    }

    #[test]
    fn test_schema_by_field_count() {
        assert_eq!(SchemaVersion::from_field_count(4), None);
        assert_eq!(SchemaVersion::from_field_count(5), Some(SchemaVersion::Legacy));
        assert_eq!(SchemaVersion::from_field_count(6), Some(SchemaVersion::RangeOnly));
        assert_eq!(SchemaVersion::from_field_count(7), Some(SchemaVersion::Current));
        assert_eq!(SchemaVersion::from_field_count(9), Some(SchemaVersion::Current));
    }

    #[test]
    fn test_rejects_blank_and_short_rows() {
        assert_eq!(decode_row(""), Err(RowError::Blank));
        assert_eq!(decode_row("   \t "), Err(RowError::Blank));
        assert_eq!(
            decode_row("2024-01-01 10:00:00,开心,学习,笔记"),
            Err(RowError::TooFewFields { found: 4 })
        );
    }

    #[test]
    fn test_rejects_bad_mandatory_timestamps() {
        assert!(matches!(
            decode_row("yesterday,开心,学习,笔记,,,2024-01-01 10:00:00"),
            Err(RowError::BadTimestamp { field: "eventTime", .. })
        ));
        assert!(matches!(
            decode_row("2024-01-01 10:00:00,开心,学习,笔记,,,"),
            Err(RowError::BadTimestamp { field: "createdAt", .. })
        ));
        assert!(matches!(
            decode_row("2024-01-01 10:00:00,开心,学习,笔记,2024/01/01"),
            Err(RowError::BadTimestamp { field: "createdAt", .. })
        ));
    }

    #[test]
    fn test_rejects_garbage_in_optional_timestamp() {
        assert!(matches!(
            decode_row("2024-01-01 10:00:00,开心,学习,笔记,soon,,2024-01-01 10:00:00"),
            Err(RowError::BadTimestamp { field: "startTime", .. })
        ));
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let record =
            decode_row("  2024-01-01 10:00:00,开心,学习,笔记内容,2024-01-01 09:00:00 \r")
                .unwrap();
        assert_eq!(record.created_at, ts("2024-01-01 09:00:00"));
    }
}
