//! Mood record models
//!
//! `MoodRecord` is the local journal entry. `ExternalMoodRecord` is what an
//! external mood source (a platform health-data service, another journal)
//! hands back from a fetch.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{time, uuid_utils};

/// A single journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodRecord {
    /// Assigned at creation, never reassigned
    pub id: Uuid,
    /// Primary timestamp the record is anchored to
    pub event_time: NaiveDateTime,
    /// Optional explicit range start
    pub start_time: Option<NaiveDateTime>,
    /// Optional explicit range end
    pub end_time: Option<NaiveDateTime>,
    /// Free-form mood label (user-defined labels allowed)
    pub mood: String,
    /// Optional free-form activity label
    pub activity: Option<String>,
    pub note: String,
    /// Set once at creation; import overrides it to keep provenance
    pub created_at: NaiveDateTime,
    /// Identifier of the linked record in an external mood source
    pub external_ref: Option<String>,
}

impl MoodRecord {
    /// Create a record anchored at `event_time` with a fresh id and `created_at = now`
    ///
    /// An empty activity is stored as `None`.
    pub fn new(
        event_time: NaiveDateTime,
        mood: impl Into<String>,
        activity: Option<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid_utils::generate(),
            event_time,
            start_time: None,
            end_time: None,
            mood: mood.into(),
            activity: activity.filter(|a| !a.is_empty()),
            note: note.into(),
            created_at: time::now(),
            external_ref: None,
        }
    }

    /// Set the explicit time range (either end may be absent)
    pub fn with_range(mut self, start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }

    /// Override the creation timestamp (import only)
    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }

    /// Link to an external record
    pub fn with_external_ref(mut self, external_ref: impl Into<String>) -> Self {
        self.external_ref = Some(external_ref.into());
        self
    }

    /// Activity as written to CSV; absent and empty are the same label
    pub fn activity_label(&self) -> &str {
        self.activity.as_deref().unwrap_or("")
    }

    /// Length of the explicit range, when both ends are present
    ///
    /// Inverted ranges are reported as zero.
    pub fn duration(&self) -> Option<Duration> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some((end - start).max(Duration::zero())),
            _ => None,
        }
    }
}

/// A mood sample as supplied by an external mood source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalMoodRecord {
    /// Opaque identifier in the external source
    pub id: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// Mood label, when the source carries one
    pub label: Option<String>,
    /// Signed pleasantness in [-1, 1], when the source carries one
    pub valence: Option<f64>,
    pub note: String,
    /// Source-side labels (appended to the note on import)
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ExternalMoodRecord {
    /// Momentary sample (start == end) with a mood label
    pub fn labeled(id: impl Into<String>, at: NaiveDateTime, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start_time: at,
            end_time: at,
            label: Some(label.into()),
            valence: None,
            note: String::new(),
            tags: Vec::new(),
        }
    }

    /// Momentary sample (start == end) carrying only a valence
    pub fn with_valence(id: impl Into<String>, at: NaiveDateTime, valence: f64) -> Self {
        Self {
            id: id.into(),
            start_time: at,
            end_time: at,
            label: None,
            valence: Some(valence),
            note: String::new(),
            tags: Vec::new(),
        }
    }
}
