//! External mood source interface
//!
//! A platform health-data service or another journal that can hand back
//! mood samples for a time window, accept new ones, and delete them by
//! id. Every operation may fail; callers are expected to degrade rather
//! than abort.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use minote_common::{uuid_utils, ExternalMoodRecord, MoodRecord};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::valence::valence_for_mood;

/// Errors reported by an external mood source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// Source not reachable or not supported on this device
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    /// Access to mood data was not granted
    #[error("Access to mood data not authorized")]
    Unauthorized,

    /// Source refused a single write
    #[error("Source rejected the record: {0}")]
    Rejected(String),

    /// No record with this id in the source
    #[error("No external record with id {0}")]
    NotFound(String),
}

/// An external store of mood samples
#[async_trait]
pub trait ExternalMoodSource: Send + Sync {
    /// Short name used in log output
    fn name(&self) -> &str;

    /// Samples whose start time falls within `[start, end]`
    async fn fetch(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<ExternalMoodRecord>, SourceError>;

    /// Write `record` to the source and return its external id
    async fn save(&self, record: &MoodRecord) -> Result<String, SourceError>;

    /// Delete the sample with external id `id`
    async fn delete(&self, id: &str) -> Result<(), SourceError>;
}

/// Convert a local record into the shape the source stores
///
/// Records without an explicit range become momentary samples at their
/// event time.
pub fn to_external(record: &MoodRecord, id: impl Into<String>) -> ExternalMoodRecord {
    let start = record.start_time.unwrap_or(record.event_time);
    let end = record.end_time.unwrap_or(start).max(start);
    ExternalMoodRecord {
        id: id.into(),
        start_time: start,
        end_time: end,
        label: Some(record.mood.clone()),
        valence: Some(valence_for_mood(&record.mood)),
        note: record.note.clone(),
        tags: record.activity.iter().cloned().collect(),
    }
}

/// In-memory source for tests and offline use
pub struct MemorySource {
    samples: RwLock<Vec<ExternalMoodRecord>>,
    rejected: RwLock<HashSet<Uuid>>,
    available: AtomicBool,
    authorized: AtomicBool,
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySource {
    pub fn new() -> Self {
        Self::with_samples(Vec::new())
    }

    pub fn with_samples(samples: Vec<ExternalMoodRecord>) -> Self {
        Self {
            samples: RwLock::new(samples),
            rejected: RwLock::new(HashSet::new()),
            available: AtomicBool::new(true),
            authorized: AtomicBool::new(true),
        }
    }

    /// Toggle reachability (an unavailable source fails every call)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Toggle read/write permission
    pub fn set_authorized(&self, authorized: bool) {
        self.authorized.store(authorized, Ordering::SeqCst);
    }

    /// Make every later `save` of the local record `id` fail
    pub async fn reject_saves_of(&self, id: Uuid) {
        self.rejected.write().await.insert(id);
    }

    /// Snapshot of all stored samples
    pub async fn samples(&self) -> Vec<ExternalMoodRecord> {
        self.samples.read().await.clone()
    }

    fn check_access(&self) -> Result<(), SourceError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(SourceError::Unavailable("memory source switched off".to_string()));
        }
        if !self.authorized.load(Ordering::SeqCst) {
            return Err(SourceError::Unauthorized);
        }
        Ok(())
    }
}

#[async_trait]
impl ExternalMoodSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<ExternalMoodRecord>, SourceError> {
        self.check_access()?;
        let mut found: Vec<ExternalMoodRecord> = self
            .samples
            .read()
            .await
            .iter()
            .filter(|s| s.start_time >= start && s.start_time <= end)
            .cloned()
            .collect();
        // Newest first
        found.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(found)
    }

    async fn save(&self, record: &MoodRecord) -> Result<String, SourceError> {
        self.check_access()?;
        if self.rejected.read().await.contains(&record.id) {
            return Err(SourceError::Rejected(format!("record {}", record.id)));
        }
        let id = format!("mem-{}", uuid_utils::generate());
        self.samples.write().await.push(to_external(record, id.clone()));
        Ok(id)
    }

    async fn delete(&self, id: &str) -> Result<(), SourceError> {
        self.check_access()?;
        let mut samples = self.samples.write().await;
        let before = samples.len();
        samples.retain(|s| s.id != id);
        if samples.len() == before {
            return Err(SourceError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
