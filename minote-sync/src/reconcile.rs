//! Reconciliation against an external mood source
//!
//! Pull: fetch external samples and turn the ones the journal does not
//! already know about into new local records. A sample is "known" when
//! a local record is linked to its id, or when a local record's event
//! time or range start lies strictly within `time_window_secs` of the
//! sample's start. The window is coarser than the import duplicate
//! check since sources round timestamps.
//!
//! Push: write unlinked local records to the source one at a time.
//!
//! Neither direction ever fails. Source errors are logged and surface as
//! empty results or failure counts.

use chrono::NaiveDateTime;
use minote_common::config::ReconcileConfig;
use minote_common::time::{self, seconds_apart};
use minote_common::{ExternalMoodRecord, MoodRecord};
use serde::Serialize;
use uuid::Uuid;

use crate::source::ExternalMoodSource;
use crate::valence::{mood_for_valence, NEUTRAL_MOOD};

/// Prefix of the note line carrying external tags
pub const TAG_LINE_PREFIX: &str = "标签: ";

/// Outcome of one push pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub succeeded: usize,
    pub failed: usize,
    /// Records skipped because they already carry an external ref
    pub already_linked: usize,
    /// `(local id, external id)` for every successful save
    pub links: Vec<(Uuid, String)>,
}

/// Reconciliation engine
#[derive(Debug, Clone, Default)]
pub struct ReconciliationEngine {
    config: ReconcileConfig,
}

impl ReconciliationEngine {
    pub fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Records to insert for the external samples `local` does not cover
    ///
    /// Each sample is judged against `local` only; two samples close to
    /// each other in the same batch both produce records.
    pub fn reconcile_incoming(
        &self,
        external: &[ExternalMoodRecord],
        local: &[MoodRecord],
    ) -> Vec<MoodRecord> {
        let now = time::now();
        let mut to_insert = Vec::new();

        for sample in external {
            if let Some(reason) = self.known_reason(sample, local) {
                tracing::debug!(external_id = %sample.id, reason, "Skipping known external record");
                continue;
            }
            to_insert.push(self.adopt(sample, now));
        }

        tracing::info!(
            incoming = external.len(),
            inserted = to_insert.len(),
            "Reconciled external records"
        );
        to_insert
    }

    /// Fetch `[start, end]` from `source` and reconcile against `local`
    ///
    /// Any source error yields an empty result.
    pub async fn pull(
        &self,
        source: &dyn ExternalMoodSource,
        start: NaiveDateTime,
        end: NaiveDateTime,
        local: &[MoodRecord],
    ) -> Vec<MoodRecord> {
        match source.fetch(start, end).await {
            Ok(samples) => {
                tracing::debug!(
                    source = source.name(),
                    fetched = samples.len(),
                    "Fetched external records"
                );
                self.reconcile_incoming(&samples, local)
            }
            Err(e) => {
                tracing::warn!(
                    source = source.name(),
                    error = %e,
                    "External source fetch failed, nothing pulled"
                );
                Vec::new()
            }
        }
    }

    fn known_reason(
        &self,
        sample: &ExternalMoodRecord,
        local: &[MoodRecord],
    ) -> Option<&'static str> {
        let window = i64::try_from(self.config.time_window_secs).unwrap_or(i64::MAX);

        for record in local {
            if record.external_ref.as_deref() == Some(sample.id.as_str()) {
                return Some("linked");
            }
            let near = |t: &NaiveDateTime| seconds_apart(t, &sample.start_time) < window;
            if near(&record.event_time) || record.start_time.as_ref().is_some_and(near) {
                return Some("within time window");
            }
        }
        None
    }

    fn adopt(&self, sample: &ExternalMoodRecord, now: NaiveDateTime) -> MoodRecord {
        let end = sample.end_time.max(sample.start_time);
        MoodRecord::new(
            sample.start_time,
            mood_of(sample),
            Some(self.config.default_activity.clone()),
            note_with_tags(&sample.note, &sample.tags),
        )
        .with_range(Some(sample.start_time), Some(end))
        .with_created_at(now)
        .with_external_ref(sample.id.clone())
    }
}

/// Mood label for an external sample: its label, else its valence bucket
pub fn mood_of(sample: &ExternalMoodRecord) -> String {
    match (&sample.label, sample.valence) {
        (Some(label), _) if !label.trim().is_empty() => label.trim().to_string(),
        (_, Some(valence)) => mood_for_valence(valence).to_string(),
        _ => NEUTRAL_MOOD.to_string(),
    }
}

/// Append `标签: a, b` to `note` (on its own line when `note` is non-empty)
pub fn note_with_tags(note: &str, tags: &[String]) -> String {
    let tags: Vec<&str> = tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()).collect();
    if tags.is_empty() {
        return note.to_string();
    }
    let line = format!("{}{}", TAG_LINE_PREFIX, tags.join(", "));
    if note.is_empty() {
        line
    } else {
        format!("{}\n{}", note, line)
    }
}

/// Save every unlinked record to `source`
///
/// Items are independent: a failure is counted and the pass continues.
pub async fn push_to_source(source: &dyn ExternalMoodSource, records: &[MoodRecord]) -> SyncReport {
    let mut report = SyncReport::default();

    for record in records {
        if record.external_ref.is_some() {
            report.already_linked += 1;
            continue;
        }
        match source.save(record).await {
            Ok(external_id) => {
                tracing::debug!(
                    record_id = %record.id,
                    external_id = %external_id,
                    "Pushed record"
                );
                report.succeeded += 1;
                report.links.push((record.id, external_id));
            }
            Err(e) => {
                tracing::warn!(
                    record_id = %record.id,
                    source = source.name(),
                    error = %e,
                    "Failed to push record"
                );
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        source = source.name(),
        succeeded = report.succeeded,
        failed = report.failed,
        already_linked = report.already_linked,
        "Push complete"
    );
    report
}
