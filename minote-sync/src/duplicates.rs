//! Duplicate classifier
//!
//! Decides whether an incoming record repeats one already in the journal.
//! Tiers are evaluated top to bottom, first match wins:
//!
//! 1. **Exact time**: event times within `exact_time_tolerance_secs`
//!    (default 1s), same mood, same activity, same note after trimming.
//! 2. **Loose time** (opt-in): event times within
//!    `loose_time_tolerance_secs` (default 300s), same mood and activity,
//!    and either both notes empty or both non-empty with similarity
//!    strictly above `similarity_threshold` (default 0.8).
//!
//! Thresholds are configuration, not constants: the right window is a
//! product decision.

use minote_common::config::DuplicateConfig;
use minote_common::time::seconds_apart;
use minote_common::MoodRecord;

use crate::similarity::similarity;

/// Which rule matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateTier {
    ExactTime,
    LooseTime,
}

/// Duplicate classifier
#[derive(Debug, Clone, Default)]
pub struct DuplicateClassifier {
    config: DuplicateConfig,
}

impl DuplicateClassifier {
    pub fn new(config: DuplicateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DuplicateConfig {
        &self.config
    }

    /// True if `candidate` duplicates `existing` under any enabled tier
    pub fn is_duplicate(&self, existing: &MoodRecord, candidate: &MoodRecord) -> bool {
        self.match_tier(existing, candidate).is_some()
    }

    /// The first tier under which `candidate` duplicates `existing`
    pub fn match_tier(
        &self,
        existing: &MoodRecord,
        candidate: &MoodRecord,
    ) -> Option<DuplicateTier> {
        let apart = seconds_apart(&existing.event_time, &candidate.event_time).unsigned_abs();
        let same_labels = existing.mood == candidate.mood
            && existing.activity_label() == candidate.activity_label();
        if !same_labels {
            return None;
        }

        let existing_note = existing.note.trim();
        let candidate_note = candidate.note.trim();

        if apart <= self.config.exact_time_tolerance_secs && existing_note == candidate_note {
            return Some(DuplicateTier::ExactTime);
        }

        if self.config.loose_tier_enabled
            && apart <= self.config.loose_time_tolerance_secs
            && self.notes_similar(existing_note, candidate_note)
        {
            return Some(DuplicateTier::LooseTime);
        }

        None
    }

    /// First record in `existing` that `candidate` duplicates, with the tier
    pub fn find_duplicate<'a>(
        &self,
        candidate: &MoodRecord,
        existing: &'a [MoodRecord],
    ) -> Option<(&'a MoodRecord, DuplicateTier)> {
        let found = existing
            .iter()
            .find_map(|e| self.match_tier(e, candidate).map(|tier| (e, tier)));

        if let Some((original, tier)) = found {
            tracing::debug!(
                candidate_time = %candidate.event_time,
                original_id = %original.id,
                tier = ?tier,
                "Duplicate record detected"
            );
        }
        found
    }

    fn notes_similar(&self, a: &str, b: &str) -> bool {
        match (a.is_empty(), b.is_empty()) {
            (true, true) => true,
            (false, false) => similarity(a, b) > self.config.similarity_threshold,
            _ => false,
        }
    }
}
