//! Journal orchestrator
//!
//! Ties a record store to the import/export engine, the reconciliation
//! engine and the tag catalog. Core decisions stay in those engines; this
//! layer only reads from and writes to the store around them.

use chrono::NaiveDateTime;
use minote_common::config::TomlConfig;
use minote_common::time::days_before;
use minote_common::{Error, MoodRecord, Result, TagCatalog};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::reconcile::{push_to_source, ReconciliationEngine, SyncReport};
use crate::source::ExternalMoodSource;
use crate::stats::JournalStats;
use crate::store::RecordStore;
use crate::transfer::{ImportExportEngine, ImportOutcome};

/// Outcome of one pull from an external source
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconcileReport {
    /// Records created from external samples
    pub inserted: Vec<MoodRecord>,
    pub window_start: Option<NaiveDateTime>,
    pub window_end: Option<NaiveDateTime>,
}

pub struct Journal<S: RecordStore> {
    store: S,
    transfer: ImportExportEngine,
    reconciler: ReconciliationEngine,
    lookback_days: u32,
    tags: RwLock<TagCatalog>,
}

impl<S: RecordStore> Journal<S> {
    pub fn new(store: S, config: &TomlConfig) -> Self {
        Self {
            store,
            transfer: ImportExportEngine::new(config.duplicates.clone()),
            reconciler: ReconciliationEngine::new(config.reconcile.clone()),
            lookback_days: config.reconcile.lookback_days,
            tags: RwLock::new(config.tags.clone()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Snapshot of the tag catalog
    pub async fn tags(&self) -> TagCatalog {
        self.tags.read().await.clone()
    }

    /// Import CSV text, inserting the rows that are not duplicates
    pub async fn import_csv(&self, text: &str) -> Result<ImportOutcome> {
        let existing = self.store.all().await?;
        let outcome = self.transfer.import_with_duplicate_check(text, &existing);

        for record in &outcome.imported {
            self.store.insert(record.clone()).await?;
        }

        let added = self.tags.write().await.ensure_tags_for(&outcome.imported);
        if added > 0 {
            tracing::info!(added, "Registered labels from imported records");
        }
        Ok(outcome)
    }

    /// Every record as CSV, chronological by event time
    pub async fn export_csv(&self) -> Result<String> {
        let mut records = self.store.all().await?;
        records.sort_by_key(|r| r.event_time);
        Ok(self.transfer.export_all(&records))
    }

    /// Pull the last `lookback_days` from `source` and insert unknown samples
    ///
    /// An unreachable source yields an empty report; only store errors
    /// propagate.
    pub async fn pull_from_source(
        &self,
        source: &dyn ExternalMoodSource,
        now: NaiveDateTime,
    ) -> Result<ReconcileReport> {
        let start = days_before(&now, self.lookback_days);
        let local = self.store.all().await?;
        let inserted = self.reconciler.pull(source, start, now, &local).await;

        for record in &inserted {
            self.store.insert(record.clone()).await?;
        }
        self.tags.write().await.ensure_tags_for(&inserted);

        Ok(ReconcileReport {
            inserted,
            window_start: Some(start),
            window_end: Some(now),
        })
    }

    /// Push unlinked records to `source` and link the ones it accepted
    pub async fn push_to_source(&self, source: &dyn ExternalMoodSource) -> Result<SyncReport> {
        let records = self.store.all().await?;
        let report = push_to_source(source, &records).await;

        for (id, external_id) in &report.links {
            self.relink(*id, external_id).await?;
        }
        Ok(report)
    }

    /// Point record `id` at external record `external_ref`
    pub async fn relink(&self, id: Uuid, external_ref: &str) -> Result<()> {
        let record = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("record {}", id)))?;
        self.store.update(record.with_external_ref(external_ref)).await
    }

    /// Delete record `id`, then its linked external record when a source is given
    ///
    /// Failing to delete the external copy only logs a warning.
    pub async fn delete_record(
        &self,
        id: Uuid,
        source: Option<&dyn ExternalMoodSource>,
    ) -> Result<MoodRecord> {
        let removed = self
            .store
            .delete(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("record {}", id)))?;

        if let (Some(source), Some(external_id)) = (source, removed.external_ref.as_deref()) {
            if let Err(e) = source.delete(external_id).await {
                tracing::warn!(
                    record_id = %id,
                    external_id,
                    source = source.name(),
                    error = %e,
                    "Could not delete linked external record"
                );
            }
        }
        Ok(removed)
    }

    pub async fn stats(&self) -> Result<JournalStats> {
        Ok(JournalStats::from_records(&self.store.all().await?))
    }

    /// Drop user-defined tags no record uses; returns how many were removed
    pub async fn prune_tags(&self) -> Result<usize> {
        let records = self.store.all().await?;
        Ok(self.tags.write().await.prune_unused(&records))
    }
}
