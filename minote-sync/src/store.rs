//! Record store interface
//!
//! The persistence engine is outside this crate; the journal only needs
//! to insert, list, update and delete records.

use async_trait::async_trait;
use minote_common::{Error, MoodRecord, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Where journal records live
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Add a record; an id already present is a `Conflict`
    async fn insert(&self, record: MoodRecord) -> Result<()>;

    /// Replace the record with the same id; a missing id is `NotFound`
    async fn update(&self, record: MoodRecord) -> Result<()>;

    /// Remove and return the record, `None` when absent
    async fn delete(&self, id: Uuid) -> Result<Option<MoodRecord>>;

    async fn get(&self, id: Uuid) -> Result<Option<MoodRecord>>;

    /// Every record, chronological by event time
    async fn all(&self) -> Result<Vec<MoodRecord>>;
}

/// In-memory record store
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<Uuid, MoodRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store; later records with a repeated id replace earlier ones
    pub fn with_records(records: impl IntoIterator<Item = MoodRecord>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().map(|r| (r.id, r)).collect()),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, record: MoodRecord) -> Result<()> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(Error::Conflict(format!("record {} already exists", record.id)));
        }
        records.insert(record.id, record);
        Ok(())
    }

    async fn update(&self, record: MoodRecord) -> Result<()> {
        let mut records = self.records.write().await;
        match records.get_mut(&record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(Error::NotFound(format!("record {}", record.id))),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<Option<MoodRecord>> {
        Ok(self.records.write().await.remove(&id))
    }

    async fn get(&self, id: Uuid) -> Result<Option<MoodRecord>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn all(&self) -> Result<Vec<MoodRecord>> {
        let mut all: Vec<MoodRecord> = self.records.read().await.values().cloned().collect();
        all.sort_by(|a, b| {
            a.event_time
                .cmp(&b.event_time)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minote_common::time::parse_timestamp;

    fn record(at: &str) -> MoodRecord {
        MoodRecord::new(parse_timestamp(at).unwrap(), "开心", None, "")
    }

    fn _takes_boxed(_: Box<dyn RecordStore>) {}

    #[tokio::test]
    async fn test_insert_rejects_repeated_id() {
        let store = MemoryStore::new();
        let r = record("2024-01-01 10:00:00");
        store.insert(r.clone()).await.unwrap();
        assert!(matches!(store.insert(r).await, Err(Error::Conflict(_))));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_all_is_chronological() {
        let late = record("2024-01-03 10:00:00");
        let early = record("2024-01-01 10:00:00");
        let store = MemoryStore::with_records(vec![late.clone(), early.clone()]);
        let all = store.all().await.unwrap();
        assert_eq!(all[0].id, early.id);
        assert_eq!(all[1].id, late.id);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemoryStore::new();
        let mut r = record("2024-01-01 10:00:00");
        assert!(matches!(store.update(r.clone()).await, Err(Error::NotFound(_))));

        store.insert(r.clone()).await.unwrap();
        r.note = "edited".to_string();
        store.update(r.clone()).await.unwrap();
        assert_eq!(store.get(r.id).await.unwrap().unwrap().note, "edited");

        assert_eq!(store.delete(r.id).await.unwrap().map(|x| x.id), Some(r.id));
        assert!(store.delete(r.id).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }
}
