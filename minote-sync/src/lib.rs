//! minote-sync library interface
//!
//! CSV import/export with duplicate detection, and reconciliation against
//! external mood sources. The `minote` binary is a thin CLI over this.

pub mod codec;
pub mod duplicates;
pub mod journal;
pub mod reconcile;
pub mod similarity;
pub mod source;
pub mod stats;
pub mod store;
pub mod transfer;
pub mod valence;

pub use crate::duplicates::{DuplicateClassifier, DuplicateTier};
pub use crate::journal::{Journal, ReconcileReport};
pub use crate::reconcile::{ReconciliationEngine, SyncReport};
pub use crate::source::{ExternalMoodSource, MemorySource, SourceError};
pub use crate::stats::JournalStats;
pub use crate::store::{MemoryStore, RecordStore};
pub use crate::transfer::{ImportExportEngine, ImportOutcome};
