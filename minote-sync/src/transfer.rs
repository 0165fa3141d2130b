//! CSV import/export engine
//!
//! Export: header plus one row per record, in the order given.
//! Import: decode every data row, drop rows that fail to decode, and
//! split the rest into accepted records and skipped duplicates.
//!
//! Duplicates are judged only against the records that existed before the
//! call, not against rows accepted earlier in the same file. Callers that
//! feed a large file in chunks pass the grown record set each time.

use chrono::NaiveDate;
use minote_common::config::{write_atomic, DuplicateConfig};
use minote_common::time::format_date;
use minote_common::{Error, MoodRecord, Result};
use serde::Serialize;
use std::path::Path;

use crate::codec::{decode_row, encode_header, encode_row};
use crate::duplicates::DuplicateClassifier;

/// File extensions accepted for import (compared case-insensitively)
pub const IMPORT_EXTENSIONS: [&str; 2] = ["csv", "txt"];

/// Prefix of the default export file name
pub const EXPORT_FILE_PREFIX: &str = "心情记录";

/// Result of one import pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportOutcome {
    /// Accepted records, in file order
    pub imported: Vec<MoodRecord>,
    /// Rows that duplicated an existing record
    pub skipped: usize,
    /// Rows that could not be decoded
    pub malformed: usize,
}

impl ImportOutcome {
    /// Nothing was accepted, skipped or rejected
    pub fn is_empty(&self) -> bool {
        self.imported.is_empty() && self.skipped == 0 && self.malformed == 0
    }
}

/// Import/export engine
#[derive(Debug, Clone, Default)]
pub struct ImportExportEngine {
    classifier: DuplicateClassifier,
}

impl ImportExportEngine {
    pub fn new(config: DuplicateConfig) -> Self {
        Self {
            classifier: DuplicateClassifier::new(config),
        }
    }

    pub fn classifier(&self) -> &DuplicateClassifier {
        &self.classifier
    }

    /// Serialize `records` as a complete CSV document
    ///
    /// Every line, the header included, ends with a newline. Records are
    /// written in the order given.
    pub fn export_all(&self, records: &[MoodRecord]) -> String {
        let mut out = encode_header();
        out.push('\n');
        for record in records {
            out.push_str(&encode_row(record));
            out.push('\n');
        }
        tracing::debug!(count = records.len(), "Exported records");
        out
    }

    /// Parse `text` and keep the rows that do not duplicate `existing`
    ///
    /// Line 0 is the header and is always skipped; blank lines are skipped
    /// without being counted.
    pub fn import_with_duplicate_check(
        &self,
        text: &str,
        existing: &[MoodRecord],
    ) -> ImportOutcome {
        let mut outcome = ImportOutcome::default();

        for (line_no, line) in text.lines().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }

            let candidate = match decode_row(line) {
                Ok(record) => record,
                Err(e) => {
                    tracing::debug!(line = line_no + 1, reason = %e, "Skipping unreadable row");
                    outcome.malformed += 1;
                    continue;
                }
            };

            if self.classifier.find_duplicate(&candidate, existing).is_some() {
                outcome.skipped += 1;
            } else {
                outcome.imported.push(candidate);
            }
        }

        if outcome.malformed > 0 {
            tracing::warn!(malformed = outcome.malformed, "Some rows could not be read");
        }
        tracing::info!(
            imported = outcome.imported.len(),
            skipped = outcome.skipped,
            malformed = outcome.malformed,
            "Import pass complete"
        );

        outcome
    }
}

/// Default export file name for `date`, e.g. `心情记录_2024-01-01.csv`
pub fn default_export_file_name(date: &NaiveDate) -> String {
    format!("{}_{}.csv", EXPORT_FILE_PREFIX, format_date(date))
}

/// Read an import file as UTF-8 text
///
/// Only `.csv` and `.txt` files are accepted. An empty file is not an
/// error; it simply imports nothing.
pub fn read_import_file(path: &Path) -> Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if !IMPORT_EXTENSIONS.contains(&extension.as_str()) {
        return Err(Error::InvalidInput(format!(
            "Unsupported file type '{}': expected a CSV or TXT file",
            path.display()
        )));
    }

    let bytes = std::fs::read(path)?;
    String::from_utf8(bytes)
        .map_err(|_| Error::InvalidInput(format!("{} is not valid UTF-8", path.display())))
}

/// Write an export document atomically
pub fn write_export_file(path: &Path, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())?;
    tracing::info!("Exported journal to {}", path.display());
    Ok(())
}
