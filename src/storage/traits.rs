//! Storage traits and error types
//!
//! This module defines the trait interface for bill record stores and the
//! associated error types.

use crate::bill::BillRecord;
use crate::storage::TextExport;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to persist {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unreadable record {}: {message}", path.display())]
    LoadAnomaly { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl StorageError {
    pub(crate) fn persist(path: &Path, source: std::io::Error) -> Self {
        Self::Persist {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn anomaly(path: &Path, message: impl ToString) -> Self {
        Self::LoadAnomaly {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for bill record stores
///
/// Records are addressed by session label and bill number. A store holds at
/// most one JSON record and one text export per bill.
pub trait BillStore {
    // ===== Records =====

    /// Returns true if a record for the bill has been persisted
    fn exists(&self, session_label: &str, number: &str) -> bool;

    /// Loads every persisted record, ordered by key
    ///
    /// Records that cannot be read are logged and skipped.
    fn load_all(&self) -> Vec<BillRecord>;

    /// Persists a record, replacing any previous one for the same bill
    ///
    /// # Returns
    ///
    /// The path the record was written to
    fn save(&mut self, record: &BillRecord) -> StorageResult<PathBuf>;

    /// Number of persisted records
    fn record_count(&self) -> usize;

    // ===== Text Exports =====

    /// Returns true if a text export exists for the bill
    fn has_text_file(&self, session_label: &str, number: &str) -> bool;

    /// Writes the plain-text export of a record
    fn save_text(&mut self, record: &BillRecord) -> StorageResult<PathBuf>;

    /// Reads a text export back
    fn load_text(&self, session_label: &str, number: &str) -> StorageResult<TextExport>;
}
