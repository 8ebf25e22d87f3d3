//! Storage module for persisting harvested bills
//!
//! This module handles all on-disk state of the harvester:
//! - One JSON record per bill, used to skip bills on later runs
//! - Plain-text exports of successfully extracted bill text
//! - Loading everything back for statistics and exports

mod json_store;
mod text_export;
mod traits;

pub use json_store::DedupStore;
pub use text_export::{TextExport, SEPARATOR_WIDTH};
pub use traits::{BillStore, StorageError, StorageResult};

use std::path::Path;

/// Opens the bill store rooted at `data_dir`
///
/// # Arguments
///
/// * `data_dir` - Root of the harvested data
///
/// # Returns
///
/// * `Ok(DedupStore)` - Store with its index built
/// * `Err(StorageError)` - Failed to prepare the directories
pub fn open_store(data_dir: &Path) -> StorageResult<DedupStore> {
    DedupStore::open(data_dir)
}
