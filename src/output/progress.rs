//! Per-page progress log
//!
//! One CSV row is appended for every listing page a run processes, so long
//! harvests can be followed (and compared across runs) from the data directory.

use crate::storage::StorageResult;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// File name of the progress log under the data directory
pub const PROGRESS_LOG_FILE: &str = "progress_log.csv";

const HEADER: [&str; 3] = ["timestamp", "page", "bills_scraped"];

/// Appends progress rows to `{data-dir}/progress_log.csv`
#[derive(Debug, Clone)]
pub struct ProgressLog {
    path: PathBuf,
}

impl ProgressLog {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(PROGRESS_LOG_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row, writing the header first if the log is new
    ///
    /// # Arguments
    ///
    /// * `at` - When the page finished
    /// * `page` - Listing page number
    /// * `bills_persisted` - Records persisted from that page
    pub fn append(&self, at: DateTime<Utc>, page: u32, bills_persisted: usize) -> StorageResult<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let is_new = file.metadata()?.len() == 0;

        let mut writer = csv::Writer::from_writer(file);
        if is_new {
            writer.write_record(HEADER)?;
        }
        writer.write_record([
            at.to_rfc3339_opts(SecondsFormat::Secs, true),
            page.to_string(),
            bills_persisted.to_string(),
        ])?;
        writer.flush()?;

        Ok(())
    }
}
