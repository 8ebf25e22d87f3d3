//! Output module for harvest progress, exports and statistics
//!
//! This module handles:
//! - Appending per-page progress rows during a harvest
//! - Exporting stored records as CSV
//! - Computing and printing statistics over the store

mod csv_export;
mod progress;
pub mod stats;

pub use csv_export::{export_metadata_csv, METADATA_EXPORT_FILE};
pub use progress::{ProgressLog, PROGRESS_LOG_FILE};
pub use stats::{compute_statistics, print_statistics, HarvestStatistics};
