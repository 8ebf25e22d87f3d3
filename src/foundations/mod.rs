//! Federal foundations helper
//!
//! Downloads small slices of public legal datasets (congressional bill
//! summaries and legal corpora) and writes them as JSON next to two static
//! reference documents. A dataset that cannot be loaded is logged and its
//! configured fallbacks are tried instead.

mod datasets;
mod reference;

pub use datasets::{download_dataset, map_row, DatasetClient, Row, MAX_ROWS_PER_REQUEST};
pub use reference::{
    constitutional_principles, interpretation_principles, write_reference_documents,
    CONSTITUTIONAL_PRINCIPLES_FILE, INTERPRETATION_PRINCIPLES_FILE,
};

use crate::config::{DatasetEntry, FoundationsConfig, UserAgentConfig};
use crate::harvest::build_http_client;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Request timeout for the dataset server
const DATASET_TIMEOUT: Duration = Duration::from_secs(60);

/// What a foundations run wrote and what it could not load
#[derive(Debug, Clone, Default)]
pub struct FoundationsReport {
    /// Dataset files written, with their item counts
    pub datasets: Vec<(PathBuf, usize)>,

    /// Datasets that could not be loaded
    pub unavailable: Vec<String>,

    /// Static reference documents written
    pub references: Vec<PathBuf>,
}

/// Runs the helper with the configured datasets
///
/// # Arguments
///
/// * `config` - Datasets, rows endpoint and output directory
/// * `user_agent` - Identification sent to the dataset server
pub async fn setup_foundations(
    config: &FoundationsConfig,
    user_agent: &UserAgentConfig,
) -> Result<FoundationsReport> {
    let output_dir = Path::new(&config.output_dir);
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let endpoint = Url::parse(&config.rows_endpoint)
        .with_context(|| format!("invalid rows endpoint '{}'", config.rows_endpoint))?;
    let client = DatasetClient::new(build_http_client(user_agent, DATASET_TIMEOUT)?, endpoint);

    let mut report = FoundationsReport::default();
    for entry in &config.datasets {
        load_with_fallbacks(&client, entry, output_dir, &mut report).await;
    }

    report.references = write_reference_documents(output_dir)?;
    tracing::info!(
        "Foundations written to {}: {} datasets, {} unavailable",
        output_dir.display(),
        report.datasets.len(),
        report.unavailable.len()
    );

    Ok(report)
}

/// Loads one dataset; on failure every fallback is attempted in order
async fn load_with_fallbacks(
    client: &DatasetClient,
    entry: &DatasetEntry,
    output_dir: &Path,
    report: &mut FoundationsReport,
) {
    if load_one(client, entry, output_dir, report).await {
        return;
    }

    for fallback in &entry.fallbacks {
        load_one(client, fallback, output_dir, report).await;
    }
}

async fn load_one(
    client: &DatasetClient,
    entry: &DatasetEntry,
    output_dir: &Path,
    report: &mut FoundationsReport,
) -> bool {
    tracing::info!("Loading {} ({} rows)", entry.name, entry.limit);

    match download_dataset(client, entry, output_dir).await {
        Ok((path, count)) => {
            tracing::info!("Saved {} items from {} to {}", count, entry.name, path.display());
            report.datasets.push((path, count));
            true
        }
        Err(e) => {
            tracing::warn!("{} unavailable: {:#}", entry.name, e);
            report.unavailable.push(entry.name.clone());
            false
        }
    }
}
