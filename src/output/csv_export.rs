//! Tabular export of the stored records

use crate::bill::BillRecord;
use crate::storage::StorageResult;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the metadata export under the processed directory
pub const METADATA_EXPORT_FILE: &str = "bills_metadata.csv";

/// One CSV row; field order is the column order
#[derive(Debug, Serialize)]
struct MetadataRow<'a> {
    number: &'a str,
    title: &'a str,
    sponsor: &'a str,
    general_court: &'a str,
    text_source: &'a str,
    text_length: usize,
    detail_url: &'a str,
    text_url: &'a str,
    scraped_at: String,
    bill_id: &'a str,
    full_text: &'a str,
}

impl<'a> From<&'a BillRecord> for MetadataRow<'a> {
    fn from(record: &'a BillRecord) -> Self {
        Self {
            number: &record.number,
            title: record.title.as_deref().unwrap_or_default(),
            sponsor: record.sponsor.as_deref().unwrap_or_default(),
            general_court: &record.session_label,
            text_source: record.text_source.as_str(),
            text_length: record.text_length,
            detail_url: &record.detail_url,
            text_url: record.text_url.as_deref().unwrap_or_default(),
            scraped_at: record.metadata.scraped_at.to_rfc3339(),
            bill_id: &record.metadata.bill_id,
            full_text: &record.full_text,
        }
    }
}

/// Writes every record as one row of `{processed_dir}/bills_metadata.csv`
///
/// An existing export is replaced.
///
/// # Returns
///
/// The path of the written file
pub fn export_metadata_csv(records: &[BillRecord], processed_dir: &Path) -> StorageResult<PathBuf> {
    fs::create_dir_all(processed_dir)?;
    let path = processed_dir.join(METADATA_EXPORT_FILE);

    let mut writer = csv::Writer::from_path(&path)?;
    for record in records {
        writer.serialize(MetadataRow::from(record))?;
    }
    writer.flush()?;

    tracing::info!("Exported {} bills to {}", records.len(), path.display());
    Ok(path)
}
