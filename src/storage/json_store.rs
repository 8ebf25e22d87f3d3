//! JSON file store
//!
//! Layout under the data directory:
//!
//! ```text
//! raw/{key}.json                     one record per bill
//! processed/text_files/{key}.txt     text export of successful extractions
//! ```
//!
//! The key is `{session}_{normalizedNumber}` (see [`crate::bill::record_key`]).
//! Both directories are indexed once when the store is opened; the index is
//! kept current by every write.

use crate::bill::{record_key, BillRecord};
use crate::storage::text_export::TextExport;
use crate::storage::traits::{BillStore, StorageError, StorageResult};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const RECORD_DIR: &str = "raw";
const TEXT_DIR: &str = "processed/text_files";

/// File-per-bill store used to skip already harvested bills
#[derive(Debug)]
pub struct DedupStore {
    data_dir: PathBuf,
    records: HashMap<String, PathBuf>,
    texts: HashMap<String, PathBuf>,
}

impl DedupStore {
    /// Opens the store, creating its directories if absent
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Root of the harvested data
    ///
    /// # Returns
    ///
    /// * `Ok(DedupStore)` - Store with its index built
    /// * `Err(StorageError)` - A directory could not be created or listed
    pub fn open(data_dir: &Path) -> StorageResult<Self> {
        let record_dir = data_dir.join(RECORD_DIR);
        let text_dir = data_dir.join(TEXT_DIR);
        fs::create_dir_all(&record_dir)?;
        fs::create_dir_all(&text_dir)?;

        let records = index_dir(&record_dir, "json")?;
        let texts = index_dir(&text_dir, "txt")?;

        tracing::info!(
            "Opened store at {}: {} records, {} text exports",
            data_dir.display(),
            records.len(),
            texts.len()
        );

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            records,
            texts,
        })
    }

    /// Directory of the processed exports
    pub fn processed_dir(&self) -> PathBuf {
        self.data_dir.join("processed")
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(RECORD_DIR).join(format!("{}.json", key))
    }

    fn text_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(TEXT_DIR).join(format!("{}.txt", key))
    }

    fn load_record(path: &Path) -> StorageResult<BillRecord> {
        let content = fs::read_to_string(path).map_err(|e| StorageError::anomaly(path, e))?;
        serde_json::from_str(&content).map_err(|e| StorageError::anomaly(path, e))
    }
}

impl BillStore for DedupStore {
    fn exists(&self, session_label: &str, number: &str) -> bool {
        self.records
            .contains_key(&record_key(session_label, number))
    }

    fn load_all(&self) -> Vec<BillRecord> {
        let mut keys: Vec<&String> = self.records.keys().collect();
        keys.sort();

        keys.into_iter()
            .filter_map(|key| match Self::load_record(&self.records[key]) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("Skipping {}", e);
                    None
                }
            })
            .collect()
    }

    fn save(&mut self, record: &BillRecord) -> StorageResult<PathBuf> {
        let key = record.key();
        let path = self.record_path(&key);
        let json = serde_json::to_string_pretty(record)?;

        write_atomically(&path, json.as_bytes())?;
        self.records.insert(key, path.clone());

        tracing::debug!("Saved {} to {}", record.number, path.display());
        Ok(path)
    }

    fn record_count(&self) -> usize {
        self.records.len()
    }

    fn has_text_file(&self, session_label: &str, number: &str) -> bool {
        self.texts.contains_key(&record_key(session_label, number))
    }

    fn save_text(&mut self, record: &BillRecord) -> StorageResult<PathBuf> {
        let key = record.key();
        let path = self.text_path(&key);
        let content = TextExport::from_record(record).render();

        write_atomically(&path, content.as_bytes())?;
        self.texts.insert(key, path.clone());

        tracing::debug!("Exported text of {} to {}", record.number, path.display());
        Ok(path)
    }

    fn load_text(&self, session_label: &str, number: &str) -> StorageResult<TextExport> {
        let key = record_key(session_label, number);
        let path = self
            .texts
            .get(&key)
            .cloned()
            .unwrap_or_else(|| self.text_path(&key));

        let content = fs::read_to_string(&path).map_err(|e| StorageError::anomaly(&path, e))?;
        TextExport::parse(&content).map_err(|message| StorageError::anomaly(&path, message))
    }
}

/// Maps file stems to paths for every `*.{extension}` file in `dir`
fn index_dir(dir: &Path, extension: &str) -> StorageResult<HashMap<String, PathBuf>> {
    let mut index = HashMap::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            index.insert(stem.to_string(), path.clone());
        }
    }

    Ok(index)
}

/// Writes `contents` to a temporary sibling of `path`, then renames it over `path`
///
/// A reader never observes a partially written file.
fn write_atomically(path: &Path, contents: &[u8]) -> StorageResult<()> {
    let tmp = path.with_extension("tmp");

    let write = || -> std::io::Result<()> {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    };

    write().map_err(|e| {
        let _ = fs::remove_file(&tmp);
        StorageError::persist(path, e)
    })
}
