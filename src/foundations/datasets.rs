//! Dataset slices from the dataset server's rows endpoint

use crate::config::{DatasetEntry, DatasetKind};
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use url::Url;

/// Largest page the rows endpoint serves
pub const MAX_ROWS_PER_REQUEST: usize = 100;

/// One dataset row, column name to value
pub type Row = Map<String, Value>;

#[derive(Debug, Deserialize)]
struct RowsPage {
    rows: Vec<RowEnvelope>,
}

#[derive(Debug, Deserialize)]
struct RowEnvelope {
    row: Row,
}

/// Client for the rows endpoint
#[derive(Debug, Clone)]
pub struct DatasetClient {
    client: Client,
    endpoint: Url,
}

impl DatasetClient {
    pub fn new(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    /// Fetches the first `entry.limit` rows of a dataset split
    ///
    /// Rows are requested in pages of at most [`MAX_ROWS_PER_REQUEST`]; a
    /// short page means the split has no more rows.
    pub async fn fetch_rows(&self, entry: &DatasetEntry) -> Result<Vec<Row>> {
        let mut rows = Vec::with_capacity(entry.limit);

        while rows.len() < entry.limit {
            let length = (entry.limit - rows.len()).min(MAX_ROWS_PER_REQUEST);

            let mut url = self.endpoint.clone();
            url.query_pairs_mut()
                .append_pair("dataset", &entry.name)
                .append_pair("config", &entry.config)
                .append_pair("split", &entry.split)
                .append_pair("offset", &rows.len().to_string())
                .append_pair("length", &length.to_string());

            let page: RowsPage = self
                .client
                .get(url)
                .send()
                .await
                .with_context(|| format!("request for {} rows failed", entry.name))?
                .error_for_status()
                .with_context(|| format!("dataset {} unavailable", entry.name))?
                .json()
                .await
                .with_context(|| format!("unexpected rows payload for {}", entry.name))?;

            let received = page.rows.len();
            rows.extend(page.rows.into_iter().map(|envelope| envelope.row));
            tracing::debug!("{}: {} rows so far", entry.name, rows.len());

            if received < length {
                break;
            }
        }

        Ok(rows)
    }
}

/// Maps a row to the written item for the dataset kind
pub fn map_row(kind: DatasetKind, row: &Row) -> Value {
    match kind {
        DatasetKind::BillSummary => bill_summary_item(row),
        DatasetKind::LegalDocument => legal_document_item(row),
    }
}

fn bill_summary_item(row: &Row) -> Value {
    let text = str_field(row, "text");
    json!({
        "text": text,
        "summary": str_field(row, "summary"),
        "title": str_field(row, "title"),
        "bill_id": str_field(row, "bill_id"),
        "metadata": {
            "type": "congressional_bill",
            "source": "BillSum",
            "length": text.chars().count(),
            "is_test": row.get("is_test").and_then(Value::as_bool).unwrap_or(false),
        }
    })
}

fn legal_document_item(row: &Row) -> Value {
    let text = str_field(row, "text");
    json!({
        "text": text,
        "metadata": {
            "source": field_or(row, "source", "unknown"),
            "type": field_or(row, "type", "legal_document"),
            "length": text.chars().count(),
            "jurisdiction": field_or(row, "jurisdiction", "federal"),
        }
    })
}

fn str_field<'a>(row: &'a Row, name: &str) -> &'a str {
    row.get(name).and_then(Value::as_str).unwrap_or_default()
}

fn field_or(row: &Row, name: &str, default: &str) -> Value {
    row.get(name)
        .cloned()
        .unwrap_or_else(|| Value::from(default))
}

/// Downloads a dataset slice and writes it as a JSON array
///
/// # Returns
///
/// The written file and the number of items in it
pub async fn download_dataset(
    client: &DatasetClient,
    entry: &DatasetEntry,
    output_dir: &Path,
) -> Result<(PathBuf, usize)> {
    let rows = client.fetch_rows(entry).await?;
    let items: Vec<Value> = rows.iter().map(|row| map_row(entry.kind, row)).collect();

    let path = output_dir.join(&entry.output_file);
    write_json(&path, &Value::Array(items))?;

    Ok((path, rows.len()))
}

/// Writes pretty-printed JSON to `path`
pub fn write_json(path: &Path, value: &Value) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("row must be an object"),
        }
    }

    #[test]
    fn test_bill_summary_item() {
        let item = map_row(
            DatasetKind::BillSummary,
            &row(json!({
                "text": "SECTION 1. Short title.",
                "summary": "Summary",
                "title": "A bill",
                "bill_id": "113_hr1",
                "is_test": true,
            })),
        );

        assert_eq!(item["bill_id"], "113_hr1");
        assert_eq!(item["metadata"]["type"], "congressional_bill");
        assert_eq!(item["metadata"]["source"], "BillSum");
        assert_eq!(item["metadata"]["length"], 23);
        assert_eq!(item["metadata"]["is_test"], true);
    }

    #[test]
    fn test_bill_summary_item_defaults() {
        let item = map_row(DatasetKind::BillSummary, &Row::new());
        assert_eq!(item["text"], "");
        assert_eq!(item["title"], "");
        assert_eq!(item["metadata"]["length"], 0);
        assert_eq!(item["metadata"]["is_test"], false);
    }

    #[test]
    fn test_legal_document_item_defaults() {
        let item = map_row(DatasetKind::LegalDocument, &row(json!({"text": "Opinion"})));

        assert_eq!(item["text"], "Opinion");
        assert_eq!(item["metadata"]["source"], "unknown");
        assert_eq!(item["metadata"]["type"], "legal_document");
        assert_eq!(item["metadata"]["jurisdiction"], "federal");
        assert_eq!(item["metadata"]["length"], 7);
    }

    #[test]
    fn test_legal_document_item_keeps_row_values() {
        let item = map_row(
            DatasetKind::LegalDocument,
            &row(json!({"text": "", "source": "courtlistener", "jurisdiction": "state"})),
        );
        assert_eq!(item["metadata"]["source"], "courtlistener");
        assert_eq!(item["metadata"]["jurisdiction"], "state");
    }
}
