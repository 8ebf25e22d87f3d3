//! Bill records and their identifiers
//!
//! This module provides the typed records that flow through a harvest:
//!
//! - `BillSummary`: one row of a search-results listing
//! - `BillRecord`: a summary enriched with extracted text, as persisted
//! - `TextSource`: which extraction strategy produced the text
//!
//! It also owns the key scheme shared by the dedup store and the exports.

mod text_source;

pub use text_source::TextSource;

use crate::extract::Extraction;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Version tag written into every record's metadata
pub const DATA_VERSION: &str = "1.0";

/// Session slug used when a session label carries no ordinal
pub const UNKNOWN_SESSION: &str = "unknown_session";

static RE_SESSION_ORDINAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+(?:st|nd|rd|th)").expect("invalid regex: session ordinal")
});

/// One bill as listed on a search-results page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillSummary {
    /// Bill number as displayed, e.g. "H.2212"
    pub number: String,

    /// Primary sponsor, when the listing links one
    pub sponsor: Option<String>,

    /// Bill title, when the listing links one
    pub title: Option<String>,

    /// Absolute URL of the bill's detail page
    pub detail_url: String,

    /// Session the listing was filtered to, e.g. "194th (2023-2024)"
    pub session_label: String,
}

impl BillSummary {
    /// Dedup key of this bill, see [`record_key`]
    pub fn key(&self) -> String {
        record_key(&self.session_label, &self.number)
    }
}

/// A bill summary enriched with its extracted text
///
/// This is the on-disk JSON shape of a harvested bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRecord {
    pub number: String,

    #[serde(default)]
    pub sponsor: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    pub detail_url: String,

    #[serde(rename = "generalCourt")]
    pub session_label: String,

    pub full_text: String,

    pub text_source: TextSource,

    #[serde(default)]
    pub text_url: Option<String>,

    pub text_length: usize,

    pub metadata: RecordMetadata,
}

/// Provenance attached to a persisted record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    pub scraped_at: DateTime<Utc>,

    /// Session slug, e.g. "194th"
    pub session: String,

    /// Session-qualified identifier, e.g. "MA_194th_H_2212"
    pub bill_id: String,

    pub data_version: String,
}

impl BillRecord {
    /// Builds the record for a summary from the outcome of text extraction
    ///
    /// # Arguments
    ///
    /// * `summary` - The listing row the bill came from
    /// * `extraction` - Result of the extraction chain for this bill
    /// * `jurisdiction` - Prefix of the session identifier, e.g. "MA"
    pub fn new(summary: BillSummary, extraction: Extraction, jurisdiction: &str) -> Self {
        let session = session_slug(&summary.session_label);
        let bill_id = format!("{}_{}", jurisdiction, summary.key());

        Self {
            number: summary.number,
            sponsor: summary.sponsor,
            title: summary.title,
            detail_url: summary.detail_url,
            session_label: summary.session_label,
            full_text: extraction.text,
            text_source: extraction.source,
            text_url: extraction.url,
            text_length: extraction.length,
            metadata: RecordMetadata {
                scraped_at: Utc::now(),
                session,
                bill_id,
                data_version: DATA_VERSION.to_string(),
            },
        }
    }

    /// Dedup key of this record, see [`record_key`]
    pub fn key(&self) -> String {
        record_key(&self.session_label, &self.number)
    }

    /// Session-qualified identifier of this record
    pub fn session_id(&self) -> &str {
        &self.metadata.bill_id
    }

    /// URL recorded in text exports: the text URL, else the detail page
    pub fn source_url(&self) -> &str {
        self.text_url.as_deref().unwrap_or(&self.detail_url)
    }
}

/// Extracts the session ordinal from a session label
///
/// `"194th (2023-2024)"` becomes `"194th"`; labels without an ordinal map to
/// [`UNKNOWN_SESSION`].
pub fn session_slug(session_label: &str) -> String {
    RE_SESSION_ORDINAL
        .find(session_label)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_SESSION.to_string())
}

/// Normalizes a bill number for use in file names
///
/// `"H.2212"` becomes `"H_2212"`. Any character other than ASCII letters,
/// digits and `-` becomes `_`.
pub fn normalize_bill_number(number: &str) -> String {
    number
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Builds the dedup key `{session}_{normalizedNumber}` of a bill
pub fn record_key(session_label: &str, number: &str) -> String {
    format!(
        "{}_{}",
        session_slug(session_label),
        normalize_bill_number(number)
    )
}
