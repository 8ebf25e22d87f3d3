//! Bill-Harvest: an incremental legislative bill harvester
//!
//! This crate crawls the paginated bill search of a state legislature website,
//! follows each bill to its detail page, extracts the full bill text through an
//! ordered chain of fallback strategies and persists one JSON record per bill.
//! Previously harvested bills are detected on disk, so repeated runs only fetch
//! what is new.

pub mod bill;
pub mod config;
pub mod extract;
pub mod foundations;
pub mod harvest;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] harvest::FetchFailure),

    #[error("Unexpected page structure at {url}: {message}")]
    ParseAnomaly { url: String, message: String },

    #[error("No extraction strategy produced enough text for {url}")]
    ExtractionExhausted { url: String },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),

    #[error("Invalid boilerplate pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("URL cannot serve as a base: {0}")]
    CannotBeABase(String),
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

// Re-export commonly used types
pub use bill::{BillRecord, BillSummary, TextSource};
pub use config::Config;
pub use harvest::{HarvestController, HarvestReport};
pub use storage::{BillStore, DedupStore};
