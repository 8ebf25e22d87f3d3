//! Configuration module for Bill-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use bill_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Harvesting pages {}..={}", config.scraper.start_page, config.scraper.end_page);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, DatasetEntry, DatasetKind, ExtractionConfig, FoundationsConfig, ListingConfig,
    OutputConfig, ScraperConfig, SiteConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
