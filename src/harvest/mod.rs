//! Harvest module for listing crawls and bill collection
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching over a shared, cookie-keeping client
//! - Search-results parsing into bill summaries
//! - Overall harvest coordination

mod controller;
mod fetcher;
mod listing;

pub use controller::{HarvestController, HarvestReport};
pub use fetcher::{build_http_client, user_agent_string, FetchFailure, PageFetcher};
pub use listing::ListingParser;

use crate::config::Config;
use crate::storage::open_store;
use crate::url::{parse_base_url, search_page_url};
use crate::Result;
use std::path::Path;
use url::Url;

/// Runs a complete harvest
///
/// This is the main entry point for a harvest. It will:
/// 1. Open the store under the configured data directory
/// 2. Walk the configured listing pages
/// 3. Extract and persist every bill not already stored
///
/// # Arguments
///
/// * `config` - The harvest configuration
///
/// # Returns
///
/// * `Ok(HarvestReport)` - Counters of the finished run
/// * `Err(HarvestError)` - The run could not be set up
pub async fn harvest(config: Config) -> Result<HarvestReport> {
    let store = open_store(Path::new(&config.output.data_dir))?;
    let mut controller = HarvestController::new(config, store)?;

    let report = controller.run().await;
    report.log();
    Ok(report)
}

/// Listing URLs a run over the configured page range would fetch
pub fn listing_urls(config: &Config) -> Result<Vec<Url>> {
    let base_url = parse_base_url(&config.site.base_url)?;

    Ok((config.scraper.start_page..=config.scraper.end_page)
        .map(|page| search_page_url(&base_url, page, &config.site.session_filter))
        .collect())
}
