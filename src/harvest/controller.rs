//! Harvest controller - main harvest orchestration logic
//!
//! Walks the configured range of search-results pages strictly in sequence:
//! fetch and parse each listing, drop bills already in the store, fetch each
//! new bill's detail page, extract its text, persist the record and export its
//! text. A fixed pause follows every listing, detail and linked text fetch.

use crate::bill::{BillRecord, BillSummary, TextSource};
use crate::config::Config;
use crate::extract::{Extraction, TextExtractor};
use crate::harvest::fetcher::PageFetcher;
use crate::harvest::listing::ListingParser;
use crate::output::ProgressLog;
use crate::storage::{BillStore, DedupStore, TextExport};
use crate::url::{parse_base_url, search_page_url};
use crate::HarvestError;
use chrono::Utc;
use scraper::Html;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, Instant};
use url::Url;

/// Counters of one harvest run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestReport {
    /// Listing pages requested
    pub pages_visited: u32,

    /// Listing pages that could not be fetched or parsed
    pub page_failures: u32,

    /// Bill summaries found on the listings
    pub bills_listed: usize,

    /// Records written to the store
    pub persisted: usize,

    /// Bills skipped because a record already existed
    pub skipped: usize,

    /// Records that could not be written
    pub persist_failures: usize,

    /// Text exports written
    pub texts_exported: usize,

    /// Processed bills per text source
    pub by_source: BTreeMap<TextSource, usize>,

    /// The run ended before the last page because a page had nothing new
    pub stopped_early: bool,
}

impl HarvestReport {
    /// Logs the end-of-run summary
    pub fn log(&self) {
        tracing::info!(
            "Harvest finished: {} pages ({} failed), {} bills listed, {} persisted, {} skipped, {} persist failures, {} text exports",
            self.pages_visited,
            self.page_failures,
            self.bills_listed,
            self.persisted,
            self.skipped,
            self.persist_failures,
            self.texts_exported
        );
        for (source, count) in &self.by_source {
            tracing::info!("  {}: {}", source, count);
        }
        if self.stopped_early {
            tracing::info!("  stopped early (a page had only known bills)");
        }
    }

    /// Number of bills processed with the given source
    pub fn count(&self, source: TextSource) -> usize {
        self.by_source.get(&source).copied().unwrap_or(0)
    }
}

/// Outcome of one listing page
#[derive(Debug, Clone, Copy, Default)]
struct PageOutcome {
    listed: usize,
    new: usize,
    skipped: usize,
    persisted: usize,
}

/// Main harvest controller structure
pub struct HarvestController<S = DedupStore> {
    config: Config,
    base_url: Url,
    fetcher: PageFetcher,
    parser: ListingParser,
    extractor: TextExtractor,
    store: S,
    progress: ProgressLog,
    delay: Duration,
}

impl<S: BillStore> HarvestController<S> {
    /// Creates a new controller
    ///
    /// # Arguments
    ///
    /// * `config` - The harvest configuration
    /// * `store` - Store consulted for known bills and written to
    ///
    /// # Returns
    ///
    /// * `Ok(HarvestController)` - Ready to run
    /// * `Err(HarvestError)` - Invalid base URL, extraction settings or HTTP client
    pub fn new(config: Config, store: S) -> Result<Self, HarvestError> {
        let base_url = parse_base_url(&config.site.base_url)?;
        let fetcher = PageFetcher::new(
            &config.user_agent,
            Duration::from_secs(config.scraper.timeout_secs),
        )?;
        let parser = ListingParser::new(
            config.listing.clone(),
            base_url.clone(),
            &config.site.session_label,
        );
        let delay = Duration::from_millis(config.scraper.request_delay_ms);
        let extractor =
            TextExtractor::new(&config.extraction, base_url.clone())?.with_pause(delay);
        let progress = ProgressLog::new(Path::new(&config.output.data_dir));

        Ok(Self {
            config,
            base_url,
            fetcher,
            parser,
            extractor,
            store,
            progress,
            delay,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs the harvest over the configured page range
    ///
    /// Per-page and per-bill failures are logged and counted, never returned.
    pub async fn run(&mut self) -> HarvestReport {
        let start_page = self.config.scraper.start_page;
        let end_page = self.config.scraper.end_page;
        let start_time = Instant::now();
        let mut report = HarvestReport::default();

        tracing::info!(
            "Harvesting pages {}..={} of session '{}' ({} records already stored)",
            start_page,
            end_page,
            self.config.site.session_label,
            self.store.record_count()
        );

        for page in start_page..=end_page {
            report.pages_visited += 1;

            let outcome = match self.harvest_page(page, &mut report).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!("Page {}: {}", page, e);
                    report.page_failures += 1;
                    continue;
                }
            };

            tracing::info!(
                "Page {}: {} listed, {} new, {} skipped, {} persisted",
                page,
                outcome.listed,
                outcome.new,
                outcome.skipped,
                outcome.persisted
            );

            if let Err(e) = self.progress.append(Utc::now(), page, outcome.persisted) {
                tracing::warn!("Failed to append progress row for page {}: {}", page, e);
            }

            if outcome.new == 0 && outcome.skipped > 0 {
                tracing::info!(
                    "Page {} had only known bills; assuming no newer data and stopping (heuristic)",
                    page
                );
                report.stopped_early = true;
                break;
            }
        }

        tracing::debug!("Harvest took {:?}", start_time.elapsed());
        report
    }

    /// Fetches one listing page and processes its bills
    async fn harvest_page(
        &mut self,
        page: u32,
        report: &mut HarvestReport,
    ) -> Result<PageOutcome, HarvestError> {
        let url = search_page_url(&self.base_url, page, &self.config.site.session_filter);
        let body = self.fetcher.fetch(url.as_str()).await;
        self.pause().await;
        let body = body?;

        let document = Html::parse_document(&body);
        let summaries: Vec<BillSummary> = self.parser.parse(&document, url.as_str())?.collect();
        drop(document);

        let mut outcome = PageOutcome {
            listed: summaries.len(),
            ..PageOutcome::default()
        };
        report.bills_listed += summaries.len();

        for summary in summaries {
            if self.config.scraper.skip_existing
                && self.store.exists(&summary.session_label, &summary.number)
            {
                tracing::debug!("Skipping {}: already stored", summary.number);
                outcome.skipped += 1;
                report.skipped += 1;
                continue;
            }

            outcome.new += 1;
            if self.harvest_bill(summary, report).await {
                outcome.persisted += 1;
            }
        }

        Ok(outcome)
    }

    /// Extracts, persists and exports one bill
    ///
    /// # Returns
    ///
    /// `true` if the record was persisted
    async fn harvest_bill(&mut self, summary: BillSummary, report: &mut HarvestReport) -> bool {
        let reused = if self.config.scraper.skip_existing {
            self.reuse_text_export(&summary)
        } else {
            None
        };
        let extraction = match reused {
            Some(extraction) => extraction,
            None => self.fetch_and_extract(&summary).await,
        };

        let record = BillRecord::new(summary, extraction, &self.config.site.jurisdiction);
        *report.by_source.entry(record.text_source).or_default() += 1;
        tracing::info!(
            "{}: {} ({} characters)",
            record.number,
            record.text_source,
            record.text_length
        );

        match self.store.save(&record) {
            Ok(_) => report.persisted += 1,
            Err(e) => {
                tracing::error!("{}: {}", record.number, e);
                report.persist_failures += 1;
                return false;
            }
        }

        if self.should_export(&record) {
            match self.store.save_text(&record) {
                Ok(_) => report.texts_exported += 1,
                Err(e) => tracing::warn!("{}: text export failed: {}", record.number, e),
            }
        }

        true
    }

    /// Rebuilds the extraction from an existing text export, if there is one
    fn reuse_text_export(&self, summary: &BillSummary) -> Option<Extraction> {
        if !self
            .store
            .has_text_file(&summary.session_label, &summary.number)
        {
            return None;
        }

        match self.store.load_text(&summary.session_label, &summary.number) {
            Ok(export) => {
                tracing::debug!("{}: reusing text export", summary.number);
                Some(extraction_from_export(export, &summary.detail_url))
            }
            Err(e) => {
                tracing::warn!("{}: {}; fetching again", summary.number, e);
                None
            }
        }
    }

    /// Fetches the detail page and runs the extraction chain
    async fn fetch_and_extract(&self, summary: &BillSummary) -> Extraction {
        let detail = self.fetcher.fetch(&summary.detail_url).await;
        self.pause().await;

        match detail {
            Ok(html) => {
                self.extractor
                    .extract_text(&html, &summary.detail_url, &self.fetcher)
                    .await
            }
            Err(e) => {
                tracing::warn!("{}: {}", summary.number, e);
                Extraction::error(e)
            }
        }
    }

    /// A fresh run replaces existing exports; otherwise they are kept
    fn should_export(&self, record: &BillRecord) -> bool {
        record.text_source.is_success()
            && record.text_length > self.config.extraction.export_min_length
            && (!self.config.scraper.skip_existing
                || !self
                    .store
                    .has_text_file(&record.session_label, &record.number))
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Turns a text export back into an accepted extraction
///
/// The export keeps only one URL. It is the text URL, except for linked
/// sources where it equals the detail page, which means there was none.
fn extraction_from_export(export: TextExport, detail_url: &str) -> Extraction {
    let url = (export.source == TextSource::DirectPage || export.url != detail_url)
        .then_some(export.url);
    Extraction::accepted(export.source, export.text, url)
}
