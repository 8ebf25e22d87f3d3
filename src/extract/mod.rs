//! Bill text extraction
//!
//! A bill's text is located through an ordered chain of strategies. The first
//! strategy that yields enough text wins and later ones are never consulted:
//!
//! 1. the page behind the "View Text" link
//! 2. the page behind the "Print Preview" link
//! 3. the "Download PDF" link, recorded without fetching
//! 4. the detail page's own content region
//!
//! When nothing qualifies the bill is marked `failed`; an unusable detail page
//! marks it `error`.

mod cleaner;
mod strategy;

pub use cleaner::{visible_text, TextCleaner};
pub use strategy::{Attempt, DetailPage, DirectPageStrategy, LinkStrategy, TextStrategy};

use crate::bill::TextSource;
use crate::config::ExtractionConfig;
use crate::harvest::PageFetcher;
use crate::{ConfigError, HarvestError};
use scraper::Html;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Link text of the plain-text rendition of a bill
pub const VIEW_TEXT_PHRASE: &str = "View Text";

/// Link text of the printable rendition of a bill
pub const PRINT_PREVIEW_PHRASE: &str = "Print Preview";

/// Link text of the PDF rendition of a bill
pub const DOWNLOAD_PDF_PHRASE: &str = "Download PDF";

/// Text recorded when no strategy produced enough text
pub const EXHAUSTED_TEXT: &str = "Could not extract bill text";

/// Outcome of running the extraction chain for one bill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Extracted text, or a placeholder sentinel
    pub text: String,

    pub source: TextSource,

    /// Where the text came from, if anywhere
    pub url: Option<String>,

    /// Length of `text` in characters; zero for sentinels
    pub length: usize,
}

impl Extraction {
    /// Text accepted from a strategy
    pub fn accepted(source: TextSource, text: String, url: Option<String>) -> Self {
        let length = text.chars().count();
        Self {
            text,
            source,
            url,
            length,
        }
    }

    /// A document that was located but not fetched
    pub fn placeholder(source: TextSource, url: &str) -> Self {
        Self {
            text: format!("PDF available at: {}", url),
            source,
            url: Some(url.to_string()),
            length: 0,
        }
    }

    /// No strategy produced enough text
    pub fn exhausted() -> Self {
        Self {
            text: EXHAUSTED_TEXT.to_string(),
            source: TextSource::Failed,
            url: None,
            length: 0,
        }
    }

    /// Extraction was aborted by `error`
    pub fn error(error: impl fmt::Display) -> Self {
        Self {
            text: format!("Error: {}", error),
            source: TextSource::Error,
            url: None,
            length: 0,
        }
    }
}

/// Runs the extraction chain over bill detail pages
pub struct TextExtractor {
    strategies: Vec<Box<dyn TextStrategy>>,
    cleaner: TextCleaner,
    base_url: Url,
    pause: Duration,
}

impl TextExtractor {
    /// Builds an extractor with the standard chain
    ///
    /// # Arguments
    ///
    /// * `config` - Extraction tuning (threshold, selectors, boilerplate)
    /// * `base_url` - Site origin that detail-page links resolve against
    pub fn new(config: &ExtractionConfig, base_url: Url) -> Result<Self, ConfigError> {
        let strategies: Vec<Box<dyn TextStrategy>> = vec![
            Box::new(LinkStrategy::follow(VIEW_TEXT_PHRASE, TextSource::ViewText)),
            Box::new(LinkStrategy::follow(
                PRINT_PREVIEW_PHRASE,
                TextSource::PrintPreview,
            )),
            Box::new(LinkStrategy::reference(DOWNLOAD_PDF_PHRASE, TextSource::Pdf)),
            Box::new(DirectPageStrategy),
        ];

        Ok(Self::with_strategies(
            TextCleaner::new(config)?,
            base_url,
            strategies,
        ))
    }

    /// Builds an extractor with a custom chain
    pub fn with_strategies(
        cleaner: TextCleaner,
        base_url: Url,
        strategies: Vec<Box<dyn TextStrategy>>,
    ) -> Self {
        Self {
            strategies,
            cleaner,
            base_url,
            pause: Duration::ZERO,
        }
    }

    /// Sets the pause that follows every linked-page fetch
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Extracts the text of one bill
    ///
    /// Never fails: exhaustion and errors become `failed` and `error`
    /// extractions so they are persisted and counted like any other outcome.
    ///
    /// # Arguments
    ///
    /// * `detail_html` - Body of the bill's detail page
    /// * `detail_url` - URL the detail page was fetched from
    /// * `fetcher` - Used to follow text links
    pub async fn extract_text(
        &self,
        detail_html: &str,
        detail_url: &str,
        fetcher: &PageFetcher,
    ) -> Extraction {
        match self.first_success(detail_html, detail_url, fetcher).await {
            Ok(extraction) => extraction,
            Err(HarvestError::ExtractionExhausted { url }) => {
                tracing::debug!("No strategy produced enough text for {}", url);
                Extraction::exhausted()
            }
            Err(e) => {
                tracing::warn!("Extraction aborted for {}: {}", detail_url, e);
                Extraction::error(e)
            }
        }
    }

    /// Evaluates the strategies in order and returns the first success
    async fn first_success(
        &self,
        detail_html: &str,
        detail_url: &str,
        fetcher: &PageFetcher,
    ) -> Result<Extraction, HarvestError> {
        let page = DetailPage::parse(
            detail_html,
            Url::parse(detail_url)?,
            self.base_url.clone(),
        );

        for strategy in &self.strategies {
            let source = strategy.source();
            let Some(attempt) = strategy.locate(&page)? else {
                tracing::trace!("{}: not applicable to {}", source, detail_url);
                continue;
            };

            match attempt {
                Attempt::Follow(url) => {
                    let body = fetcher.fetch(url.as_str()).await;
                    if !self.pause.is_zero() {
                        tokio::time::sleep(self.pause).await;
                    }

                    let body = match body {
                        Ok(body) => body,
                        Err(e) => {
                            tracing::warn!("{}: {}", source, e);
                            continue;
                        }
                    };

                    let text = self
                        .cleaner
                        .extract_clean_text(&Html::parse_document(&body));
                    if self.cleaner.accepts(&text) {
                        return Ok(Extraction::accepted(source, text, Some(url.to_string())));
                    }
                    tracing::debug!(
                        "{}: {} yielded {} characters",
                        source,
                        url,
                        text.chars().count()
                    );
                }
                Attempt::Reference(url) => {
                    return Ok(Extraction::placeholder(source, url.as_str()));
                }
                Attempt::Inline(raw) => {
                    let text = self.cleaner.clean(&raw);
                    if self.cleaner.accepts(&text) {
                        return Ok(Extraction::accepted(
                            source,
                            text,
                            Some(page.url().to_string()),
                        ));
                    }
                    tracing::debug!(
                        "{}: {} characters on the detail page",
                        source,
                        text.chars().count()
                    );
                }
            }
        }

        Err(HarvestError::ExtractionExhausted {
            url: detail_url.to_string(),
        })
    }
}
