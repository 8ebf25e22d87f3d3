//! Search-results listing parser
//!
//! Turns one search-results page into bill summaries. Parsing is pure: the
//! returned iterator borrows the document and yields one summary per usable
//! table row.

use crate::bill::BillSummary;
use crate::config::ListingConfig;
use crate::url::resolve_link;
use crate::HarvestError;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("invalid selector: table"));

static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("invalid selector: tr"));

static HEADER_CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("th").expect("invalid selector: th"));

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("invalid selector: a[href]"));

/// Extracts bill summaries from search-results pages
#[derive(Debug, Clone)]
pub struct ListingParser {
    columns: ListingConfig,
    base_url: Url,
    session_label: String,
}

impl ListingParser {
    /// Creates a parser
    ///
    /// # Arguments
    ///
    /// * `columns` - Positions of the number, sponsor and title cells
    /// * `base_url` - Site origin that detail links resolve against
    /// * `session_label` - Session stamped on every summary
    pub fn new(columns: ListingConfig, base_url: Url, session_label: &str) -> Self {
        Self {
            columns,
            base_url,
            session_label: session_label.to_string(),
        }
    }

    /// Parses a search-results document
    ///
    /// # Arguments
    ///
    /// * `document` - The parsed listing page
    /// * `page_url` - URL of the page, for error reporting
    ///
    /// # Returns
    ///
    /// * `Ok(iterator)` - Summaries of the rows with a linked bill number
    /// * `Err(HarvestError::ParseAnomaly)` - The page has no results table
    pub fn parse<'a>(
        &'a self,
        document: &'a Html,
        page_url: &str,
    ) -> Result<impl Iterator<Item = BillSummary> + 'a, HarvestError> {
        let table = document
            .select(&TABLE_SELECTOR)
            .next()
            .ok_or_else(|| HarvestError::ParseAnomaly {
                url: page_url.to_string(),
                message: "no results table".to_string(),
            })?;

        Ok(table
            .select(&ROW_SELECTOR)
            .filter_map(move |row| self.parse_row(row)))
    }

    /// Builds a summary from one table row, or drops the row
    fn parse_row(&self, row: ElementRef<'_>) -> Option<BillSummary> {
        if row.select(&HEADER_CELL_SELECTOR).next().is_some() {
            return None;
        }

        let cells: Vec<ElementRef<'_>> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|cell| cell.value().name() == "td")
            .collect();

        let ListingConfig {
            number_column,
            sponsor_column,
            title_column,
        } = self.columns;
        let needed = number_column.max(sponsor_column).max(title_column) + 1;
        if cells.is_empty() || cells.len() < needed {
            return None;
        }

        let number_link = cells[number_column].select(&LINK_SELECTOR).next()?;
        let number = link_text(number_link);
        if number.is_empty() {
            return None;
        }

        let href = number_link.value().attr("href").unwrap_or_default();
        let detail_url = match resolve_link(href, &self.base_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Dropping {}: unresolvable link '{}': {}", number, href, e);
                return None;
            }
        };

        Some(BillSummary {
            number,
            sponsor: cell_link_text(cells[sponsor_column]),
            title: cell_link_text(cells[title_column]),
            detail_url: detail_url.to_string(),
            session_label: self.session_label.clone(),
        })
    }
}

/// Concatenated trimmed text nodes of a link
fn link_text(link: ElementRef<'_>) -> String {
    link.text().map(str::trim).collect()
}

/// Text of the first link in a cell, if any
fn cell_link_text(cell: ElementRef<'_>) -> Option<String> {
    cell.select(&LINK_SELECTOR)
        .next()
        .map(link_text)
        .filter(|text| !text.is_empty())
}
