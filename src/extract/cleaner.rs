//! Content cleaning for bill text pages
//!
//! Pulls the readable text out of a document's main content region and
//! normalizes it: paragraph breaks and runs of spaces are collapsed and known
//! site boilerplate is removed.

use crate::config::ExtractionConfig;
use crate::ConfigError;
use regex::{Regex, RegexBuilder};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Elements whose text never counts as bill content
const STRIPPED_ELEMENTS: &[&str] = &["script", "style", "nav", "header", "footer"];

static RE_BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("invalid regex: blank lines"));

static RE_INLINE_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("invalid regex: inline space"));

static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("invalid selector: body"));

/// Extracts and normalizes text from bill text documents
#[derive(Debug, Clone)]
pub struct TextCleaner {
    content_selectors: Vec<Selector>,
    boilerplate: Vec<Regex>,
    min_text_length: usize,
}

impl TextCleaner {
    /// Builds a cleaner from the extraction settings
    ///
    /// # Returns
    ///
    /// * `Ok(TextCleaner)` - All selectors and patterns compiled
    /// * `Err(ConfigError)` - A selector or pattern is invalid
    pub fn new(config: &ExtractionConfig) -> Result<Self, ConfigError> {
        let content_selectors = config
            .content_selectors
            .iter()
            .map(|s| {
                Selector::parse(s)
                    .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", s, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let boilerplate = config
            .boilerplate_patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", p, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            content_selectors,
            boilerplate,
            min_text_length: config.min_text_length,
        })
    }

    /// Returns true if `text` is long enough to be accepted
    pub fn accepts(&self, text: &str) -> bool {
        text.chars().count() > self.min_text_length
    }

    /// Extracts the cleaned main text of a bill text document
    ///
    /// Content selectors are tried in order; the first matching region whose
    /// raw text passes the length threshold wins. When none does, the whole
    /// body is used even if short.
    pub fn extract_clean_text(&self, document: &Html) -> String {
        for selector in &self.content_selectors {
            let Some(region) = document.select(selector).find(|el| !is_stripped(el)) else {
                continue;
            };

            let text = visible_text(region);
            if self.accepts(&text) {
                return self.clean(&text);
            }
        }

        document
            .select(&BODY_SELECTOR)
            .next()
            .map(|body| self.clean(&visible_text(body)))
            .unwrap_or_default()
    }

    /// Normalizes whitespace and removes boilerplate
    ///
    /// The pass is repeated until the text no longer changes, so cleaning an
    /// already-cleaned text returns it unchanged. Each changing pass either
    /// shortens the text or turns a tab into a space, so the loop ends.
    pub fn clean(&self, text: &str) -> String {
        let mut current = self.clean_once(text);
        loop {
            let next = self.clean_once(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn clean_once(&self, text: &str) -> String {
        let text = RE_BLANK_LINES.replace_all(text, "\n\n");
        let mut text = RE_INLINE_SPACE.replace_all(&text, " ").into_owned();

        for pattern in &self.boilerplate {
            text = pattern.replace_all(&text, "").into_owned();
        }

        text.trim().to_string()
    }
}

/// Collects the trimmed, non-empty text nodes under `element`, one per line
///
/// Text inside stripped elements is skipped.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut pieces = Vec::new();

    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let inside_stripped = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| STRIPPED_ELEMENTS.contains(&el.name()))
        });
        if inside_stripped {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            pieces.push(trimmed);
        }
    }

    pieces.join("\n")
}

/// Returns true if `element` is, or sits inside, a stripped element
fn is_stripped(element: &ElementRef<'_>) -> bool {
    STRIPPED_ELEMENTS.contains(&element.value().name())
        || element.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| STRIPPED_ELEMENTS.contains(&el.name()))
        })
}
