//! Text location strategies
//!
//! A strategy inspects a bill's detail page and says where its text can be
//! found. Strategies never perform I/O; the extractor carries out whatever
//! the returned [`Attempt`] asks for.

use crate::bill::TextSource;
use crate::extract::cleaner::visible_text;
use crate::url::resolve_link;
use crate::HarvestError;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("invalid selector: a[href]"));

static DIRECT_CONTENT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".content").expect("invalid selector: .content"));

/// A parsed bill detail page
pub struct DetailPage {
    document: Html,
    url: Url,
    base_url: Url,
}

impl DetailPage {
    /// Parses a detail page fetched from `url`
    ///
    /// Relative links on the page resolve against `base_url`.
    pub fn parse(html: &str, url: Url, base_url: Url) -> Self {
        Self {
            document: Html::parse_document(html),
            url,
            base_url,
        }
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Finds the first link whose text contains `phrase`, ignoring case
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Url))` - The resolved target of the first matching link
    /// * `Ok(None)` - No link text contains the phrase
    /// * `Err(HarvestError)` - The matching link's href cannot be resolved
    pub fn find_link(&self, phrase: &str) -> Result<Option<Url>, HarvestError> {
        let phrase = phrase.to_lowercase();

        let Some(anchor) = self.document.select(&LINK_SELECTOR).find(|a| {
            a.text()
                .collect::<String>()
                .to_lowercase()
                .contains(&phrase)
        }) else {
            return Ok(None);
        };

        let href = anchor.value().attr("href").unwrap_or_default();
        let url = resolve_link(href, &self.base_url)?;
        Ok(Some(url))
    }
}

/// What the extractor should do to obtain a bill's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// Fetch the page and extract its main text
    Follow(Url),

    /// Record the URL without fetching it
    Reference(Url),

    /// Use this raw text taken from the detail page itself
    Inline(String),
}

/// One step of the extraction chain
pub trait TextStrategy {
    /// Source recorded when this strategy supplies the text
    fn source(&self) -> TextSource;

    /// Inspects the detail page
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Attempt))` - The strategy applies to this page
    /// * `Ok(None)` - Nothing for this strategy here
    /// * `Err(HarvestError)` - The page is unusable, ending the chain
    fn locate(&self, page: &DetailPage) -> Result<Option<Attempt>, HarvestError>;
}

/// Follows or references a link identified by its text
#[derive(Debug, Clone)]
pub struct LinkStrategy {
    phrase: String,
    source: TextSource,
    follow: bool,
}

impl LinkStrategy {
    /// A link whose target page is fetched and cleaned
    pub fn follow(phrase: &str, source: TextSource) -> Self {
        Self {
            phrase: phrase.to_string(),
            source,
            follow: true,
        }
    }

    /// A link whose target is only recorded, never fetched
    pub fn reference(phrase: &str, source: TextSource) -> Self {
        Self {
            phrase: phrase.to_string(),
            source,
            follow: false,
        }
    }
}

impl TextStrategy for LinkStrategy {
    fn source(&self) -> TextSource {
        self.source
    }

    fn locate(&self, page: &DetailPage) -> Result<Option<Attempt>, HarvestError> {
        let attempt = page.find_link(&self.phrase)?.map(|url| {
            if self.follow {
                Attempt::Follow(url)
            } else {
                Attempt::Reference(url)
            }
        });
        Ok(attempt)
    }
}

/// Reads the text of the detail page's own content region
#[derive(Debug, Clone, Default)]
pub struct DirectPageStrategy;

impl TextStrategy for DirectPageStrategy {
    fn source(&self) -> TextSource {
        TextSource::DirectPage
    }

    fn locate(&self, page: &DetailPage) -> Result<Option<Attempt>, HarvestError> {
        let text = page
            .document()
            .select(&DIRECT_CONTENT_SELECTOR)
            .next()
            .map(visible_text)
            .filter(|text| !text.is_empty());

        Ok(text.map(Attempt::Inline))
    }
}
