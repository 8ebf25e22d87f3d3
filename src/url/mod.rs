//! URL handling module for Bill-Harvest
//!
//! This module provides site base URL parsing, link resolution against the
//! site origin, and construction of the paginated bill search URLs.

mod resolve;
mod search;

pub use resolve::resolve_link;
pub use search::{encode_session_filter, search_page_url};

use crate::UrlError;
use url::Url;

/// Parses and checks the site base URL
///
/// Only HTTP and HTTPS URLs that can serve as a base for relative links are
/// accepted.
///
/// # Examples
///
/// ```
/// use bill_harvest::url::parse_base_url;
///
/// let base = parse_base_url("https://malegislature.gov").unwrap();
/// assert_eq!(base.as_str(), "https://malegislature.gov/");
/// ```
pub fn parse_base_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.cannot_be_a_base() {
        return Err(UrlError::CannotBeABase(url_str.to_string()));
    }

    Ok(url)
}
