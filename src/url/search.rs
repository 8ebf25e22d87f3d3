use url::Url;

/// Path of the paginated bill search on the legislature site
const SEARCH_PATH: &str = "/Bills/Search";

/// Query key carrying the general court (session) refinement
const SESSION_REFINEMENT_KEY: &str = "Refinements[lawsgeneralcourt]";

/// Encodes a session filter label the way the search refinements expect it
///
/// The site identifies refinement values by the hex encoding of their label,
/// so `"194th (Current)"` becomes `"3139347468202843757272656e7429"`.
pub fn encode_session_filter(label: &str) -> String {
    hex::encode(label.as_bytes())
}

/// Builds the URL of one search-results page
///
/// The resulting query is
/// `SearchTerms=&Page={page}&Refinements[lawsgeneralcourt]={hex(session_filter)}`,
/// form-encoded.
///
/// # Example
///
/// ```
/// use bill_harvest::url::search_page_url;
/// use url::Url;
///
/// let base = Url::parse("https://malegislature.gov").unwrap();
/// let url = search_page_url(&base, 3, "194th (Current)");
/// assert!(url.as_str().contains("Page=3"));
/// ```
pub fn search_page_url(base: &Url, page: u32, session_filter: &str) -> Url {
    let mut url = base.clone();
    url.set_path(SEARCH_PATH);
    url.set_fragment(None);
    url.query_pairs_mut()
        .clear()
        .append_pair("SearchTerms", "")
        .append_pair("Page", &page.to_string())
        .append_pair(SESSION_REFINEMENT_KEY, &encode_session_filter(session_filter));
    url
}
