use url::Url;

/// Resolves a link href against the site base URL
///
/// Absolute hrefs are kept as they are; root-relative and path-relative hrefs
/// are joined onto `base`. Fragments are dropped since they never change the
/// document that gets fetched.
///
/// # Arguments
///
/// * `href` - The raw `href` attribute value
/// * `base` - The site base URL
///
/// # Returns
///
/// * `Ok(Url)` - The absolute URL
/// * `Err(url::ParseError)` - The href cannot be resolved
pub fn resolve_link(href: &str, base: &Url) -> Result<Url, url::ParseError> {
    let mut url = base.join(href.trim())?;
    url.set_fragment(None);
    Ok(url)
}
