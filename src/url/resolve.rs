use url::Url;

/// Returns the origin of a URL (`scheme://host[:port]/`) as a URL
///
/// Returns None for opaque origins (e.g. `data:` URLs).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use playlist_scraper::url::origin_url;
///
/// let url = Url::parse("https://www.youtube.com/playlist?list=PL1").unwrap();
/// assert_eq!(origin_url(&url).unwrap().as_str(), "https://www.youtube.com/");
/// ```
pub fn origin_url(url: &Url) -> Option<Url> {
    let origin = url.origin();
    if !origin.is_tuple() {
        return None;
    }
    Url::parse(&origin.ascii_serialization()).ok()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - empty hrefs and fragment-only links
/// - javascript:, mailto:, tel:, data: links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute)
        }
        _ => None,
    }
}
