use crate::ScrapeError;
use url::Url;

/// Query parameter that carries the playlist id
pub const PLAYLIST_PARAM: &str = "list";

/// A validated playlist crawl request
///
/// Created once from caller input and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRequest {
    /// The parsed playlist URL (fragment removed)
    pub url: Url,

    /// The value of the `list` query parameter, never empty
    pub playlist_id: String,
}

/// Validates a raw playlist URL and derives the playlist id
///
/// # Validation Steps
///
/// 1. Reject empty or blank input
/// 2. Parse the URL; reject if malformed
/// 3. Reject schemes other than http and https
/// 4. Require a non-empty `list` query parameter
/// 5. Drop the fragment
///
/// All failures are `ScrapeError::InvalidInput` and happen before any
/// session resources are allocated.
///
/// # Examples
///
/// ```
/// use playlist_scraper::url::validate_playlist_url;
///
/// let request = validate_playlist_url("https://www.youtube.com/playlist?list=PL123").unwrap();
/// assert_eq!(request.playlist_id, "PL123");
/// ```
pub fn validate_playlist_url(raw: &str) -> Result<PlaylistRequest, ScrapeError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ScrapeError::InvalidInput(
            "Playlist URL is required".to_string(),
        ));
    }

    let mut url = Url::parse(raw)
        .map_err(|e| ScrapeError::InvalidInput(format!("Malformed playlist URL: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ScrapeError::InvalidInput(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    let playlist_id = url
        .query_pairs()
        .find(|(key, _)| key == PLAYLIST_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            ScrapeError::InvalidInput(format!(
                "Invalid playlist URL: missing '{}' parameter",
                PLAYLIST_PARAM
            ))
        })?;

    url.set_fragment(None);

    Ok(PlaylistRequest { url, playlist_id })
}
