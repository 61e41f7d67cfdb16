//! Crawler module for rendered playlist pages
//!
//! This module contains the core crawling logic, including:
//! - The pagination frontier
//! - Lazy-load scrolling of rendered pages
//! - Video metadata extraction
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod frontier;
mod scroller;

pub use coordinator::Coordinator;
pub use extractor::{ExtractedPage, VideoExtractor};
pub use frontier::{Frontier, FrontierEntry, FrontierKey};
pub use scroller::stabilize;

use crate::config::Config;
use crate::driver::WebDriverClient;
use crate::output::AggregateResult;
use crate::storage::DatasetStore;
use crate::url::{validate_playlist_url, PlaylistRequest};
use crate::ScrapeError;
use std::sync::{Arc, Mutex};

/// Scrapes every page of a playlist
///
/// This is the main entry point for a scrape. It will:
/// 1. Validate the playlist URL
/// 2. Start a browser session on the configured WebDriver endpoint
/// 3. Run one crawl session over the playlist's pages
/// 4. Close the browser session, whatever the outcome
///
/// # Arguments
///
/// * `config` - Crawler, WebDriver and selector settings
/// * `store` - Shared dataset store
/// * `url` - The raw playlist URL
///
/// # Returns
///
/// * `Ok(AggregateResult)` - The ordered video list and graph data
/// * `Err(ScrapeError::InvalidInput)` - The URL was rejected; nothing was started
/// * `Err(ScrapeError::CrawlFailure)` - The crawl failed; the cause is logged
pub async fn scrape_playlist<S: DatasetStore>(
    config: &Config,
    store: Arc<Mutex<S>>,
    url: &str,
) -> Result<AggregateResult, ScrapeError> {
    let request = validate_playlist_url(url)?;

    crawl_with_browser(config, store, &request)
        .await
        .map_err(|e| {
            tracing::error!("Scrape of {} failed: {}", request.url, e);
            ScrapeError::CrawlFailure
        })
}

async fn crawl_with_browser<S: DatasetStore>(
    config: &Config,
    store: Arc<Mutex<S>>,
    request: &PlaylistRequest,
) -> Result<AggregateResult, ScrapeError> {
    let extractor = VideoExtractor::new(&config.selectors)?;
    let browser = WebDriverClient::new(&config.webdriver)?
        .start_session()
        .await?;

    tracing::debug!("Using browser session {}", browser.session_id());

    let coordinator = Coordinator::with_extractor(config, extractor, browser, store);
    let result = coordinator.run(request).await;

    if let Err(e) = coordinator.into_driver().close().await {
        tracing::warn!("Failed to close browser session: {}", e);
    }

    result
}
