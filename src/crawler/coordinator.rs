//! Crawl coordinator - the per-session crawl loop
//!
//! This module drives one crawl session through its lifecycle:
//! - Opening the session's dataset and seeding the frontier
//! - Navigating, stabilizing and extracting each page in turn
//! - Following "next page" links up to the page cap
//! - Skipping pages that fail on their own, aborting on fatal errors
//! - Aggregating the stored page results

use crate::config::{Config, CrawlerConfig};
use crate::crawler::extractor::{ExtractedPage, VideoExtractor};
use crate::crawler::frontier::Frontier;
use crate::crawler::scroller;
use crate::driver::{DriverError, PageDriver};
use crate::output::{aggregate, AggregateResult};
use crate::state::{CrawlPhase, CrawlSession};
use crate::storage::{DatasetLease, DatasetStore, PageResult};
use crate::url::{origin_url, PlaylistRequest};
use crate::{ConfigError, ScrapeError};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use url::Url;

/// Main crawler coordinator structure
///
/// One coordinator owns one page driver, so sessions run on it strictly one
/// at a time.
pub struct Coordinator<D: PageDriver, S: DatasetStore> {
    config: CrawlerConfig,
    item_selector: String,
    extractor: VideoExtractor,
    driver: D,
    store: Arc<Mutex<S>>,
}

impl<D: PageDriver, S: DatasetStore> Coordinator<D, S> {
    /// Creates a new coordinator
    ///
    /// # Arguments
    ///
    /// * `config` - Crawl settings and page selectors
    /// * `driver` - The rendered page to drive
    /// * `store` - Shared dataset store
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(ScrapeError::Config)` - A selector failed to compile
    pub fn new(config: &Config, driver: D, store: Arc<Mutex<S>>) -> Result<Self, ScrapeError> {
        let extractor = VideoExtractor::new(&config.selectors)?;
        Ok(Self::with_extractor(config, extractor, driver, store))
    }

    /// Creates a coordinator around an already compiled extractor
    pub fn with_extractor(
        config: &Config,
        extractor: VideoExtractor,
        driver: D,
        store: Arc<Mutex<S>>,
    ) -> Self {
        Self {
            config: config.crawler.clone(),
            item_selector: config.selectors.video_item.clone(),
            extractor,
            driver,
            store,
        }
    }

    /// Gives back the page driver, e.g. to close the browser session
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Runs one crawl session for a validated playlist
    ///
    /// # Session Flow
    ///
    /// 1. `Idle -> Running`: open the dataset and seed the frontier
    /// 2. Process pages until the frontier is empty, the page cap is hit or
    ///    the session deadline passes
    /// 3. `Running -> Draining`: read every stored page and aggregate
    /// 4. Drop the dataset, `Draining -> Closed`
    ///
    /// Page-level failures skip that page. Any other failure moves the
    /// session straight to `Closed` and is returned; the dataset is dropped
    /// on every path.
    pub async fn run(&self, request: &PlaylistRequest) -> Result<AggregateResult, ScrapeError> {
        let origin = self.resolve_origin(request)?;

        let mut session = CrawlSession::new(
            self.config.max_pages,
            self.config.session_deadline_secs.map(Duration::from_secs),
        );
        session.transition(CrawlPhase::Running)?;

        tracing::info!(
            "Session {} started for playlist {}",
            session.id,
            request.playlist_id
        );

        let lease = match DatasetLease::open(self.store.clone(), session.id) {
            Ok(lease) => lease,
            Err(e) => {
                abort(&mut session);
                return Err(e.into());
            }
        };

        let mut frontier = Frontier::new(session.id, origin);
        frontier.enqueue(request.url.clone());

        if let Err(e) = self.crawl_pages(&mut session, &lease, &mut frontier).await {
            abort(&mut session);
            if let Err(release_err) = lease.release() {
                tracing::warn!("Failed to drop dataset after abort: {}", release_err);
            }
            return Err(e);
        }

        session.transition(CrawlPhase::Draining)?;
        let pages = lease.read_all()?;
        lease.release()?;
        session.transition(CrawlPhase::Closed)?;

        let result = aggregate(pages);

        tracing::info!(
            "Session {} finished: {} pages processed, {} skipped, {} videos in {:?}",
            session.id,
            session.pages_processed,
            session.pages_skipped,
            result.video_list.len(),
            session.elapsed()
        );

        Ok(result)
    }

    /// The main crawl loop
    async fn crawl_pages(
        &self,
        session: &mut CrawlSession,
        lease: &DatasetLease<S>,
        frontier: &mut Frontier,
    ) -> Result<(), ScrapeError> {
        loop {
            if session.cap_reached() {
                tracing::info!("Page cap of {} reached", session.cap);
                break;
            }

            if session.deadline_exceeded(Instant::now()) {
                tracing::warn!(
                    "Session deadline reached after {:?}, stopping crawl",
                    session.elapsed()
                );
                break;
            }

            let entry = match frontier.dequeue() {
                Some(entry) => entry,
                None => {
                    tracing::debug!("Frontier is empty, crawl complete");
                    break;
                }
            };

            tracing::info!("Processing {}", entry.url);

            match self.process_page(&entry.url).await {
                Ok(page) => {
                    tracing::info!("Found {} videos", page.videos.len());

                    lease.append(&PageResult {
                        page_url: entry.url.to_string(),
                        videos: page.videos,
                    })?;

                    if session.can_enqueue() {
                        if let Some(next) = frontier.discover(page.next_href.as_deref()) {
                            if frontier.enqueue(next.clone()) {
                                tracing::info!("Queueing next page: {}", next);
                            } else {
                                tracing::debug!("Next page {} already seen", next);
                            }
                        }
                    }

                    session.record_page(false);
                }
                Err(e) if e.is_page_level() => {
                    tracing::warn!("Skipping page {}: {}", entry.url, e);
                    session.record_page(true);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    /// Renders one page and extracts its videos and next link
    async fn process_page(&self, url: &Url) -> Result<ExtractedPage, ScrapeError> {
        match self.driver.navigate(url.as_str()).await {
            Ok(()) => {}
            Err(DriverError::Timeout(_)) => {
                return Err(ScrapeError::PageTimeout {
                    url: url.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        scroller::stabilize(&self.driver, &self.item_selector, &self.config, url.as_str())
            .await?;

        let html = self.driver.page_source().await?;
        Ok(self.extractor.extract(&html, url))
    }

    /// Base URL for resolving next-page links
    fn resolve_origin(&self, request: &PlaylistRequest) -> Result<Url, ScrapeError> {
        match &self.config.site_origin {
            Some(origin) => Url::parse(origin).map_err(|e| {
                ScrapeError::Config(ConfigError::InvalidUrl(format!("{}: {}", origin, e)))
            }),
            None => origin_url(&request.url).ok_or_else(|| {
                ScrapeError::InvalidInput(format!("Playlist URL has no origin: {}", request.url))
            }),
        }
    }
}

/// Moves a failed session to `Closed`
fn abort(session: &mut CrawlSession) {
    for phase in [CrawlPhase::Draining, CrawlPhase::Closed] {
        if session.phase().can_transition_to(phase) {
            let _ = session.transition(phase);
        }
    }
}
