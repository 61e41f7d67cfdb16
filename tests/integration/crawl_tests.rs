//! Integration tests for the crawler
//!
//! These tests drive full crawl sessions against an in-memory fake browser
//! and a counting wrapper around the SQLite store.

use async_trait::async_trait;
use playlist_scraper::config::Config;
use playlist_scraper::crawler::{scrape_playlist, Coordinator};
use playlist_scraper::driver::{scripts, DriverError, DriverResult, PageDriver};
use playlist_scraper::state::SessionId;
use playlist_scraper::storage::{
    DatasetHandle, DatasetStore, PageResult, SqliteStorage, StorageError, StorageResult,
};
use playlist_scraper::url::validate_playlist_url;
use playlist_scraper::ScrapeError;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const PLAYLIST: &str = "https://www.youtube.com/playlist?list=PL1";

fn page_url(n: u32) -> String {
    if n == 1 {
        PLAYLIST.to_string()
    } else {
        format!("{}&page={}", PLAYLIST, n)
    }
}

fn next_href(n: u32) -> String {
    format!("/playlist?list=PL1&page={}", n)
}

/// Builds a rendered playlist page
fn page_html(views: &[&str], next: Option<&str>) -> String {
    let items: String = views
        .iter()
        .enumerate()
        .map(|(i, views)| {
            format!(
                r#"<ytd-playlist-video-renderer>
                     <a id="video-title">Video {i}</a>
                     <div id="video-info"><span>{views}</span></div>
                     <img src="https://i.ytimg.com/vi/{i}/default.jpg">
                   </ytd-playlist-video-renderer>"#
            )
        })
        .collect();

    let next = next
        .map(|href| {
            format!(r#"<tp-yt-paper-button aria-label="Next" href="{href}">Next</tp-yt-paper-button>"#)
        })
        .unwrap_or_default();

    format!(r#"<html><body><div id="contents">{items}</div>{next}</body></html>"#)
}

/// A browser that serves canned pages
///
/// Unknown URLs fail navigation. URLs marked as stalled never show the video
/// list.
#[derive(Default)]
struct FakeBrowser {
    pages: HashMap<String, String>,
    stalled: Vec<String>,
    navigate_delay: Option<Duration>,
    current: Mutex<String>,
    visited: Mutex<Vec<String>>,
}

impl FakeBrowser {
    fn with_page(mut self, url: String, html: String) -> Self {
        self.pages.insert(url, html);
        self
    }

    fn with_stalled(mut self, url: String) -> Self {
        self.stalled.push(url);
        self
    }

    fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageDriver for FakeBrowser {
    async fn navigate(&self, url: &str) -> DriverResult<()> {
        if let Some(delay) = self.navigate_delay {
            tokio::time::sleep(delay).await;
        }
        self.visited.lock().unwrap().push(url.to_string());
        if !self.pages.contains_key(url) && !self.stalled.iter().any(|u| u == url) {
            return Err(DriverError::Protocol {
                status: 500,
                error: "unknown error".to_string(),
                message: format!("net::ERR_NAME_NOT_RESOLVED at {}", url),
            });
        }
        *self.current.lock().unwrap() = url.to_string();
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, _timeout: Duration) -> DriverResult<()> {
        let current = self.current.lock().unwrap().clone();
        if self.stalled.contains(&current) {
            return Err(DriverError::Timeout(selector.to_string()));
        }
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> DriverResult<Value> {
        if script == scripts::SCROLL_HEIGHT {
            Ok(json!(4000))
        } else {
            Ok(Value::Null)
        }
    }

    async fn page_source(&self) -> DriverResult<String> {
        let current = self.current.lock().unwrap().clone();
        Ok(self.pages.get(&current).cloned().unwrap_or_default())
    }
}

/// SQLite store that counts dataset lifecycle calls
struct CountingStore {
    inner: SqliteStorage,
    opens: usize,
    drops: usize,
    fail_appends: bool,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: SqliteStorage::new_in_memory().unwrap(),
            opens: 0,
            drops: 0,
            fail_appends: false,
        }
    }

    fn failing() -> Self {
        Self {
            fail_appends: true,
            ..Self::new()
        }
    }
}

impl DatasetStore for CountingStore {
    fn open_dataset(&mut self, session_id: SessionId) -> StorageResult<DatasetHandle> {
        self.opens += 1;
        self.inner.open_dataset(session_id)
    }

    fn append(&mut self, handle: &DatasetHandle, page: &PageResult) -> StorageResult<()> {
        if self.fail_appends {
            return Err(StorageError::Unavailable("disk full".to_string()));
        }
        self.inner.append(handle, page)
    }

    fn read_all(&self, handle: &DatasetHandle) -> StorageResult<Vec<PageResult>> {
        self.inner.read_all(handle)
    }

    fn drop_dataset(&mut self, handle: &DatasetHandle) -> StorageResult<()> {
        self.drops += 1;
        self.inner.drop_dataset(handle)
    }
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.crawler.selector_timeout_ms = 10;
    config.crawler.scroll_settle_ms = 1;
    config.crawler.scroll_budget_ms = 10;
    config
}

fn shared(store: CountingStore) -> Arc<Mutex<CountingStore>> {
    Arc::new(Mutex::new(store))
}

#[tokio::test]
async fn test_two_page_playlist_end_to_end() {
    let browser = FakeBrowser::default()
        .with_page(
            page_url(1),
            page_html(&["10 views", "1K views", "2.1M views"], Some(&next_href(2))),
        )
        .with_page(page_url(2), page_html(&["500 views"], None));
    let store = shared(CountingStore::new());

    let coordinator = Coordinator::new(&test_config(), browser, store.clone()).unwrap();
    let request = validate_playlist_url(PLAYLIST).unwrap();
    let result = coordinator.run(&request).await.expect("Crawl failed");

    let views: Vec<u64> = result.video_list.iter().map(|v| v.views).collect();
    assert_eq!(views, vec![10, 1000, 2_100_000, 500]);

    let names: Vec<&str> = result.graph_data.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Video 1", "Video 2", "Video 3", "Video 4"]);
    assert_eq!(result.graph_data[3].views, 500);

    assert_eq!(result.video_list[0].title, "Video 0");
    assert_eq!(
        result.video_list[0].thumbnail,
        "https://i.ytimg.com/vi/0/default.jpg"
    );

    assert_eq!(coordinator.into_driver().visited(), vec![page_url(1), page_url(2)]);

    let store = store.lock().unwrap();
    assert_eq!(store.opens, 1);
    assert_eq!(store.drops, 1);
    assert_eq!(store.inner.count_datasets().unwrap(), 0);
}

#[tokio::test]
async fn test_cyclic_next_links_visit_each_page_once() {
    let browser = FakeBrowser::default()
        .with_page(page_url(1), page_html(&["1 view"], Some(&next_href(2))))
        .with_page(
            page_url(2),
            page_html(&["2 views"], Some("/playlist?list=PL1")),
        );
    let store = shared(CountingStore::new());

    let coordinator = Coordinator::new(&test_config(), browser, store.clone()).unwrap();
    let request = validate_playlist_url(PLAYLIST).unwrap();
    let result = coordinator.run(&request).await.unwrap();

    assert_eq!(result.video_list.len(), 2);
    assert_eq!(coordinator.into_driver().visited().len(), 2);
}

#[tokio::test]
async fn test_page_cap_stops_long_chain() {
    let mut browser = FakeBrowser::default();
    for n in 1..=10 {
        browser = browser.with_page(page_url(n), page_html(&["7 views"], Some(&next_href(n + 1))));
    }
    let mut config = test_config();
    config.crawler.max_pages = 3;
    let store = shared(CountingStore::new());

    let coordinator = Coordinator::new(&config, browser, store.clone()).unwrap();
    let request = validate_playlist_url(PLAYLIST).unwrap();
    let result = coordinator.run(&request).await.unwrap();

    assert_eq!(result.video_list.len(), 3);
    assert_eq!(
        coordinator.into_driver().visited(),
        vec![page_url(1), page_url(2), page_url(3)]
    );
    assert_eq!(store.lock().unwrap().drops, 1);
}

#[tokio::test]
async fn test_stalled_page_is_skipped() {
    let browser = FakeBrowser::default()
        .with_page(page_url(1), page_html(&["3K views"], Some(&next_href(2))))
        .with_stalled(page_url(2));
    let store = shared(CountingStore::new());

    let coordinator = Coordinator::new(&test_config(), browser, store.clone()).unwrap();
    let request = validate_playlist_url(PLAYLIST).unwrap();
    let result = coordinator.run(&request).await.expect("Stalled page should not fail the crawl");

    assert_eq!(result.video_list.len(), 1);
    assert_eq!(result.video_list[0].views, 3000);
    assert_eq!(coordinator.into_driver().visited().len(), 2);

    let store = store.lock().unwrap();
    assert_eq!(store.drops, 1);
    assert_eq!(store.inner.count_datasets().unwrap(), 0);
}

#[tokio::test]
async fn test_navigation_failure_is_skipped() {
    // Page 2 is linked but does not exist
    let browser =
        FakeBrowser::default().with_page(page_url(1), page_html(&["9 views"], Some(&next_href(2))));
    let store = shared(CountingStore::new());

    let coordinator = Coordinator::new(&test_config(), browser, store.clone()).unwrap();
    let request = validate_playlist_url(PLAYLIST).unwrap();
    let result = coordinator.run(&request).await.unwrap();

    assert_eq!(result.video_list.len(), 1);
    assert_eq!(store.lock().unwrap().drops, 1);
}

#[tokio::test]
async fn test_store_failure_aborts_and_drops_once() {
    let browser = FakeBrowser::default()
        .with_page(page_url(1), page_html(&["1 view"], Some(&next_href(2))))
        .with_page(page_url(2), page_html(&["2 views"], None));
    let store = shared(CountingStore::failing());

    let coordinator = Coordinator::new(&test_config(), browser, store.clone()).unwrap();
    let request = validate_playlist_url(PLAYLIST).unwrap();
    let result = coordinator.run(&request).await;

    assert!(matches!(result, Err(ScrapeError::Storage(_))));
    assert_eq!(coordinator.into_driver().visited(), vec![page_url(1)]);

    let store = store.lock().unwrap();
    assert_eq!(store.opens, 1);
    assert_eq!(store.drops, 1);
    assert_eq!(store.inner.count_datasets().unwrap(), 0);
}

#[tokio::test]
async fn test_empty_playlist() {
    let browser = FakeBrowser::default().with_page(page_url(1), page_html(&[], None));
    let store = shared(CountingStore::new());

    let coordinator = Coordinator::new(&test_config(), browser, store.clone()).unwrap();
    let request = validate_playlist_url(PLAYLIST).unwrap();
    let result = coordinator.run(&request).await.unwrap();

    assert!(result.video_list.is_empty());
    assert!(result.graph_data.is_empty());
    assert_eq!(store.lock().unwrap().drops, 1);
}

#[tokio::test]
async fn test_session_deadline_returns_results_so_far() {
    let mut browser = FakeBrowser::default();
    for n in 1..=5 {
        browser = browser.with_page(page_url(n), page_html(&["1 view"], Some(&next_href(n + 1))));
    }
    browser.navigate_delay = Some(Duration::from_millis(1100));
    let mut config = test_config();
    config.crawler.session_deadline_secs = Some(1);
    let store = shared(CountingStore::new());

    let coordinator = Coordinator::new(&config, browser, store.clone()).unwrap();
    let request = validate_playlist_url(PLAYLIST).unwrap();
    let result = coordinator.run(&request).await.unwrap();

    assert_eq!(result.video_list.len(), 1);
    assert_eq!(store.lock().unwrap().drops, 1);
}

#[tokio::test]
async fn test_concurrent_sessions_are_isolated() {
    let first = FakeBrowser::default().with_page(page_url(1), page_html(&["1 view"], None));
    let second = FakeBrowser::default().with_page(
        page_url(1),
        page_html(&["2 views", "3 views"], None),
    );
    let store = shared(CountingStore::new());
    let request = validate_playlist_url(PLAYLIST).unwrap();

    let a = Coordinator::new(&test_config(), first, store.clone()).unwrap();
    let b = Coordinator::new(&test_config(), second, store.clone()).unwrap();
    let (ra, rb) = tokio::join!(a.run(&request), b.run(&request));

    assert_eq!(ra.unwrap().video_list.len(), 1);
    assert_eq!(rb.unwrap().video_list.len(), 2);

    let store = store.lock().unwrap();
    assert_eq!(store.opens, 2);
    assert_eq!(store.drops, 2);
    assert_eq!(store.inner.count_datasets().unwrap(), 0);
}

#[tokio::test]
async fn test_invalid_url_rejected_before_any_dataset() {
    let store = shared(CountingStore::new());

    for url in ["", "   ", "not a url", "https://www.youtube.com/watch?v=abc"] {
        let result = scrape_playlist(&test_config(), store.clone(), url).await;
        assert!(
            matches!(result, Err(ScrapeError::InvalidInput(_))),
            "Expected InvalidInput for {:?}",
            url
        );
    }

    assert_eq!(store.lock().unwrap().opens, 0);
}

#[tokio::test]
async fn test_unreachable_browser_is_crawl_failure() {
    let mut config = test_config();
    config.webdriver.endpoint = "http://127.0.0.1:1".to_string();
    let store = shared(CountingStore::new());

    let result = scrape_playlist(&config, store.clone(), PLAYLIST).await;

    assert!(matches!(result, Err(ScrapeError::CrawlFailure)));
    assert_eq!(
        result.unwrap_err().to_string(),
        "An error occurred while scraping the playlist"
    );
    assert_eq!(store.lock().unwrap().opens, 0);
}
