use serde::Deserialize;

/// Main configuration structure for the playlist scraper
///
/// Every section is optional; missing sections and keys fall back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub webdriver: WebDriverConfig,
    pub storage: StorageConfig,
    pub selectors: SelectorConfig,
    pub server: ServerConfig,
}

/// Crawl loop behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of pages processed per session
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// How long to wait for the video list to appear (milliseconds)
    #[serde(rename = "selector-timeout-ms")]
    pub selector_timeout_ms: u64,

    /// Pause after each scroll before re-measuring the page (milliseconds)
    #[serde(rename = "scroll-settle-ms")]
    pub scroll_settle_ms: u64,

    /// Total time the scroller may spend on one page (milliseconds)
    #[serde(rename = "scroll-budget-ms")]
    pub scroll_budget_ms: u64,

    /// Wall-clock limit for a whole session (seconds)
    #[serde(rename = "session-deadline-secs")]
    pub session_deadline_secs: Option<u64>,

    /// Origin used to resolve relative next-page links.
    /// Defaults to the playlist URL's origin.
    #[serde(rename = "site-origin")]
    pub site_origin: Option<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 50,
            selector_timeout_ms: 30_000,
            scroll_settle_ms: 2_000,
            scroll_budget_ms: 60_000,
            session_deadline_secs: None,
            site_origin: None,
        }
    }
}

impl CrawlerConfig {
    /// Maximum number of scroll iterations the budget allows on one page
    pub fn max_scroll_iterations(&self) -> u64 {
        if self.scroll_settle_ms == 0 {
            return 1;
        }
        (self.scroll_budget_ms / self.scroll_settle_ms).max(1)
    }
}

/// WebDriver endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebDriverConfig {
    /// Base URL of the WebDriver server (chromedriver, geckodriver, Selenium)
    pub endpoint: String,

    /// Browser to request: "chrome" or "firefox"
    pub browser: String,

    /// Run the browser without a window
    pub headless: bool,

    /// Page-load timeout handed to the browser (milliseconds)
    #[serde(rename = "page-load-timeout-ms")]
    pub page_load_timeout_ms: u64,

    /// Delay between element lookups while waiting for a selector (milliseconds)
    #[serde(rename = "poll-interval-ms")]
    pub poll_interval_ms: u64,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:4444".to_string(),
            browser: "chrome".to_string(),
            headless: true,
            page_load_timeout_ms: 30_000,
            poll_interval_ms: 250,
        }
    }
}

/// Ephemeral store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite database, or ":memory:"
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: ":memory:".to_string(),
        }
    }
}

/// CSS selectors used against the rendered playlist page
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    #[serde(rename = "video-item")]
    pub video_item: String,

    pub title: String,

    pub views: String,

    pub thumbnail: String,

    #[serde(rename = "next-page")]
    pub next_page: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            video_item: "#contents ytd-playlist-video-renderer".to_string(),
            title: "#video-title".to_string(),
            views: "#video-info span".to_string(),
            thumbnail: "img".to_string(),
            next_page: r#"tp-yt-paper-button[aria-label="Next"]"#.to_string(),
        }
    }
}

/// HTTP API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    #[serde(rename = "bind-address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
        }
    }
}
