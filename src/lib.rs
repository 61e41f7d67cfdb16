//! Playlist Scraper: rendered-page playlist metadata extraction
//!
//! This crate drives a browser (through the WebDriver protocol) across every
//! page of a video playlist, extracts per-video metadata and returns both the
//! raw ordered video list and chart-ready graph data.

pub mod config;
pub mod crawler;
pub mod driver;
pub mod output;
pub mod server;
pub mod state;
pub mod storage;
pub mod url;
pub mod views;

use thiserror::Error;

/// Main error type for playlist scraping operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Page timed out: {url}")]
    PageTimeout { url: String },

    #[error("Extraction failed for {url}: {message}")]
    Extraction { url: String, message: String },

    #[error("Browser automation error: {0}")]
    Driver(#[from] driver::DriverError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("An error occurred while scraping the playlist")]
    CrawlFailure,
}

impl ScrapeError {
    /// Returns true if this error only affects the page being processed
    ///
    /// Page-level errors are logged and skipped by the crawl loop; every
    /// other error aborts the session.
    pub fn is_page_level(&self) -> bool {
        match self {
            Self::PageTimeout { .. } | Self::Extraction { .. } => true,
            Self::Driver(e) => e.is_page_level(),
            _ => false,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

/// Result type alias for scraping operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{scrape_playlist, Coordinator};
pub use output::{AggregateResult, GraphPoint};
pub use state::{CrawlPhase, SessionId};
pub use url::{validate_playlist_url, PlaylistRequest};
pub use views::parse_view_count;
