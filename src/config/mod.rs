//! Configuration module for the playlist scraper
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional, so an empty file yields the default configuration.
//!
//! # Example
//!
//! ```no_run
//! use playlist_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scraper.toml")).unwrap();
//! println!("Page cap: {}", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, SelectorConfig, ServerConfig, StorageConfig, WebDriverConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
