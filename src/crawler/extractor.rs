//! Video metadata extraction from a rendered page snapshot
//!
//! This module handles parsing the stabilized page source to extract:
//! - One `VideoRecord` per playlist item, in DOM order
//! - The href of the "next page" control, if any
//!
//! `scraper::Html` is not `Send`, so parsing stays inside synchronous calls
//! and never lives across an await point.

use crate::config::SelectorConfig;
use crate::storage::VideoRecord;
use crate::views::parse_view_count;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// What one page yielded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedPage {
    /// Videos in DOM order
    pub videos: Vec<VideoRecord>,

    /// Raw href of the next-page control
    pub next_href: Option<String>,
}

/// Compiled selectors for the playlist page layout
#[derive(Debug)]
pub struct VideoExtractor {
    item: Selector,
    title: Selector,
    views: Selector,
    thumbnail: Selector,
    next_page: Selector,
}

impl VideoExtractor {
    /// Compiles the configured selectors
    ///
    /// # Returns
    ///
    /// * `Ok(VideoExtractor)` - Every selector parsed
    /// * `Err(ConfigError::InvalidSelector)` - A selector is not valid CSS
    pub fn new(selectors: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            item: compile(&selectors.video_item)?,
            title: compile(&selectors.title)?,
            views: compile(&selectors.views)?,
            thumbnail: compile(&selectors.thumbnail)?,
            next_page: compile(&selectors.next_page)?,
        })
    }

    /// Extracts videos and the next-page link from page HTML
    ///
    /// Missing fields fall back to defaults: an empty title, zero views and
    /// an empty thumbnail.
    ///
    /// # Arguments
    ///
    /// * `html` - The page source
    /// * `page_url` - The page's URL, for resolving relative thumbnails
    pub fn extract(&self, html: &str, page_url: &Url) -> ExtractedPage {
        let document = Html::parse_document(html);

        let videos = document
            .select(&self.item)
            .map(|item| self.extract_video(item, page_url))
            .collect();

        let next_href = document
            .select(&self.next_page)
            .next()
            .and_then(|control| control.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .map(str::to_string);

        ExtractedPage { videos, next_href }
    }

    fn extract_video(&self, item: ElementRef<'_>, page_url: &Url) -> VideoRecord {
        let title = item
            .select(&self.title)
            .next()
            .map(text_of)
            .unwrap_or_default();

        let views = item
            .select(&self.views)
            .next()
            .map(|span| parse_view_count(&text_of(span)))
            .unwrap_or(0);

        let thumbnail = item
            .select(&self.thumbnail)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(|src| resolve_thumbnail(src.trim(), page_url))
            .unwrap_or_default();

        VideoRecord {
            title,
            views,
            thumbnail,
        }
    }
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Makes a thumbnail src absolute; keeps it as-is if it cannot be joined
fn resolve_thumbnail(src: &str, page_url: &Url) -> String {
    if src.is_empty() {
        return String::new();
    }
    page_url
        .join(src)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| src.to_string())
}
