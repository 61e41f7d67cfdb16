//! Browser automation module
//!
//! This module defines the `PageDriver` trait the crawler uses to render and
//! inspect pages, and a W3C WebDriver implementation of it that talks to
//! chromedriver, geckodriver or a Selenium server over HTTP.

mod error;
mod webdriver;

pub use error::{DriverError, DriverResult};
pub use webdriver::{WebDriverClient, WebDriverSession};

use async_trait::async_trait;
use std::time::Duration;

/// Scripts evaluated in the page by the scroller
pub mod scripts {
    /// Returns the current document height
    pub const SCROLL_HEIGHT: &str = "return document.body.scrollHeight;";

    /// Scrolls the window to the bottom of the document
    pub const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";
}

/// Render/automation collaborator for one browser session
///
/// Implementations own a single page; the crawler drives it strictly one
/// navigation at a time.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Loads `url` in the page and waits for the navigation to finish
    async fn navigate(&self, url: &str) -> DriverResult<()>;

    /// Waits until an element matching `selector` exists
    ///
    /// Fails with `DriverError::Timeout` once `timeout` has elapsed.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> DriverResult<()>;

    /// Runs a script body in the page and returns its JSON result
    async fn evaluate(&self, script: &str) -> DriverResult<serde_json::Value>;

    /// Returns the serialized DOM of the current page
    async fn page_source(&self) -> DriverResult<String>;
}
