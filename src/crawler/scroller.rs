//! Lazy-load scroller
//!
//! Drives a rendered page to a stable, fully loaded state by scrolling to the
//! bottom until the document height stops growing.

use crate::config::CrawlerConfig;
use crate::driver::{scripts, DriverError, PageDriver};
use crate::ScrapeError;
use serde_json::Value;
use std::time::Duration;

/// Waits for the first item and scrolls until the page height is stable
///
/// # Arguments
///
/// * `driver` - The page to drive
/// * `item_selector` - Selector that must appear before scrolling starts
/// * `config` - Timeouts and the scroll budget
/// * `page_url` - Used in error messages
///
/// # Returns
///
/// * `Ok(n)` - The height was stable after `n` scroll iterations
/// * `Err(ScrapeError::PageTimeout)` - The selector never appeared or the
///   height kept growing past the budget
/// * `Err(ScrapeError::Extraction)` - The page returned a non-numeric height
pub async fn stabilize<D: PageDriver + ?Sized>(
    driver: &D,
    item_selector: &str,
    config: &CrawlerConfig,
    page_url: &str,
) -> Result<u32, ScrapeError> {
    let selector_timeout = Duration::from_millis(config.selector_timeout_ms);
    match driver.wait_for_selector(item_selector, selector_timeout).await {
        Ok(()) => {}
        Err(DriverError::Timeout(_)) => {
            return Err(ScrapeError::PageTimeout {
                url: page_url.to_string(),
            });
        }
        Err(e) => return Err(e.into()),
    }

    let settle = Duration::from_millis(config.scroll_settle_ms);
    let max_iterations = config.max_scroll_iterations();
    let mut iterations: u32 = 0;

    while u64::from(iterations) < max_iterations {
        let before = scroll_height(driver, page_url).await?;
        driver.evaluate(scripts::SCROLL_TO_BOTTOM).await?;
        tokio::time::sleep(settle).await;
        let after = scroll_height(driver, page_url).await?;
        iterations += 1;

        if after == before {
            tracing::debug!(
                "Page {} stable at height {} after {} scrolls",
                page_url,
                after,
                iterations
            );
            return Ok(iterations);
        }
    }

    tracing::warn!(
        "Page {} still growing after {} scrolls",
        page_url,
        iterations
    );
    Err(ScrapeError::PageTimeout {
        url: page_url.to_string(),
    })
}

async fn scroll_height<D: PageDriver + ?Sized>(
    driver: &D,
    page_url: &str,
) -> Result<u64, ScrapeError> {
    let value = driver.evaluate(scripts::SCROLL_HEIGHT).await?;
    height_from(&value).ok_or_else(|| ScrapeError::Extraction {
        url: page_url.to_string(),
        message: format!("scroll height is not a number: {}", value),
    })
}

/// Reads a document height from a script result
fn height_from(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|h| *h >= 0.0).map(|h| h.round() as u64)),
        _ => None,
    }
}
