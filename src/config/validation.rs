use crate::config::types::{
    Config, CrawlerConfig, SelectorConfig, ServerConfig, StorageConfig, WebDriverConfig,
};
use crate::ConfigError;
use scraper::Selector;
use std::net::SocketAddr;
use url::Url;

/// Browsers the WebDriver client knows how to request
const SUPPORTED_BROWSERS: &[&str] = &["chrome", "firefox"];

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_webdriver_config(&config.webdriver)?;
    validate_storage_config(&config.storage)?;
    validate_selectors(&config.selectors)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 || config.max_pages > 1000 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be between 1 and 1000, got {}",
            config.max_pages
        )));
    }

    if config.selector_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "selector_timeout_ms must be > 0".to_string(),
        ));
    }

    if config.scroll_settle_ms == 0 {
        return Err(ConfigError::Validation(
            "scroll_settle_ms must be > 0".to_string(),
        ));
    }

    if config.scroll_budget_ms < config.scroll_settle_ms {
        return Err(ConfigError::Validation(format!(
            "scroll_budget_ms ({}ms) must be >= scroll_settle_ms ({}ms)",
            config.scroll_budget_ms, config.scroll_settle_ms
        )));
    }

    if config.session_deadline_secs == Some(0) {
        return Err(ConfigError::Validation(
            "session_deadline_secs must be > 0 when set".to_string(),
        ));
    }

    if let Some(origin) = &config.site_origin {
        validate_http_url(origin, "site_origin")?;
    }

    Ok(())
}

/// Validates WebDriver endpoint configuration
fn validate_webdriver_config(config: &WebDriverConfig) -> Result<(), ConfigError> {
    validate_http_url(&config.endpoint, "webdriver endpoint")?;

    if !SUPPORTED_BROWSERS.contains(&config.browser.as_str()) {
        return Err(ConfigError::Validation(format!(
            "browser must be one of {:?}, got '{}'",
            SUPPORTED_BROWSERS, config.browser
        )));
    }

    if config.page_load_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "page_load_timeout_ms must be > 0".to_string(),
        ));
    }

    if config.poll_interval_ms == 0 {
        return Err(ConfigError::Validation(
            "poll_interval_ms must be > 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every selector parses
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (name, selector) in [
        ("video-item", &config.video_item),
        ("title", &config.title),
        ("views", &config.views),
        ("thumbnail", &config.thumbnail),
        ("next-page", &config.next_page),
    ] {
        Selector::parse(selector).map_err(|e| {
            ConfigError::InvalidSelector(format!("{} selector '{}': {:?}", name, selector, e))
        })?;
    }

    Ok(())
}

/// Validates server configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind_address.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!(
            "Invalid bind_address '{}': {}",
            config.bind_address, e
        ))
    })?;

    Ok(())
}

/// Checks that a string is an absolute http(s) URL
fn validate_http_url(value: &str, field: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}
