//! W3C WebDriver client
//!
//! This module speaks the WebDriver wire protocol over HTTP:
//! - Creating a headless browser session with page-load timeouts
//! - Navigation, element lookup and synchronous script execution
//! - Page source snapshots
//! - Mapping wire errors onto `DriverError`

use crate::config::WebDriverConfig;
use crate::driver::{DriverError, DriverResult, PageDriver};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::time::{Duration, Instant};

/// Locator strategy used for every element lookup
const CSS_SELECTOR: &str = "css selector";

/// Extra time an HTTP command may take beyond the browser's page-load timeout
const COMMAND_GRACE: Duration = Duration::from_secs(30);

/// Builds an HTTP client for talking to a WebDriver server
///
/// The request timeout is the page-load timeout plus a grace period, since a
/// navigation command only returns once the browser has loaded the page.
pub fn build_http_client(config: &WebDriverConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(format!("playlist-scraper/{}", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_millis(config.page_load_timeout_ms) + COMMAND_GRACE)
        .connect_timeout(Duration::from_secs(10))
        .build()
}

/// Entry point for creating browser sessions on one WebDriver server
pub struct WebDriverClient {
    client: Client,
    endpoint: String,
    config: WebDriverConfig,
}

impl WebDriverClient {
    /// Creates a client for the endpoint in `config`
    pub fn new(config: &WebDriverConfig) -> DriverResult<Self> {
        let client = build_http_client(config)?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            config: config.clone(),
        })
    }

    /// Starts a new browser session
    ///
    /// # Request Flow
    ///
    /// 1. POST `/session` with the browser capabilities
    /// 2. POST `/session/{id}/timeouts` with the page-load timeout
    ///
    /// If step 2 fails the session is deleted before the error is returned.
    pub async fn start_session(&self) -> DriverResult<WebDriverSession> {
        let value = send(
            self.client
                .post(format!("{}/session", self.endpoint))
                .json(&capabilities(&self.config)),
        )
        .await?;

        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                DriverError::UnexpectedResponse(format!("no sessionId in {}", value))
            })?
            .to_string();

        tracing::debug!("Started WebDriver session {}", session_id);

        let session = WebDriverSession {
            client: self.client.clone(),
            base: format!("{}/session/{}", self.endpoint, session_id),
            session_id,
            poll_interval: Duration::from_millis(self.config.poll_interval_ms),
        };

        let timeouts = json!({
            "pageLoad": self.config.page_load_timeout_ms,
            "script": self.config.page_load_timeout_ms,
        });
        if let Err(e) = send(session.client.post(session.url("timeouts")).json(&timeouts)).await
        {
            if let Err(close_err) = session.close().await {
                tracing::warn!("Failed to close half-started session: {}", close_err);
            }
            return Err(e);
        }

        Ok(session)
    }
}

/// Builds the `capabilities` body for a new session
fn capabilities(config: &WebDriverConfig) -> Value {
    let mut always_match = json!({ "browserName": config.browser });

    if config.headless {
        match config.browser.as_str() {
            "firefox" => {
                always_match["moz:firefoxOptions"] = json!({ "args": ["-headless"] });
            }
            _ => {
                always_match["goog:chromeOptions"] =
                    json!({ "args": ["--headless=new", "--disable-gpu"] });
            }
        }
    }

    json!({ "capabilities": { "alwaysMatch": always_match } })
}

/// Sends a WebDriver command and unwraps the `value` envelope
async fn send(request: RequestBuilder) -> DriverResult<Value> {
    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    let body: Value = if text.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(e) if status.is_success() => {
                return Err(DriverError::UnexpectedResponse(format!(
                    "invalid JSON body: {}",
                    e
                )));
            }
            Err(_) => {
                return Err(DriverError::Protocol {
                    status: status.as_u16(),
                    error: "unknown error".to_string(),
                    message: text,
                });
            }
        }
    };

    let value = body.get("value").cloned().unwrap_or(Value::Null);

    if status.is_success() {
        return Ok(value);
    }

    let error = value
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("unknown error");
    let message = value.get("message").and_then(Value::as_str).unwrap_or("");

    Err(DriverError::from_wire(status.as_u16(), error, message))
}

/// One live browser session
pub struct WebDriverSession {
    client: Client,
    base: String,
    session_id: String,
    poll_interval: Duration,
}

impl WebDriverSession {
    /// The id the WebDriver server assigned to this session
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn url(&self, command: &str) -> String {
        format!("{}/{}", self.base, command)
    }

    /// Looks up one element by CSS selector
    async fn find_element(&self, selector: &str) -> DriverResult<Value> {
        send(
            self.client
                .post(self.url("element"))
                .json(&json!({ "using": CSS_SELECTOR, "value": selector })),
        )
        .await
    }

    /// Ends the browser session
    pub async fn close(self) -> DriverResult<()> {
        send(self.client.delete(&self.base)).await?;
        tracing::debug!("Closed WebDriver session {}", self.session_id);
        Ok(())
    }
}

#[async_trait]
impl PageDriver for WebDriverSession {
    async fn navigate(&self, url: &str) -> DriverResult<()> {
        send(self.client.post(self.url("url")).json(&json!({ "url": url }))).await?;
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> DriverResult<()> {
        let started = Instant::now();

        loop {
            match self.find_element(selector).await {
                Ok(_) => return Ok(()),
                Err(DriverError::NoSuchElement(_)) => {}
                Err(e) => return Err(e),
            }

            let elapsed = started.elapsed();
            if elapsed >= timeout {
                return Err(DriverError::Timeout(format!(
                    "waiting {:?} for selector '{}'",
                    timeout, selector
                )));
            }

            tokio::time::sleep(self.poll_interval.min(timeout - elapsed)).await;
        }
    }

    async fn evaluate(&self, script: &str) -> DriverResult<Value> {
        send(
            self.client
                .post(self.url("execute/sync"))
                .json(&json!({ "script": script, "args": [] })),
        )
        .await
    }

    async fn page_source(&self) -> DriverResult<String> {
        match send(self.client.get(self.url("source"))).await? {
            Value::String(html) => Ok(html),
            other => Err(DriverError::UnexpectedResponse(format!(
                "page source is not a string: {}",
                other
            ))),
        }
    }
}
