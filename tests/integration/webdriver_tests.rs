//! Integration tests for the WebDriver client
//!
//! A wiremock server stands in for chromedriver/geckodriver.

use playlist_scraper::config::WebDriverConfig;
use playlist_scraper::driver::{DriverError, PageDriver, WebDriverClient, WebDriverSession};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SESSION: &str = "abc123";

fn config_for(server: &MockServer) -> WebDriverConfig {
    WebDriverConfig {
        endpoint: server.uri(),
        poll_interval_ms: 10,
        ..WebDriverConfig::default()
    }
}

fn session_path(command: &str) -> String {
    format!("/session/{}/{}", SESSION, command)
}

fn ok(value: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "value": value }))
}

fn wire_error(status: u16, error: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "value": { "error": error, "message": message, "stacktrace": "" }
    }))
}

/// Mounts session creation and timeouts, then starts a session
async fn start(server: &MockServer) -> WebDriverSession {
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ok(json!({ "sessionId": SESSION, "capabilities": {} })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(session_path("timeouts")))
        .respond_with(ok(json!(null)))
        .mount(server)
        .await;

    WebDriverClient::new(&config_for(server))
        .unwrap()
        .start_session()
        .await
        .expect("Failed to start session")
}

#[tokio::test]
async fn test_start_session_sends_capabilities_and_timeouts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/session"))
        .and(body_partial_json(json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": ["--headless=new", "--disable-gpu"] }
                }
            }
        })))
        .respond_with(ok(json!({ "sessionId": SESSION, "capabilities": {} })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(session_path("timeouts")))
        .and(body_partial_json(json!({ "pageLoad": 30000 })))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let session = WebDriverClient::new(&config_for(&server))
        .unwrap()
        .start_session()
        .await
        .unwrap();

    assert_eq!(session.session_id(), SESSION);
}

#[tokio::test]
async fn test_session_not_created() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(wire_error(500, "session not created", "Chrome failed to start"))
        .mount(&server)
        .await;

    let result = WebDriverClient::new(&config_for(&server))
        .unwrap()
        .start_session()
        .await;

    assert!(matches!(result, Err(DriverError::SessionLost(_))));
}

#[tokio::test]
async fn test_failed_timeouts_closes_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ok(json!({ "sessionId": SESSION })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(session_path("timeouts")))
        .respond_with(wire_error(400, "invalid argument", "bad timeouts"))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("/session/{}", SESSION)))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let result = WebDriverClient::new(&config_for(&server))
        .unwrap()
        .start_session()
        .await;

    assert!(matches!(
        result,
        Err(DriverError::Protocol { status: 400, .. })
    ));
}

#[tokio::test]
async fn test_navigate() {
    let server = MockServer::start().await;
    let session = start(&server).await;

    Mock::given(method("POST"))
        .and(path(session_path("url")))
        .and(body_json(json!({ "url": "https://www.youtube.com/playlist?list=PL1" })))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    session
        .navigate("https://www.youtube.com/playlist?list=PL1")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_navigation_timeout() {
    let server = MockServer::start().await;
    let session = start(&server).await;

    Mock::given(method("POST"))
        .and(path(session_path("url")))
        .respond_with(wire_error(500, "timeout", "page load timed out"))
        .mount(&server)
        .await;

    let result = session.navigate("https://www.youtube.com/playlist?list=PL1").await;
    assert!(matches!(result, Err(DriverError::Timeout(_))));
}

#[tokio::test]
async fn test_evaluate_returns_value() {
    let server = MockServer::start().await;
    let session = start(&server).await;

    Mock::given(method("POST"))
        .and(path(session_path("execute/sync")))
        .and(body_json(json!({
            "script": "return document.body.scrollHeight;",
            "args": []
        })))
        .respond_with(ok(json!(5120)))
        .mount(&server)
        .await;

    let value = session
        .evaluate("return document.body.scrollHeight;")
        .await
        .unwrap();
    assert_eq!(value, json!(5120));
}

#[tokio::test]
async fn test_script_error() {
    let server = MockServer::start().await;
    let session = start(&server).await;

    Mock::given(method("POST"))
        .and(path(session_path("execute/sync")))
        .respond_with(wire_error(500, "javascript error", "document is not defined"))
        .mount(&server)
        .await;

    let result = session.evaluate("return document.x;").await;
    assert!(matches!(result, Err(DriverError::Script(_))));
}

#[tokio::test]
async fn test_page_source() {
    let server = MockServer::start().await;
    let session = start(&server).await;

    Mock::given(method("GET"))
        .and(path(session_path("source")))
        .respond_with(ok(json!("<html><body>playlist</body></html>")))
        .mount(&server)
        .await;

    let html = session.page_source().await.unwrap();
    assert_eq!(html, "<html><body>playlist</body></html>");
}

#[tokio::test]
async fn test_page_source_not_a_string() {
    let server = MockServer::start().await;
    let session = start(&server).await;

    Mock::given(method("GET"))
        .and(path(session_path("source")))
        .respond_with(ok(json!({ "unexpected": true })))
        .mount(&server)
        .await;

    let result = session.page_source().await;
    assert!(matches!(result, Err(DriverError::UnexpectedResponse(_))));
}

#[tokio::test]
async fn test_wait_for_selector_found() {
    let server = MockServer::start().await;
    let session = start(&server).await;

    Mock::given(method("POST"))
        .and(path(session_path("element")))
        .and(body_json(json!({
            "using": "css selector",
            "value": "#contents ytd-playlist-video-renderer"
        })))
        .respond_with(ok(json!({
            "element-6066-11e4-a52e-4f735466cecf": "node-1"
        })))
        .mount(&server)
        .await;

    session
        .wait_for_selector("#contents ytd-playlist-video-renderer", Duration::from_millis(200))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_wait_for_selector_times_out() {
    let server = MockServer::start().await;
    let session = start(&server).await;

    Mock::given(method("POST"))
        .and(path(session_path("element")))
        .respond_with(wire_error(404, "no such element", "Unable to locate element"))
        .mount(&server)
        .await;

    let result = session
        .wait_for_selector("#missing", Duration::from_millis(50))
        .await;

    assert!(matches!(result, Err(DriverError::Timeout(_))));
    let requests = server.received_requests().await.unwrap();
    let lookups = requests
        .iter()
        .filter(|r| r.url.path() == session_path("element"))
        .count();
    assert!(lookups >= 2, "Expected repeated polling, got {}", lookups);
}

#[tokio::test]
async fn test_invalid_session_is_session_lost() {
    let server = MockServer::start().await;
    let session = start(&server).await;

    Mock::given(method("GET"))
        .and(path(session_path("source")))
        .respond_with(wire_error(404, "invalid session id", "session deleted"))
        .mount(&server)
        .await;

    let err = session.page_source().await.unwrap_err();
    assert!(matches!(err, DriverError::SessionLost(_)));
    assert!(!err.is_page_level());
}

#[tokio::test]
async fn test_non_json_error_body() {
    let server = MockServer::start().await;
    let session = start(&server).await;

    Mock::given(method("POST"))
        .and(path(session_path("url")))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let result = session.navigate("https://www.youtube.com/playlist?list=PL1").await;
    assert!(matches!(
        result,
        Err(DriverError::Protocol { status: 502, .. })
    ));
}

#[tokio::test]
async fn test_close_sends_delete() {
    let server = MockServer::start().await;
    let session = start(&server).await;

    Mock::given(method("DELETE"))
        .and(path(format!("/session/{}", SESSION)))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    session.close().await.unwrap();
}
