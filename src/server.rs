//! HTTP API
//!
//! Exposes the scrape operation as `GET /analyze_playlist?link=<url>`.

use crate::config::Config;
use crate::crawler::scrape_playlist;
use crate::output::AggregateResult;
use crate::storage::SqliteStorage;
use crate::ScrapeError;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Shared state for request handlers
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<Mutex<SqliteStorage>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeQuery {
    link: Option<String>,
}

/// Builds the API router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/analyze_playlist", get(analyze_playlist))
        .with_state(state)
}

pub async fn analyze_playlist(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyzeQuery>,
) -> (StatusCode, Json<Value>) {
    let link = match query.link.as_deref().map(str::trim) {
        Some(link) if !link.is_empty() => link.to_string(),
        _ => return missing_link_response(),
    };

    info!("Analyzing playlist {}", link);
    api_response(scrape_playlist(&state.config, state.store.clone(), &link).await)
}

/// 400 response for a request without a playlist link
pub fn missing_link_response() -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Playlist link is required" })),
    )
}

/// Maps the outcome of a scrape onto the API response
///
/// Every failure, including a rejected URL, is reported with the same
/// generic message.
pub fn api_response(result: Result<AggregateResult, ScrapeError>) -> (StatusCode, Json<Value>) {
    match result {
        Ok(result) => (
            StatusCode::OK,
            Json(json!({
                "videoCount": result.video_list.len(),
                "videos": result.video_list,
            })),
        ),
        Err(e) => {
            warn!("Scrape request failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to scrape playlist" })),
            )
        }
    }
}

/// Serves the API until the process is stopped
pub async fn serve(config: Config, store: Arc<Mutex<SqliteStorage>>) -> std::io::Result<()> {
    let bind_address = config.server.bind_address.clone();
    let state = Arc::new(AppState {
        config: Arc::new(config),
        store,
    });

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state)).await
}
