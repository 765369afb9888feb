//! Request handlers for the read API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::news::{Entry, SharedCollection};

/// Shared state for handlers.
pub struct AppState {
    /// Published view of the entry collection.
    pub news: SharedCollection,
}

impl AppState {
    /// Create handler state over a collection reader.
    pub fn new(news: SharedCollection) -> Self {
        Self { news }
    }
}

/// Body of `GET /api/news`.
#[derive(Debug, Serialize, Deserialize)]
pub struct NewsResponse {
    /// Entries, newest first.
    pub news: Vec<Entry>,
    /// Number of entries.
    pub count: usize,
}

/// GET /api/news - Current entries.
pub async fn list_news(State(state): State<Arc<AppState>>) -> Json<NewsResponse> {
    let entries = state.news.snapshot();
    Json(NewsResponse {
        count: entries.len(),
        news: entries.to_vec(),
    })
}

/// GET /health - Liveness check.
pub async fn health_check() -> &'static str {
    "OK"
}
