use crate::core::{QuestFetcher, RelayError};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::{Value, json};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<QuestFetcher>,
}

impl AppState {
    pub fn new(fetcher: Arc<QuestFetcher>) -> Self {
        Self { fetcher }
    }
}

/// Health check endpoint, independent of cache and upstream state
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /v1/quests/ - quest list, served from cache while fresh
pub async fn get_quests(State(state): State<AppState>) -> Result<Json<Vec<Value>>, RelayError> {
    let quests = state.fetcher.get_quests().await?;
    Ok(Json(quests))
}

pub async fn not_found() -> impl IntoResponse {
    let body = json!({
        "error": "Not Found",
        "message": "The requested endpoint does not exist",
        "status": 404
    });

    (StatusCode::NOT_FOUND, Json(body))
}
