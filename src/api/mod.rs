use crate::error::GameError;
use crate::services::{GameService, PreviewService};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub struct AppState {
    pub games: GameService,
    pub previews: PreviewService,
    /// Upper bound for one games request. The shared fetch keeps running past it.
    pub max_duration: Duration,
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/games", get(get_games))
        .route("/api/cache/clear", post(clear_cache))
        .route("/api/gameplay", get(get_gameplay))
        .route("/healthz", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn get_games(State(state): State<Arc<AppState>>) -> Response {
    match tokio::time::timeout(state.max_duration, state.games.get_games()).await {
        Ok(Ok(response)) => Json(response).into_response(),
        Ok(Err(e)) => {
            error!("Failed to fetch games: {}", e);
            e.into_response()
        }
        Err(_) => GameError::Timeout(state.max_duration.as_secs()).into_response(),
    }
}

async fn clear_cache(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let removed = state.games.clear_cache();
    info!("Cleared games cache ({} entries)", removed);
    Json(json!({ "success": true }))
}

#[derive(Debug, Deserialize)]
struct PreviewQuery {
    title: Option<String>,
}

async fn get_gameplay(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PreviewQuery>,
) -> impl IntoResponse {
    let title = query.title.unwrap_or_default();
    Json(state.previews.lookup(&title).await)
}
