//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use tracing::info;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/lines/search", get(search_lines))
        .route("/api/arrivals", get(arrivals))
        .route("/api/watch", put(set_watch).delete(clear_watch))
        .route("/api/snapshot", get(snapshot))
        .with_state(state)
}

/// Errors surfaced to HTTP clients.
enum AppError {
    /// Upstream API could not be reached or answered badly.
    Upstream(String),

    /// Upstream authentication failed.
    AuthFailed,

    /// The requested line could not be resolved.
    LineNotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Upstream(message) => (StatusCode::BAD_GATEWAY, message),
            AppError::AuthFailed => (
                StatusCode::BAD_GATEWAY,
                "authentication with the transit API failed".to_string(),
            ),
            AppError::LineNotFound(line) => (
                StatusCode::NOT_FOUND,
                format!("no directional records for line {line}"),
            ),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search line records by public code (dashboard autocomplete).
async fn search_lines(
    State(state): State<AppState>,
    Query(query): Query<LineSearchQuery>,
) -> Result<Json<LineSearchResponse>, AppError> {
    use crate::engine::TransitApi;

    if !state.api.authenticate().await {
        return Err(AppError::AuthFailed);
    }

    let records = state
        .api
        .search_lines(query.q.trim())
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    let lines = records.iter().map(LineSearchResult::from).collect();
    Ok(Json(LineSearchResponse { lines }))
}

/// Arrival predictions for both directions of a line.
async fn arrivals(
    State(state): State<AppState>,
    Query(query): Query<ArrivalsQuery>,
) -> Result<Json<ArrivalsResponse>, AppError> {
    use crate::engine::TransitApi;

    if !state.api.authenticate().await {
        return Err(AppError::AuthFailed);
    }

    let line = query.line.trim();
    let arrivals = crate::engine::arrivals_for_line(&*state.api, line)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    match arrivals {
        Some(arrivals) => Ok(Json(ArrivalsResponse::from(&arrivals))),
        None => Err(AppError::LineNotFound(line.to_string())),
    }
}

/// Replace the tracked term list.
async fn set_watch(
    State(state): State<AppState>,
    Json(request): Json<WatchRequest>,
) -> Json<WatchResponse> {
    state.tracker.set_terms(request.terms).await;
    let terms = state.tracker.terms().await;
    info!(count = terms.len(), "watch list updated");
    Json(WatchResponse { terms })
}

/// Stop tracking.
async fn clear_watch(State(state): State<AppState>) -> StatusCode {
    state.tracker.clear().await;
    StatusCode::NO_CONTENT
}

/// The latest published snapshot.
async fn snapshot(State(state): State<AppState>) -> Json<SnapshotResponse> {
    let snapshot = state.tracker.snapshot().await;
    let progress = state.tracker.progress().await;
    Json(SnapshotResponse::from_snapshot(snapshot, progress))
}
