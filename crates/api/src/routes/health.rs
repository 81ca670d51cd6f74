//! Liveness of the bot process.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the search log is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Users in the middle of a search wizard.
    pub active_sessions: usize,
    /// Users with webhook updates queued or in progress.
    pub open_lanes: usize,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = kino_db::health_check(&state.pool).await.is_ok();
    let active_sessions = state.lanes.dispatcher().sessions().len().await;

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        active_sessions,
        open_lanes: state.lanes.open(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
