use std::sync::Arc;

use kino_bot::UserLanes;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Search log connection pool.
    pub pool: kino_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Per-user queues in front of the dispatcher.
    pub lanes: Arc<UserLanes>,
}
