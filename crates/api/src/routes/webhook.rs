//! Update delivery from the chat platform.
//!
//! Each delivery is acknowledged as soon as it is accepted. The update is
//! queued on its sender's lane, so a slow catalog never makes the platform
//! redeliver and concurrent deliveries from one user keep their order.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use kino_chat::mapping::to_inbound;
use kino_chat::types::Update;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Header carrying the secret registered with `setWebhook`.
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// POST /telegram/webhook
async fn receive_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<StatusCode> {
    if let Some(secret) = &state.config.webhook_secret {
        let given = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
        if given != Some(secret.as_str()) {
            tracing::warn!("Webhook delivery with a bad secret rejected");
            return Err(AppError::Unauthorized);
        }
    }

    let update: Update = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Malformed update: {e}")))?;
    let update_id = update.update_id;

    let Some(inbound) = to_inbound(update) else {
        tracing::debug!(update_id, "Update ignored");
        return Ok(StatusCode::OK);
    };

    state.lanes.push(inbound);
    Ok(StatusCode::OK)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/telegram/webhook", post(receive_update))
}
