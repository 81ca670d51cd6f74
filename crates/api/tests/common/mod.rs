use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use kino_api::config::ServerConfig;
use kino_api::state::AppState;
use kino_bot::testing::{movie, FakeCatalog, RecordingTransport};
use kino_bot::{Dispatcher, UserLanes};
use sqlx::SqlitePool;
use tower::ServiceExt;

pub const SECRET: &str = "s3cret-token";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(webhook_secret: Option<&str>) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        webhook_secret: webhook_secret.map(str::to_string),
        webhook_url: None,
    }
}

/// Build the full application router over in-memory bot doubles.
pub fn build_test_app(
    pool: SqlitePool,
    webhook_secret: Option<&str>,
) -> (Router, Arc<RecordingTransport>) {
    let catalog = Arc::new(FakeCatalog::new(vec![movie(
        1,
        "Alien",
        1979,
        8.1,
        &["ужасы"],
    )]));
    let transport = Arc::new(RecordingTransport::new());
    let dispatcher = Dispatcher::new(catalog, transport.clone(), pool.clone(), Duration::ZERO);

    let state = AppState {
        pool,
        config: Arc::new(test_config(webhook_secret)),
        lanes: Arc::new(UserLanes::new(Arc::new(dispatcher))),
    };
    (kino_api::build_app(state), transport)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a raw JSON body to the webhook, with an optional secret header.
pub async fn post_update(app: Router, body: &str, secret: Option<&str>) -> Response<Body> {
    let mut request = Request::builder()
        .method(Method::POST)
        .uri("/telegram/webhook")
        .header("content-type", "application/json");
    if let Some(secret) = secret {
        request = request.header("x-telegram-bot-api-secret-token", secret);
    }
    app.oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Wait for queued updates to send `count` messages.
pub async fn wait_for_sends(transport: &RecordingTransport, count: usize) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while transport.sent().len() < count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("update was handled");
}

/// A private-chat text message update from user 5.
pub fn text_update(text: &str) -> String {
    serde_json::json!({
        "update_id": 100,
        "message": {
            "message_id": 10,
            "date": 0,
            "from": {"id": 5, "is_bot": false, "first_name": "Анна"},
            "chat": {"id": 5, "type": "private"},
            "text": text,
        }
    })
    .to_string()
}
