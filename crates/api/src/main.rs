use std::net::SocketAddr;
use std::sync::Arc;

use kino_api::config::ServerConfig;
use kino_api::state::AppState;
use kino_bot::shutdown::shutdown_token;
use kino_bot::{BotConfig, UserLanes};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kino_api=debug,kino_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");
    let bot_config = BotConfig::from_env().expect("Invalid bot configuration");
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database, clients, dispatcher ---
    let services = kino_bot::startup::start(&bot_config)
        .await
        .expect("Failed to start bot services");

    if let Some(url) = &config.webhook_url {
        services
            .telegram
            .set_webhook(url, config.webhook_secret.as_deref())
            .await
            .expect("Failed to register webhook");
        tracing::info!(%url, "Webhook registered");
    }

    // --- App state ---
    let pool = services.pool.clone();
    let state = AppState {
        pool: services.pool,
        config: Arc::new(config.clone()),
        lanes: Arc::new(UserLanes::new(services.dispatcher)),
    };

    let app = kino_api::build_app(state);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let shutdown = shutdown_token();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .expect("Server error");

    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}
