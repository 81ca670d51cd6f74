use kino_bot::shutdown::shutdown_token;
use kino_bot::BotConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod poller;

use poller::Poller;

/// Default long-poll timeout in seconds.
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kino_worker=debug,kino_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = BotConfig::from_env().expect("Invalid bot configuration");
    let poll_timeout_secs: u64 = std::env::var("POLL_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_POLL_TIMEOUT_SECS);

    let services = kino_bot::startup::start(&config)
        .await
        .expect("Failed to start bot services");

    // Updates are not delivered to getUpdates while a webhook is set.
    services
        .telegram
        .delete_webhook()
        .await
        .expect("Failed to remove webhook");
    tracing::info!("Webhook removed, polling for updates");

    let poller = Poller::new(services.telegram, services.dispatcher, poll_timeout_secs);
    poller.run(shutdown_token()).await;

    services.pool.close().await;
    tracing::info!("Graceful shutdown complete");
}
