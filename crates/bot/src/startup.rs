//! Wiring shared by the webhook server and the polling worker.

use std::sync::Arc;

use kino_catalog::{CatalogError, KinopoiskClient};
use kino_chat::{ChatError, TelegramApi};
use kino_db::DbPool;

use crate::config::BotConfig;
use crate::dispatcher::Dispatcher;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Failed to connect to database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to run database migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Failed to build catalog client: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Failed to build chat client: {0}")]
    Chat(#[from] ChatError),
}

/// Everything a front end needs to run the bot.
pub struct Services {
    pub pool: DbPool,
    pub telegram: TelegramApi,
    pub dispatcher: Arc<Dispatcher>,
}

/// Connect the database, build the API clients and the dispatcher, and
/// publish the command list.
pub async fn start(config: &BotConfig) -> Result<Services, StartupError> {
    let pool = kino_db::create_pool(&config.database_url, config.database_max_connections).await?;
    tracing::info!("Database connection pool created");

    kino_db::health_check(&pool).await?;
    tracing::info!("Database health check passed");

    kino_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    let catalog = KinopoiskClient::new(
        config.catalog_api_key.clone(),
        &config.catalog_host,
        config.catalog_timeout(),
    )?;
    let telegram = TelegramApi::new(&config.bot_token, config.chat_timeout())?;

    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(catalog),
        Arc::new(telegram.clone()),
        pool.clone(),
        config.presentation_delay(),
    ));

    // A bot without its command menu still works.
    match dispatcher.register_commands().await {
        Ok(()) => tracing::info!("Bot commands registered"),
        Err(e) => tracing::warn!(error = %e, "Failed to register bot commands"),
    }

    Ok(Services {
        pool,
        telegram,
        dispatcher,
    })
}
