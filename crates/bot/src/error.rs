use kino_catalog::CatalogError;
use kino_chat::ChatError;

/// Failures surfacing at the dispatcher boundary.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("Catalog unavailable: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Chat transport failed: {0}")]
    Chat(#[from] ChatError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
