use std::time::Duration;

/// A missing or malformed environment variable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Bot configuration loaded from environment variables.
///
/// Credentials have no defaults; everything else is tuned for local
/// development.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Chat platform bot token.
    pub bot_token: String,
    /// Catalog API key, sent as `X-API-KEY`.
    pub catalog_api_key: String,
    /// Catalog host, with or without a scheme.
    pub catalog_host: String,
    /// Timeout of one catalog request in seconds (default: `10`).
    pub catalog_timeout_secs: u64,
    /// Timeout of one chat API call in seconds (default: `30`).
    pub chat_timeout_secs: u64,
    /// SQLite database URL (default: `sqlite://kino.db`).
    pub database_url: String,
    /// Pool size (default: `5`).
    pub database_max_connections: u32,
    /// Pause between two rendered movies in milliseconds (default: `300`).
    pub presentation_delay_ms: u64,
}

impl BotConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                    | Default                  |
    /// |----------------------------|--------------------------|
    /// | `BOT_TOKEN`                | required                 |
    /// | `CATALOG_API_KEY`          | required                 |
    /// | `CATALOG_HOST`             | `api.kinopoisk.dev`      |
    /// | `CATALOG_TIMEOUT_SECS`     | `10`                     |
    /// | `CHAT_TIMEOUT_SECS`        | `30`                     |
    /// | `DATABASE_URL`             | `sqlite://kino.db`       |
    /// | `DATABASE_MAX_CONNECTIONS` | `5`                      |
    /// | `PRESENTATION_DELAY_MS`    | `300`                    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(var))
        };
        let number = |var: &'static str, default: u64| match lookup(var) {
            None => Ok(default),
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid { var, value }),
        };

        let database_max_connections = number("DATABASE_MAX_CONNECTIONS", 5)?;
        let database_max_connections = u32::try_from(database_max_connections)
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConfigError::Invalid {
                var: "DATABASE_MAX_CONNECTIONS",
                value: database_max_connections.to_string(),
            })?;

        Ok(Self {
            bot_token: required("BOT_TOKEN")?,
            catalog_api_key: required("CATALOG_API_KEY")?,
            catalog_host: lookup("CATALOG_HOST").unwrap_or_else(|| "api.kinopoisk.dev".into()),
            catalog_timeout_secs: number("CATALOG_TIMEOUT_SECS", 10)?,
            chat_timeout_secs: number("CHAT_TIMEOUT_SECS", 30)?,
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://kino.db".into()),
            database_max_connections,
            presentation_delay_ms: number("PRESENTATION_DELAY_MS", 300)?,
        })
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog_timeout_secs)
    }

    pub fn chat_timeout(&self) -> Duration {
        Duration::from_secs(self.chat_timeout_secs)
    }

    pub fn presentation_delay(&self) -> Duration {
        Duration::from_millis(self.presentation_delay_ms)
    }
}
