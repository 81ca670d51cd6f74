use kino_bot::ConfigError;

/// Webhook server configuration loaded from environment variables.
///
/// Bot settings (tokens, catalog, database) live in
/// [`kino_bot::BotConfig`]; this only covers the HTTP side.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Expected `X-Telegram-Bot-Api-Secret-Token` value. Deliveries are not
    /// checked when unset.
    pub webhook_secret: Option<String>,
    /// Public URL of `/telegram/webhook`. When set, the webhook is
    /// registered with the platform at startup.
    pub webhook_url: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default   |
    /// |------------------------|-----------|
    /// | `HOST`                 | `0.0.0.0` |
    /// | `PORT`                 | `3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`      |
    /// | `WEBHOOK_SECRET`       | unset     |
    /// | `WEBHOOK_URL`          | unset     |
    pub fn from_env() -> Result<Self, ConfigError> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            None => 3000,
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { var: "PORT", value })?,
        };

        let request_timeout_secs = match var("REQUEST_TIMEOUT_SECS") {
            None => 30,
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                var: "REQUEST_TIMEOUT_SECS",
                value,
            })?,
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            request_timeout_secs,
            webhook_secret: var("WEBHOOK_SECRET"),
            webhook_url: var("WEBHOOK_URL"),
        })
    }
}
