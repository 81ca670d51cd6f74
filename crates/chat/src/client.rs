//! HTTP client for the Telegram Bot API.
//!
//! Every method is a JSON `POST` to `/bot<token>/<method>` answered with an
//! [`Envelope`]; a failed call still carries a JSON body, so the envelope is
//! decoded whatever the status code.

use std::time::Duration;

use async_trait::async_trait;
use kino_core::inbound::Command;
use kino_core::outgoing::{Menu, Outgoing};
use kino_core::types::{ChatId, MessageId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::transport::{ChatError, ChatTransport};
use crate::types::{BotCommand, Envelope, InlineKeyboardMarkup, Message, Update};

const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// HTML parse mode for formatted texts and captions.
const PARSE_MODE_HTML: &str = "HTML";

/// Extra time granted to a long poll on top of its server-side timeout.
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Telegram Bot API client for one bot token.
#[derive(Clone)]
pub struct TelegramApi {
    client: reqwest::Client,
    api_url: String,
}

impl TelegramApi {
    /// Create a client whose ordinary calls time out after `timeout`.
    pub fn new(token: &str, timeout: Duration) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, DEFAULT_BASE_URL, token))
    }

    /// Create a client reusing an existing [`reqwest::Client`] against a
    /// custom API server.
    pub fn with_client(client: reqwest::Client, base_url: &str, token: &str) -> Self {
        Self {
            client,
            api_url: format!("{}/bot{token}", base_url.trim_end_matches('/')),
        }
    }

    /// Long-poll for updates after `offset`, waiting up to `timeout_secs`.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>, ChatError> {
        let body = json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message", "callback_query"],
        });
        let response = self
            .client
            .post(self.method_url("getUpdates"))
            .timeout(Duration::from_secs(timeout_secs) + POLL_GRACE)
            .json(&body)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Remove any webhook so `getUpdates` can be used.
    pub async fn delete_webhook(&self) -> Result<(), ChatError> {
        self.call::<_, bool>("deleteWebhook", &json!({})).await?;
        Ok(())
    }

    /// Register `url` as the webhook, with an optional secret token echoed
    /// back in every delivery.
    pub async fn set_webhook(&self, url: &str, secret: Option<&str>) -> Result<(), ChatError> {
        let mut body = json!({
            "url": url,
            "allowed_updates": ["message", "callback_query"],
        });
        if let Some(secret) = secret {
            body["secret_token"] = json!(secret);
        }
        self.call::<_, bool>("setWebhook", &body).await?;
        Ok(())
    }

    // ---- private helpers ----

    fn method_url(&self, method: &str) -> String {
        format!("{}/{method}", self.api_url)
    }

    async fn call<P: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        method: &str,
        params: &P,
    ) -> Result<R, ChatError> {
        tracing::debug!(method, "Chat API call");
        let response = self
            .client
            .post(self.method_url(method))
            .json(params)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn parse_response<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, ChatError> {
        let status = response.status();
        let bytes = response.bytes().await?;
        parse_envelope(status.as_u16(), &bytes)
    }
}

/// Unwrap a Bot API envelope.
pub fn parse_envelope<R: DeserializeOwned>(status: u16, body: &[u8]) -> Result<R, ChatError> {
    let envelope: Envelope<R> = serde_json::from_slice(body)?;
    match envelope {
        Envelope {
            ok: true,
            result: Some(result),
            ..
        } => Ok(result),
        Envelope {
            description,
            error_code,
            ..
        } => Err(ChatError::ApiError {
            code: error_code.unwrap_or(i64::from(status)),
            description: description.unwrap_or_else(|| "<no description>".to_string()),
        }),
    }
}

#[async_trait]
impl ChatTransport for TelegramApi {
    async fn send(&self, chat_id: ChatId, message: &Outgoing) -> Result<MessageId, ChatError> {
        let sent: Message = match message {
            Outgoing::Text { text, html, menu } => {
                let mut body = json!({ "chat_id": chat_id, "text": text });
                if *html {
                    body["parse_mode"] = json!(PARSE_MODE_HTML);
                }
                if let Some(menu) = menu {
                    body["reply_markup"] = serde_json::to_value(InlineKeyboardMarkup::from(menu))?;
                }
                self.call("sendMessage", &body).await?
            }
            Outgoing::Photo { url, caption } => {
                let body = json!({
                    "chat_id": chat_id,
                    "photo": url,
                    "caption": caption,
                    "parse_mode": PARSE_MODE_HTML,
                });
                self.call("sendPhoto", &body).await?
            }
        };
        Ok(sent.message_id)
    }

    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        menu: Option<&Menu>,
    ) -> Result<(), ChatError> {
        let mut body = json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
        });
        if let Some(menu) = menu {
            body["reply_markup"] = serde_json::to_value(InlineKeyboardMarkup::from(menu))?;
        }
        // Returns the edited message, or `true` for inline messages.
        self.call::<_, serde_json::Value>("editMessageText", &body).await?;
        Ok(())
    }

    async fn delete(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), ChatError> {
        let body = json!({ "chat_id": chat_id, "message_id": message_id });
        self.call::<_, bool>("deleteMessage", &body).await?;
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        notice: Option<&str>,
    ) -> Result<(), ChatError> {
        let mut body = json!({ "callback_query_id": callback_id });
        if let Some(notice) = notice {
            body["text"] = json!(notice);
        }
        self.call::<_, bool>("answerCallbackQuery", &body).await?;
        Ok(())
    }

    async fn set_commands(&self, commands: &[Command]) -> Result<(), ChatError> {
        let commands: Vec<BotCommand> = commands
            .iter()
            .map(|cmd| BotCommand {
                command: cmd.name().to_string(),
                description: cmd.description().to_string(),
            })
            .collect();
        self.call::<_, bool>("setMyCommands", &json!({ "commands": commands }))
            .await?;
        Ok(())
    }
}
