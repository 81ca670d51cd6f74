//! Chat transport for the bot.
//!
//! - [`ChatTransport`] is the outbound seam the bot depends on.
//! - [`TelegramApi`] implements it over the Telegram Bot API and also
//!   offers the long-polling and webhook management calls.
//! - [`mapping`] turns Telegram updates into transport-neutral
//!   [`kino_core::inbound::Inbound`] events.

pub mod client;
pub mod mapping;
pub mod transport;
pub mod types;

pub use client::TelegramApi;
pub use transport::{ChatError, ChatTransport};
