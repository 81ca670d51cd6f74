//! Conversation engine of the movie search bot.
//!
//! Transport-agnostic: the webhook server and the polling worker both map
//! platform updates to [`kino_core::inbound::Inbound`] events and hand them
//! to a shared [`Dispatcher`].

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod gate;
pub mod lanes;
pub mod shutdown;
pub mod startup;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{BotConfig, ConfigError};
pub use dispatcher::Dispatcher;
pub use error::BotError;
pub use lanes::UserLanes;
