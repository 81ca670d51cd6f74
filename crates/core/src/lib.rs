//! Domain core of the movie search bot.
//!
//! Pure types and logic with no I/O: movie and criteria types, answer
//! validation, the per-user session store, the wizard state machine and
//! the rendering of movies, history entries and menus.

pub mod choice;
pub mod error;
pub mod history;
pub mod inbound;
pub mod menu;
pub mod movie;
pub mod outgoing;
pub mod render;
pub mod session;
pub mod texts;
pub mod types;
pub mod validation;
pub mod wizard;

pub use error::CoreError;
