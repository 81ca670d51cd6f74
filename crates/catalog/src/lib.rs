//! Client library for the movie catalog HTTP API.
//!
//! [`CatalogApi`] is the seam the bot depends on; [`KinopoiskClient`] is the
//! reqwest-backed implementation. The catalog answers in two document
//! shapes (see [`dto`]) that are both normalized into
//! [`kino_core::movie::MovieRecord`].

pub mod api;
pub mod client;
pub mod dto;

pub use api::{CatalogApi, CatalogError};
pub use client::KinopoiskClient;
