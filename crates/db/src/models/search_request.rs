//! Search request entity model and DTOs.

use kino_core::movie::{CommandKind, SearchQuery};
use kino_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `search_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SearchRequest {
    pub id: DbId,
    pub user_id: UserId,
    pub command: String,
    pub title: Option<String>,
    pub movie_type: Option<String>,
    pub genre: Option<String>,
    pub year_min: Option<i64>,
    pub year_max: Option<i64>,
    pub rating_min: Option<i64>,
    pub rating_max: Option<i64>,
    pub amount: i64,
    pub created_at: Timestamp,
}

/// DTO for logging a new search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSearchRequest {
    pub command: CommandKind,
    pub title: Option<String>,
    /// Label the user picked, not the catalog value.
    pub movie_type: Option<String>,
    /// Label the user picked, not the catalog value.
    pub genre: Option<String>,
    pub year_min: Option<i64>,
    pub year_max: Option<i64>,
    pub rating_min: Option<i64>,
    pub rating_max: Option<i64>,
    pub amount: i64,
}

impl CreateSearchRequest {
    /// A random pick always shows exactly one movie.
    pub fn random() -> Self {
        Self {
            command: CommandKind::Random,
            title: None,
            movie_type: None,
            genre: None,
            year_min: None,
            year_max: None,
            rating_min: None,
            rating_max: None,
            amount: 1,
        }
    }

    pub fn from_query(query: &SearchQuery) -> Self {
        match query {
            SearchQuery::ByName(q) => Self {
                command: CommandKind::ByName,
                title: Some(q.query.clone()),
                amount: i64::from(q.page_size),
                ..Self::random()
            },
            SearchQuery::ByFilters(c) => Self {
                command: CommandKind::ByFilters,
                title: None,
                movie_type: Some(c.movie_type.display.clone()),
                genre: Some(c.genre.display.clone()),
                year_min: Some(i64::from(c.years.min())),
                year_max: Some(i64::from(c.years.max())),
                rating_min: Some(i64::from(c.rating.min())),
                rating_max: Some(i64::from(c.rating.max())),
                amount: i64::from(c.page_size),
            },
        }
    }
}
