//! Repository for the `search_requests` table.

use chrono::Utc;
use kino_core::types::{DbId, UserId};
use sqlx::SqlitePool;

use crate::models::search_request::{CreateSearchRequest, SearchRequest};

/// Column list for `search_requests` queries.
const COLUMNS: &str = "\
    id, user_id, command, title, movie_type, genre, \
    year_min, year_max, rating_min, rating_max, amount, created_at";

/// Provides append and lookup operations for logged searches.
pub struct SearchRequestRepo;

impl SearchRequestRepo {
    /// Log a search, returning the full row.
    pub async fn create(
        pool: &SqlitePool,
        user_id: UserId,
        input: &CreateSearchRequest,
    ) -> Result<SearchRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO search_requests \
                (user_id, command, title, movie_type, genre, \
                 year_min, year_max, rating_min, rating_max, amount, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SearchRequest>(&query)
            .bind(user_id)
            .bind(input.command.as_str())
            .bind(&input.title)
            .bind(&input.movie_type)
            .bind(&input.genre)
            .bind(input.year_min)
            .bind(input.year_max)
            .bind(input.rating_min)
            .bind(input.rating_max)
            .bind(input.amount)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Find a logged search by ID.
    pub async fn find_by_id(
        pool: &SqlitePool,
        id: DbId,
    ) -> Result<Option<SearchRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM search_requests WHERE id = ?1");
        sqlx::query_as::<_, SearchRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The user's most recent searches, newest first.
    pub async fn list_recent_by_user(
        pool: &SqlitePool,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<SearchRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM search_requests \
             WHERE user_id = ?1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT ?2"
        );
        sqlx::query_as::<_, SearchRequest>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
