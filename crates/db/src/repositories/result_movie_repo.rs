//! Repository for the `result_movies` table.

use kino_core::history::MovieRef;
use kino_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::result_movie::ResultMovie;

/// Column list for `result_movies` queries.
const COLUMNS: &str = "id, request_id, catalog_id, title";

/// Provides append and lookup operations for movies shown per search.
pub struct ResultMovieRepo;

impl ResultMovieRepo {
    /// Append the movies of one page in a single transaction. Returns the
    /// number of rows written.
    pub async fn create_many(
        pool: &SqlitePool,
        request_id: DbId,
        movies: &[MovieRef],
    ) -> Result<u64, sqlx::Error> {
        if movies.is_empty() {
            return Ok(0);
        }

        let mut tx = pool.begin().await?;
        let mut written = 0;
        for movie in movies {
            written += sqlx::query(
                "INSERT INTO result_movies (request_id, catalog_id, title) VALUES (?1, ?2, ?3)",
            )
            .bind(request_id)
            .bind(movie.catalog_id)
            .bind(&movie.title)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }
        tx.commit().await?;
        Ok(written)
    }

    /// The `limit` most recently appended movies of a search, newest first.
    pub async fn latest_for_request(
        pool: &SqlitePool,
        request_id: DbId,
        limit: i64,
    ) -> Result<Vec<ResultMovie>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM result_movies \
             WHERE request_id = ?1 \
             ORDER BY id DESC \
             LIMIT ?2"
        );
        sqlx::query_as::<_, ResultMovie>(&query)
            .bind(request_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
