//! Result movie entity model.

use kino_core::history::MovieRef;
use kino_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `result_movies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ResultMovie {
    pub id: DbId,
    pub request_id: DbId,
    pub catalog_id: i64,
    pub title: String,
}

impl From<ResultMovie> for MovieRef {
    fn from(row: ResultMovie) -> Self {
        Self {
            catalog_id: row.catalog_id,
            title: row.title,
        }
    }
}
