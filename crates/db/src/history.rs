//! Reconstruction of a user's search history from the log.

use kino_core::history::{HistoryEntry, HistoryKind, MovieRef};
use kino_core::movie::CommandKind;
use kino_core::types::UserId;
use sqlx::SqlitePool;

use crate::models::search_request::SearchRequest;
use crate::repositories::{ResultMovieRepo, SearchRequestRepo};

fn decode_error(err: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}

fn kind(request: &SearchRequest) -> Result<HistoryKind, sqlx::Error> {
    let command = CommandKind::from_str_db(&request.command).map_err(decode_error)?;
    Ok(match command {
        CommandKind::Random => HistoryKind::Random,
        CommandKind::ByName => HistoryKind::ByName {
            title: request.title.clone().unwrap_or_default(),
        },
        CommandKind::ByFilters => HistoryKind::ByFilters {
            movie_type: request.movie_type.clone().unwrap_or_default(),
            genre: request.genre.clone().unwrap_or_default(),
            year_min: i32::try_from(request.year_min.unwrap_or_default()).map_err(decode_error)?,
            year_max: i32::try_from(request.year_max.unwrap_or_default()).map_err(decode_error)?,
            rating_min: u8::try_from(request.rating_min.unwrap_or_default())
                .map_err(decode_error)?,
            rating_max: u8::try_from(request.rating_max.unwrap_or_default())
                .map_err(decode_error)?,
        },
    })
}

/// The user's `limit` most recent searches, newest first, each with the
/// last page's worth (`amount` rows) of movies logged for it, newest first.
pub async fn load_history(
    pool: &SqlitePool,
    user_id: UserId,
    limit: u8,
) -> Result<Vec<HistoryEntry>, sqlx::Error> {
    let requests = SearchRequestRepo::list_recent_by_user(pool, user_id, i64::from(limit)).await?;

    let mut entries = Vec::with_capacity(requests.len());
    for request in requests {
        let movies = ResultMovieRepo::latest_for_request(pool, request.id, request.amount).await?;
        entries.push(HistoryEntry {
            created_at: request.created_at,
            kind: kind(&request)?,
            movies: movies.into_iter().map(MovieRef::from).collect(),
        });
    }
    Ok(entries)
}
