//! Integration tests for the search log repositories and history loading.

use assert_matches::assert_matches;
use kino_core::history::{HistoryKind, MovieRef};
use kino_core::movie::{
    CommandKind, FilterCriteria, NameQuery, RatingRange, SearchQuery, Selection, YearRange,
};
use kino_db::history::load_history;
use kino_db::models::search_request::CreateSearchRequest;
use kino_db::repositories::{ResultMovieRepo, SearchRequestRepo};
use sqlx::SqlitePool;

fn by_name(query: &str, page_size: u8) -> CreateSearchRequest {
    CreateSearchRequest::from_query(&SearchQuery::ByName(NameQuery {
        query: query.to_string(),
        page_size,
    }))
}

fn movies(ids: std::ops::RangeInclusive<i64>) -> Vec<MovieRef> {
    ids.map(|id| MovieRef {
        catalog_id: id,
        title: format!("Movie {id}"),
    })
    .collect()
}

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_and_find_request(pool: SqlitePool) {
    kino_db::health_check(&pool).await.unwrap();

    let created = SearchRequestRepo::create(&pool, 42, &by_name("Matrix", 3))
        .await
        .unwrap();
    assert_eq!(created.user_id, 42);
    assert_eq!(created.command, "byname");
    assert_eq!(created.title.as_deref(), Some("Matrix"));
    assert_eq!(created.amount, 3);

    let found = SearchRequestRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .expect("request exists");
    assert_eq!(found.id, created.id);
    assert!(SearchRequestRepo::find_by_id(&pool, created.id + 100)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn filter_request_stores_labels(pool: SqlitePool) {
    let input = CreateSearchRequest::from_query(&SearchQuery::ByFilters(FilterCriteria {
        movie_type: Selection::new("Сериал", Some("tv-series".to_string())),
        genre: Selection::new("Драма", Some("драма".to_string())),
        rating: RatingRange::new(6, 9).unwrap(),
        years: YearRange::new(2000, 2010).unwrap(),
        page_size: 2,
    }));
    let created = SearchRequestRepo::create(&pool, 1, &input).await.unwrap();
    assert_eq!(created.command, CommandKind::ByFilters.as_str());
    assert_eq!(created.movie_type.as_deref(), Some("Сериал"));
    assert_eq!(created.genre.as_deref(), Some("Драма"));
    assert_eq!((created.year_min, created.year_max), (Some(2000), Some(2010)));
    assert_eq!((created.rating_min, created.rating_max), (Some(6), Some(9)));
}

#[sqlx::test(migrations = "./migrations")]
async fn latest_movies_are_newest_first(pool: SqlitePool) {
    let request = SearchRequestRepo::create(&pool, 1, &by_name("Alien", 2))
        .await
        .unwrap();

    assert_eq!(
        ResultMovieRepo::create_many(&pool, request.id, &movies(1..=2)).await.unwrap(),
        2
    );
    ResultMovieRepo::create_many(&pool, request.id, &movies(3..=4))
        .await
        .unwrap();
    assert_eq!(
        ResultMovieRepo::create_many(&pool, request.id, &[]).await.unwrap(),
        0
    );

    let latest = ResultMovieRepo::latest_for_request(&pool, request.id, 2)
        .await
        .unwrap();
    let ids: Vec<i64> = latest.iter().map(|m| m.catalog_id).collect();
    assert_eq!(ids, [4, 3]);
}

#[sqlx::test(migrations = "./migrations")]
async fn movies_require_an_existing_request(pool: SqlitePool) {
    let result = ResultMovieRepo::create_many(&pool, 999, &movies(1..=1)).await;
    assert_matches!(result, Err(sqlx::Error::Database(_)));
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn history_is_newest_first_and_limited(pool: SqlitePool) {
    let first = SearchRequestRepo::create(&pool, 7, &by_name("first", 1))
        .await
        .unwrap();
    ResultMovieRepo::create_many(&pool, first.id, &movies(1..=1))
        .await
        .unwrap();

    let random = SearchRequestRepo::create(&pool, 7, &CreateSearchRequest::random())
        .await
        .unwrap();
    ResultMovieRepo::create_many(&pool, random.id, &movies(50..=50))
        .await
        .unwrap();

    let last = SearchRequestRepo::create(&pool, 7, &by_name("last", 2))
        .await
        .unwrap();
    ResultMovieRepo::create_many(&pool, last.id, &movies(10..=11))
        .await
        .unwrap();
    ResultMovieRepo::create_many(&pool, last.id, &movies(12..=13))
        .await
        .unwrap();

    // Another user's searches never leak in.
    SearchRequestRepo::create(&pool, 8, &by_name("other", 1))
        .await
        .unwrap();

    let history = load_history(&pool, 7, 2).await.unwrap();
    assert_eq!(history.len(), 2);

    assert_eq!(
        history[0].kind,
        HistoryKind::ByName {
            title: "last".to_string()
        }
    );
    let ids: Vec<i64> = history[0].movies.iter().map(|m| m.catalog_id).collect();
    assert_eq!(ids, [13, 12]);

    assert_eq!(history[1].kind, HistoryKind::Random);
    assert_eq!(history[1].movies.len(), 1);

    let all = load_history(&pool, 7, 10).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn history_of_new_user_is_empty(pool: SqlitePool) {
    assert!(load_history(&pool, 12345, 10).await.unwrap().is_empty());
}
