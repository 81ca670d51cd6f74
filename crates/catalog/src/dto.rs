//! Raw catalog documents and their normalization.
//!
//! The by-id, random and filter endpoints return [`MovieDoc`] with nested
//! rating, genre and poster objects. The title search endpoint returns the
//! flatter [`SearchDoc`], which carries a single rating and no IMDB score.

use kino_core::movie::{MovieRecord, ResultPage};
use serde::Deserialize;

/// Paginated envelope shared by the list endpoints.
#[derive(Debug, Deserialize)]
pub struct PageDoc<T> {
    #[serde(default = "Vec::new")]
    pub docs: Vec<T>,
    #[serde(default)]
    pub total: u64,
    /// Required: a page without its position cannot drive pagination.
    pub page: u32,
    pub pages: u32,
}

impl<T> PageDoc<T> {
    /// Normalize every document with `map`.
    pub fn into_page(self, map: impl Fn(T) -> MovieRecord) -> ResultPage {
        ResultPage {
            current_page: self.page,
            total_pages: self.pages,
            total_count: self.total,
            movies: self.docs.into_iter().map(map).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NamedDoc {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RatingDoc {
    pub kp: Option<f64>,
    pub imdb: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosterDoc {
    pub preview_url: Option<String>,
    pub url: Option<String>,
}

/// Full movie document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDoc {
    pub id: i64,
    pub name: Option<String>,
    pub alternative_name: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<RatingDoc>,
    pub genres: Option<Vec<NamedDoc>>,
    pub description: Option<String>,
    pub poster: Option<PosterDoc>,
}

/// Title search result document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDoc {
    pub id: i64,
    pub name: Option<String>,
    pub alternative_name: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub genres: Option<Vec<String>>,
    pub description: Option<String>,
    pub poster: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Original title, falling back to the alternative one when the catalog
/// has no original.
fn titles(name: Option<String>, alternative: Option<String>) -> (String, Option<String>) {
    match (non_empty(name), non_empty(alternative)) {
        (Some(name), alternative) => (name, alternative),
        (None, Some(alternative)) => (alternative, None),
        (None, None) => (String::new(), None),
    }
}

impl From<MovieDoc> for MovieRecord {
    fn from(doc: MovieDoc) -> Self {
        let (original_title, alternative_title) = titles(doc.name, doc.alternative_name);
        let rating = doc.rating.unwrap_or_default();
        Self {
            id: doc.id,
            original_title,
            alternative_title,
            year: doc.year.unwrap_or_default(),
            rating_kp: rating.kp.unwrap_or_default(),
            rating_imdb: rating.imdb.unwrap_or_default(),
            genres: doc
                .genres
                .unwrap_or_default()
                .into_iter()
                .map(|g| g.name)
                .collect(),
            description: non_empty(doc.description),
            poster_url: doc
                .poster
                .and_then(|p| non_empty(p.preview_url).or_else(|| non_empty(p.url))),
        }
    }
}

impl From<SearchDoc> for MovieRecord {
    fn from(doc: SearchDoc) -> Self {
        let (original_title, alternative_title) = titles(doc.name, doc.alternative_name);
        Self {
            id: doc.id,
            original_title,
            alternative_title,
            year: doc.year.unwrap_or_default(),
            rating_kp: doc.rating.unwrap_or_default(),
            // The title search does not report IMDB scores.
            rating_imdb: 0.0,
            genres: doc.genres.unwrap_or_default(),
            description: non_empty(doc.description),
            poster_url: non_empty(doc.poster),
        }
    }
}
