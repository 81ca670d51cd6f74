//! The catalog seam.

use async_trait::async_trait;
use kino_core::movie::{FilterCriteria, MovieRecord, ResultPage, SearchQuery};

/// Errors from the catalog API layer. Callers treat every variant the same
/// way: the catalog is unavailable for this request.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The catalog returned a non-2xx status code.
    #[error("Catalog API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The body was not the document the endpoint promises.
    #[error("Malformed catalog response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Operations the bot needs from the movie catalog.
///
/// Every call issues exactly one outbound request. A page with no movies is
/// a successful result, not an error.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn get_by_id(&self, id: i64) -> Result<MovieRecord, CatalogError>;

    async fn get_random(&self) -> Result<MovieRecord, CatalogError>;

    async fn search_by_name(
        &self,
        page: u32,
        page_size: u8,
        query: &str,
    ) -> Result<ResultPage, CatalogError>;

    async fn search_by_filters(
        &self,
        criteria: &FilterCriteria,
        page: u32,
        page_size: u8,
    ) -> Result<ResultPage, CatalogError>;

    /// Movie type values the catalog knows, e.g. `movie`, `tv-series`.
    async fn list_types(&self) -> Result<Vec<String>, CatalogError>;

    /// Genre names the catalog knows.
    async fn list_genres(&self) -> Result<Vec<String>, CatalogError>;

    /// Fetch one page of a finished wizard's query.
    async fn fetch_page(&self, query: &SearchQuery, page: u32) -> Result<ResultPage, CatalogError> {
        match query {
            SearchQuery::ByName(q) => self.search_by_name(page, q.page_size, &q.query).await,
            SearchQuery::ByFilters(c) => self.search_by_filters(c, page, c.page_size).await,
        }
    }
}
