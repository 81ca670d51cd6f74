//! REST client for the Kinopoisk catalog API.

use std::time::Duration;

use async_trait::async_trait;
use kino_core::movie::{FilterCriteria, MovieRecord, ResultPage};
use serde::de::DeserializeOwned;

use crate::api::{CatalogApi, CatalogError};
use crate::dto::{MovieDoc, NamedDoc, PageDoc, SearchDoc};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "X-API-KEY";

/// Field names accepted by the possible-values endpoint.
const TYPE_FIELD: &str = "type";
const GENRE_FIELD: &str = "genres.name";

/// HTTP client for the catalog.
#[derive(Clone)]
pub struct KinopoiskClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl KinopoiskClient {
    /// Create a client with its own connection pool.
    ///
    /// * `host` - Catalog host, e.g. `api.kinopoisk.dev`. A value with an
    ///   explicit scheme is used as the base URL unchanged.
    /// * `timeout` - Applied to every request.
    pub fn new(api_key: String, host: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, api_key, host))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_key: String, host: &str) -> Self {
        Self {
            client,
            base_url: base_url(host),
            api_key,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        tracing::debug!(path, "Catalog request");
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .header(API_KEY_HEADER, &self.api_key)
            .query(params)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn possible_values(&self, field: &str) -> Result<Vec<String>, CatalogError> {
        let values: Vec<NamedDoc> = self
            .get(
                "/v1/movie/possible-values-by-field",
                &[("field", field.to_string())],
            )
            .await?;
        Ok(values.into_iter().map(|v| v.name).collect())
    }

    // ---- private helpers ----

    /// Return the response unchanged on a success status, or an
    /// [`CatalogError::ApiError`] carrying the status and body.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, CatalogError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CatalogError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl CatalogApi for KinopoiskClient {
    async fn get_by_id(&self, id: i64) -> Result<MovieRecord, CatalogError> {
        let doc: MovieDoc = self.get(&format!("/v1.3/movie/{id}"), &[]).await?;
        Ok(doc.into())
    }

    async fn get_random(&self) -> Result<MovieRecord, CatalogError> {
        let doc: MovieDoc = self.get("/v1.3/movie/random", &[]).await?;
        Ok(doc.into())
    }

    async fn search_by_name(
        &self,
        page: u32,
        page_size: u8,
        query: &str,
    ) -> Result<ResultPage, CatalogError> {
        let params = [
            ("page", page.to_string()),
            ("limit", page_size.to_string()),
            ("query", query.to_string()),
        ];
        let doc: PageDoc<SearchDoc> = self.get("/v1.2/movie/search", &params).await?;
        Ok(doc.into_page(MovieRecord::from))
    }

    async fn search_by_filters(
        &self,
        criteria: &FilterCriteria,
        page: u32,
        page_size: u8,
    ) -> Result<ResultPage, CatalogError> {
        let params = filter_params(criteria, page, page_size);
        let doc: PageDoc<MovieDoc> = self.get("/v1.3/movie", &params).await?;
        Ok(doc.into_page(MovieRecord::from))
    }

    async fn list_types(&self) -> Result<Vec<String>, CatalogError> {
        self.possible_values(TYPE_FIELD).await
    }

    async fn list_genres(&self) -> Result<Vec<String>, CatalogError> {
        self.possible_values(GENRE_FIELD).await
    }
}

fn base_url(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

/// Query parameters of a filter search. Criteria picked as "any" are left
/// out so the catalog does not filter on them.
pub fn filter_params(criteria: &FilterCriteria, page: u32, page_size: u8) -> Vec<(&'static str, String)> {
    let mut params = vec![("page", page.to_string()), ("limit", page_size.to_string())];
    if let Some(movie_type) = &criteria.movie_type.value {
        params.push(("type", movie_type.clone()));
    }
    if let Some(genre) = &criteria.genre.value {
        params.push(("genres.name", genre.clone()));
    }
    params.push(("rating.kp", criteria.rating.as_param()));
    params.push(("year", criteria.years.as_param()));
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use kino_core::movie::{RatingRange, Selection, YearRange};

    fn criteria(movie_type: Option<&str>, genre: Option<&str>) -> FilterCriteria {
        FilterCriteria {
            movie_type: Selection::new("label", movie_type.map(str::to_string)),
            genre: Selection::new("label", genre.map(str::to_string)),
            rating: RatingRange::new(5, 8).unwrap(),
            years: YearRange::new(1990, 2000).unwrap(),
            page_size: 3,
        }
    }

    #[test]
    fn filter_params_include_chosen_criteria() {
        let params = filter_params(&criteria(Some("movie"), Some("драма")), 2, 3);
        assert_eq!(
            params,
            vec![
                ("page", "2".to_string()),
                ("limit", "3".to_string()),
                ("type", "movie".to_string()),
                ("genres.name", "драма".to_string()),
                ("rating.kp", "5-8".to_string()),
                ("year", "1990-2000".to_string()),
            ]
        );
    }

    #[test]
    fn filter_params_omit_any_choices() {
        let params = filter_params(&criteria(None, None), 1, 5);
        let keys: Vec<&str> = params.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["page", "limit", "rating.kp", "year"]);
    }

    #[test]
    fn base_url_defaults_to_https() {
        assert_eq!(base_url("api.kinopoisk.dev"), "https://api.kinopoisk.dev");
        assert_eq!(base_url("http://127.0.0.1:9000/"), "http://127.0.0.1:9000");
    }

    #[test]
    fn client_builds_with_timeout() {
        let client =
            KinopoiskClient::new("key".to_string(), "api.kinopoisk.dev", Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.base_url(), "https://api.kinopoisk.dev");
    }
}
