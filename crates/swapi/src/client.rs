//! HTTP client for the read-only catalog API.
//!
//! Wraps the catalog endpoints (`/people`, `/starships`, `/films`,
//! `/planets`) using [`reqwest`]. Every response passes through
//! [`crate::schema`] before a typed value is returned.

use std::time::Duration;

use holonet_core::ids::is_absolute_url;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::CatalogError;
use crate::models::{CatalogEntity, Character, Film, Planet, Starship};
use crate::schema::{parse_collection, parse_entity};

/// Default catalog base URL.
pub const DEFAULT_BASE_URL: &str = "https://swapi.info/api";

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the catalog.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct SwapiClient {
    client: reqwest::Client,
    base_url: String,
}

impl SwapiClient {
    /// Create a client for `base_url` with the default 10-second timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    /// Create a client with an explicit per-request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| CatalogError::MalformedRequest {
                message: format!("Request error: {e}"),
            })?;

        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ---- characters ----

    pub async fn get_characters(&self) -> Result<Vec<Character>, CatalogError> {
        self.fetch_collection("/people", &[]).await
    }

    pub async fn get_character(&self, id: &str) -> Result<Character, CatalogError> {
        self.fetch_entity(&format!("/people/{id}")).await
    }

    /// Fetch a character by its resource URL (used verbatim if absolute).
    pub async fn get_character_by_url(&self, url: &str) -> Result<Character, CatalogError> {
        self.fetch_entity(url).await
    }

    // ---- starships ----

    pub async fn get_starships(&self) -> Result<Vec<Starship>, CatalogError> {
        self.fetch_collection("/starships", &[]).await
    }

    pub async fn get_starship(&self, id: &str) -> Result<Starship, CatalogError> {
        self.fetch_entity(&format!("/starships/{id}")).await
    }

    /// Fetch a starship by its resource URL (used verbatim if absolute).
    pub async fn get_starship_by_url(&self, url: &str) -> Result<Starship, CatalogError> {
        self.fetch_entity(url).await
    }

    // ---- films ----

    pub async fn get_films(&self) -> Result<Vec<Film>, CatalogError> {
        self.fetch_collection("/films", &[]).await
    }

    pub async fn get_film(&self, id: &str) -> Result<Film, CatalogError> {
        self.fetch_entity(&format!("/films/{id}")).await
    }

    // ---- planets ----

    /// Fetch planets with `page` and an optional `search` term appended as
    /// query parameters. An empty search term is omitted.
    pub async fn get_planets(&self, page: u32, search: Option<&str>) -> Result<Vec<Planet>, CatalogError> {
        let mut params = vec![("page", page.to_string())];
        if let Some(term) = search.filter(|s| !s.is_empty()) {
            params.push(("search", term.to_string()));
        }
        self.fetch_collection("/planets", &params).await
    }

    pub async fn get_planet(&self, id: &str) -> Result<Planet, CatalogError> {
        self.fetch_entity(&format!("/planets/{id}")).await
    }

    // ---- private helpers ----

    /// Absolute inputs are used verbatim; anything else is appended to the
    /// base URL.
    fn resolve(&self, path_or_url: &str) -> String {
        if is_absolute_url(path_or_url) {
            path_or_url.to_string()
        } else if path_or_url.starts_with('/') {
            format!("{}{}", self.base_url, path_or_url)
        } else {
            format!("{}/{}", self.base_url, path_or_url)
        }
    }

    async fn fetch_entity<T>(&self, path_or_url: &str) -> Result<T, CatalogError>
    where
        T: DeserializeOwned + Validate + CatalogEntity,
    {
        let payload = self.get_json(path_or_url, &[], T::KIND).await?;
        parse_entity(payload)
    }

    async fn fetch_collection<T>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, CatalogError>
    where
        T: DeserializeOwned + Validate + CatalogEntity,
    {
        let payload = self.get_json(path, params, T::KIND).await?;
        parse_collection(payload)
    }

    /// Perform the GET, map failures to the taxonomy, and decode the body
    /// as untyped JSON. Only a parse failure is a validation error; a body
    /// that stalls or breaks off is a network error.
    async fn get_json(
        &self,
        path_or_url: &str,
        params: &[(&str, String)],
        entity: &'static str,
    ) -> Result<serde_json::Value, CatalogError> {
        let url = self.resolve(path_or_url);
        tracing::debug!(method = "GET", url = %url, "Catalog request");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                let err = CatalogError::from_transport(&e, &url);
                tracing::error!(url = %url, error = %e, "No response from catalog");
                err
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Catalog returned error status");
            return Err(CatalogError::from_status(status.as_u16(), &url));
        }

        let body = response.bytes().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Catalog response body interrupted");
            CatalogError::from_transport(&e, &url)
        })?;

        serde_json::from_slice(&body).map_err(|e| CatalogError::Validation {
            entity,
            detail: format!("response body is not valid JSON: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_does_not_panic() {
        let client = SwapiClient::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(client.base_url(), "https://swapi.info/api");
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base() {
        let client = SwapiClient::new("https://swapi.info/api/").unwrap();
        assert_eq!(client.resolve("/people"), "https://swapi.info/api/people");
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        let client = SwapiClient::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(client.resolve("/films/1"), "https://swapi.info/api/films/1");
        assert_eq!(client.resolve("films/1"), "https://swapi.info/api/films/1");
    }

    #[test]
    fn absolute_urls_are_used_verbatim() {
        let client = SwapiClient::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(
            client.resolve("http://mirror.local/api/people/1"),
            "http://mirror.local/api/people/1"
        );
    }
}
