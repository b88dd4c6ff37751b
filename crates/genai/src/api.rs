//! REST client for the generation backend.
//!
//! Two operations per asset kind:
//!
//! - a cache read (`GET /api/{kind}/{id}`) that never generates anything
//!   and treats "nothing generated yet" and "backend offline" alike, and
//! - a generation call (`POST /api/{kind}/generate`) that must only be
//!   issued in response to an explicit user action.

use std::marker::PhantomData;

use holonet_swapi::Character;

use crate::messages::{
    AnimeSketch, AnimeSketchRequest, AssetKind, ErrorBody, Image, ImageAsset, Story, StoryAsset,
};

/// Default backend base URL (local loopback).
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

/// HTTP client for the generation backend.
#[derive(Debug, Clone)]
pub struct GenAiApi {
    client: reqwest::Client,
    api_url: String,
}

/// Errors from the generation backend layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenAiError {
    /// The backend answered with a non-2xx status. `message` is the
    /// server-provided error text, or a generic fallback.
    #[error("{message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        message: String,
    },

    /// No response was received (connection refused, DNS, timeout).
    #[error("Generation backend unreachable: {detail}")]
    Unreachable { detail: String },

    /// A 2xx response whose body did not match the expected shape.
    #[error("Invalid response from generation backend: {detail}")]
    Decode { detail: String },
}

/// Outcome of a cache read, keeping "backend offline" distinguishable from
/// "nothing generated yet" for logging.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<A> {
    Hit(A),
    Miss,
    BackendUnreachable { detail: String },
}

impl<A> CacheLookup<A> {
    /// Collapse to the caller-facing shape: both absence signals are `None`.
    pub fn into_option(self) -> Option<A> {
        match self {
            CacheLookup::Hit(asset) => Some(asset),
            CacheLookup::Miss | CacheLookup::BackendUnreachable { .. } => None,
        }
    }
}

impl GenAiApi {
    /// Create a new API client for a backend.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://localhost:8080`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling with the catalog client).
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Typed handle for one asset kind.
    pub fn assets<K: AssetKind>(&self) -> AssetEndpoint<'_, K> {
        AssetEndpoint {
            api: self,
            _kind: PhantomData,
        }
    }

    // ---- convenience wrappers ----

    pub async fn get_character_image(&self, character_id: &str) -> Result<Option<ImageAsset>, GenAiError> {
        self.assets::<Image>().get_cached(character_id).await
    }

    pub async fn generate_character_image(&self, character: &Character) -> Result<ImageAsset, GenAiError> {
        self.assets::<Image>().generate(character).await
    }

    pub async fn get_character_story(&self, character_id: &str) -> Result<Option<StoryAsset>, GenAiError> {
        self.assets::<Story>().get_cached(character_id).await
    }

    pub async fn generate_character_story(&self, character: &Character) -> Result<StoryAsset, GenAiError> {
        self.assets::<Story>().generate(character).await
    }

    /// Generate an anime-style sketch for a character name.
    ///
    /// Sends `POST /api/anime-sketch/generate` with `{characterName}`.
    pub async fn generate_anime_sketch(&self, character_name: &str) -> Result<AnimeSketch, GenAiError> {
        let url = format!("{}/api/anime-sketch/generate", self.api_url);
        tracing::info!(url = %url, character = character_name, "Requesting anime sketch");

        let response = self
            .client
            .post(&url)
            .json(&AnimeSketchRequest { character_name })
            .send()
            .await
            .map_err(unreachable)?;

        let response = ensure_success(response, "Failed to generate anime sketch").await?;
        let sketch: AnimeSketch = decode(response).await?;
        tracing::info!(has_image = sketch.image_url.is_some(), "Anime sketch generated");
        Ok(sketch)
    }
}

/// Cache-read and generate operations for one [`AssetKind`].
pub struct AssetEndpoint<'a, K: AssetKind> {
    api: &'a GenAiApi,
    _kind: PhantomData<K>,
}

impl<K: AssetKind> AssetEndpoint<'_, K> {
    /// Read a previously generated asset. Never generates.
    ///
    /// A 404 is [`CacheLookup::Miss`]; a transport failure is
    /// [`CacheLookup::BackendUnreachable`]. Any other non-2xx status with a
    /// JSON error body is an error; without one it is logged and treated
    /// as a miss.
    pub async fn lookup(&self, entity_id: &str) -> Result<CacheLookup<K::Asset>, GenAiError> {
        let url = format!("{}/api/{}/{}", self.api.api_url, K::SEGMENT, entity_id);
        tracing::debug!(url = %url, kind = K::NOUN, "Reading cached asset");

        let response = match self.api.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    url = %url,
                    kind = K::NOUN,
                    error = %e,
                    "Generation backend unreachable, treating as no cached asset",
                );
                return Ok(CacheLookup::BackendUnreachable {
                    detail: e.to_string(),
                });
            }
        };

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(kind = K::NOUN, entity_id, "No cached asset");
            return Ok(CacheLookup::Miss);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return match serde_json::from_str::<ErrorBody>(&body) {
                Ok(parsed) => Err(GenAiError::Backend {
                    status: status.as_u16(),
                    message: parsed
                        .error
                        .unwrap_or_else(|| format!("Failed to retrieve {}", K::NOUN)),
                }),
                Err(_) => {
                    tracing::error!(
                        status = status.as_u16(),
                        kind = K::NOUN,
                        "Unreadable error body from cache read, treating as no cached asset",
                    );
                    Ok(CacheLookup::Miss)
                }
            };
        }

        let asset: K::Asset = decode(response).await?;
        tracing::debug!(kind = K::NOUN, entity_id, "Cached asset found");
        Ok(CacheLookup::Hit(asset))
    }

    /// [`lookup`](Self::lookup) collapsed to `Option`.
    pub async fn get_cached(&self, entity_id: &str) -> Result<Option<K::Asset>, GenAiError> {
        self.lookup(entity_id).await.map(CacheLookup::into_option)
    }

    /// Generate a new asset from the full character payload.
    ///
    /// Sends `POST /api/{kind}/generate`. Only call this from an explicit
    /// user action.
    pub async fn generate(&self, character: &Character) -> Result<K::Asset, GenAiError> {
        let url = format!("{}/api/{}/generate", self.api.api_url, K::SEGMENT);
        tracing::info!(url = %url, kind = K::NOUN, character = %character.name, "Requesting generation");

        let response = self
            .api
            .client
            .post(&url)
            .json(character)
            .send()
            .await
            .map_err(unreachable)?;

        let fallback = format!("Failed to generate {}", K::NOUN);
        let response = ensure_success(response, &fallback).await?;
        let asset: K::Asset = decode(response).await?;
        tracing::info!(kind = K::NOUN, character = %character.name, "Generation succeeded");
        Ok(asset)
    }
}

// ---- private helpers ----

fn unreachable(err: reqwest::Error) -> GenAiError {
    tracing::error!(error = %err, "Generation backend request failed");
    GenAiError::Unreachable {
        detail: err.to_string(),
    }
}

/// Return the response unchanged on success, or a [`GenAiError::Backend`]
/// carrying the server's `error` message (or `fallback`).
async fn ensure_success(
    response: reqwest::Response,
    fallback: &str,
) -> Result<reqwest::Response, GenAiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.error)
        .unwrap_or_else(|| fallback.to_string());

    tracing::warn!(status = status.as_u16(), message = %message, "Generation backend error");
    Err(GenAiError::Backend {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, GenAiError> {
    let body = response.text().await.map_err(|e| GenAiError::Decode {
        detail: e.to_string(),
    })?;
    serde_json::from_str(&body).map_err(|e| GenAiError::Decode {
        detail: e.to_string(),
    })
}
