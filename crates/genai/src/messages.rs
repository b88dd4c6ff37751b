//! Wire types exchanged with the generation backend.
//!
//! All payloads are camelCase JSON. Every field except `success` is
//! optional on the wire and modelled as `Option`.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Response of `GET /api/images/{id}` and `POST /api/images/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAsset {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response of `GET /api/stories/{id}` and `POST /api/stories/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryAsset {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Response of `POST /api/anime-sketch/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeSketch {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Request body of `POST /api/anime-sketch/generate`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnimeSketchRequest<'a> {
    pub character_name: &'a str,
}

/// Error body the backend sends with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Asset kinds
// ---------------------------------------------------------------------------

/// Common view over generated assets.
pub trait GeneratedAsset: DeserializeOwned + Clone + std::fmt::Debug + Send + Sync + 'static {
    /// The generated payload: an image URL or story text.
    fn payload(&self) -> Option<&str>;

    /// Whether the backend served this from its own cache.
    fn cached(&self) -> Option<bool>;

    fn set_cached(&mut self, cached: bool);
}

impl GeneratedAsset for ImageAsset {
    fn payload(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    fn cached(&self) -> Option<bool> {
        self.cached
    }

    fn set_cached(&mut self, cached: bool) {
        self.cached = Some(cached);
    }
}

impl GeneratedAsset for StoryAsset {
    fn payload(&self) -> Option<&str> {
        self.story.as_deref()
    }

    fn cached(&self) -> Option<bool> {
        self.cached
    }

    fn set_cached(&mut self, cached: bool) {
        self.cached = Some(cached);
    }
}

/// A kind of per-character generated content with its own cache-read and
/// generate endpoints under `/api/{SEGMENT}`.
pub trait AssetKind: Send + Sync + 'static {
    type Asset: GeneratedAsset;

    /// Path segment, e.g. `images`.
    const SEGMENT: &'static str;

    /// Singular noun used in messages, e.g. `image`.
    const NOUN: &'static str;
}

/// Character illustrations.
#[derive(Debug, Clone, Copy)]
pub struct Image;

/// Short character stories.
#[derive(Debug, Clone, Copy)]
pub struct Story;

impl AssetKind for Image {
    type Asset = ImageAsset;
    const SEGMENT: &'static str = "images";
    const NOUN: &'static str = "image";
}

impl AssetKind for Story {
    type Asset = StoryAsset;
    const SEGMENT: &'static str = "stories";
    const NOUN: &'static str = "story";
}
