//! Client for the companion generation backend.
//!
//! Provides typed wire messages for generated character images, stories,
//! and anime sketches, plus the REST wrapper that reads cached results and
//! requests new generations.

pub mod api;
pub mod messages;

pub use api::{AssetEndpoint, CacheLookup, GenAiApi, GenAiError, DEFAULT_BACKEND_URL};
pub use messages::{AnimeSketch, AssetKind, GeneratedAsset, Image, ImageAsset, Story, StoryAsset};
