//! Controllers for generated character content.
//!
//! Loading a controller reads only the backend's cache: it never triggers
//! generation. Generation happens exclusively through
//! [`AssetController::generate`], one request at a time, and its result is
//! written back into the cache-read entry so later loads see it without a
//! network call.

use std::sync::Arc;

use holonet_genai::{AnimeSketch, AssetKind, CacheLookup, GenAiApi, GeneratedAsset, Image, Story};
use holonet_swapi::{CatalogEntity, Character};

use crate::error::{AssetError, QueryError};
use crate::hooks::mutation::{Mutation, MutationState};
use crate::query::{key, QueryClient, QueryKey, QueryPolicy, QueryStatus};

/// An asset kind cached per character under its own query scope.
pub trait CharacterAsset: AssetKind {
    const QUERY_SCOPE: &'static str;
}

impl CharacterAsset for Image {
    const QUERY_SCOPE: &'static str = "characterImage";
}

impl CharacterAsset for Story {
    const QUERY_SCOPE: &'static str = "characterStory";
}

/// What the presentation layer renders for one generated asset.
#[derive(Debug, Clone)]
pub struct AssetSnapshot<A> {
    /// The cached asset, or the latest generated one.
    pub asset: Option<Arc<A>>,
    /// Image URL or story text.
    pub payload: Option<String>,
    pub is_loading: bool,
    pub is_error: bool,
    pub error: Option<String>,
    /// Whether the backend served the asset from its own cache.
    pub is_cached: bool,
    pub is_generating: bool,
}

/// Cache-read plus generate controller for one character's image or story.
pub struct AssetController<K: CharacterAsset> {
    genai: GenAiApi,
    queries: QueryClient,
    character: Option<Character>,
    character_id: Option<String>,
    mutation: Mutation<K::Asset>,
}

/// Cached value of an asset query: `None` when nothing has been generated.
type CachedAsset<A> = Option<Arc<A>>;

impl<K: CharacterAsset> AssetController<K> {
    pub fn new(genai: GenAiApi, queries: QueryClient, character: Option<Character>) -> Self {
        let character_id = character
            .as_ref()
            .map(|c| c.short_id().to_string())
            .filter(|id| !id.is_empty());

        Self {
            genai,
            queries,
            character,
            character_id,
            mutation: Mutation::new(),
        }
    }

    pub fn character(&self) -> Option<&Character> {
        self.character.as_ref()
    }

    /// Short id of the character, if it has one. Without it the cache
    /// read is disabled.
    pub fn character_id(&self) -> Option<&str> {
        self.character_id.as_deref()
    }

    /// Read the backend's cached asset for this character.
    ///
    /// Issues at most one network call per cache lifetime and never calls
    /// the generation endpoint. Backend failures are logged and resolve
    /// to `None`.
    pub async fn load(&self) -> Option<Arc<K::Asset>> {
        let key = self.query_key()?;
        let character_id = self.character_id.clone()?;
        let genai = self.genai.clone();

        let result = self
            .queries
            .fetch_query(key.clone(), QueryPolicy::GENERATED_ASSET, move || {
                let genai = genai.clone();
                let character_id = character_id.clone();
                async move { Ok::<_, QueryError>(read_cached::<K>(&genai, &character_id).await) }
            })
            .await;

        match result {
            Ok(cached) => (*cached).clone(),
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Cached asset query failed");
                None
            }
        }
    }

    /// Drop the cached read and load again.
    pub async fn refetch(&self) -> Option<Arc<K::Asset>> {
        if let Some(key) = self.query_key() {
            self.queries.invalidate(&key);
        }
        self.load().await
    }

    /// Generate a new asset from the full character payload.
    ///
    /// One POST per call. Refused with [`AssetError::GenerationPending`]
    /// while a previous call from this controller is in flight. On success
    /// the cache-read entry is overwritten with the result.
    pub async fn generate(&self) -> Result<Arc<K::Asset>, AssetError> {
        let character = self.character.as_ref().ok_or(AssetError::NoCharacter)?;
        let guard = self.mutation.begin()?;

        match self.genai.assets::<K>().generate(character).await {
            Ok(mut asset) => {
                let cached = asset.cached().unwrap_or(false);
                asset.set_cached(cached);
                let asset = Arc::new(asset);

                if let Some(key) = self.query_key() {
                    self.queries.set_query_data::<CachedAsset<K::Asset>>(
                        key,
                        QueryPolicy::GENERATED_ASSET,
                        Some(Arc::clone(&asset)),
                    );
                }
                guard.succeed(Arc::clone(&asset));
                Ok(asset)
            }
            Err(e) => {
                tracing::error!(kind = K::NOUN, character = %character.name, error = %e, "Generation failed");
                guard.fail(e.clone());
                Err(e.into())
            }
        }
    }

    pub fn is_generating(&self) -> bool {
        self.mutation.state().is_pending()
    }

    /// Clear a settled generation result or error.
    pub fn reset(&self) {
        self.mutation.reset();
    }

    pub fn snapshot(&self) -> AssetSnapshot<K::Asset> {
        let query = self
            .query_key()
            .map(|key| self.queries.get_query_state::<CachedAsset<K::Asset>>(&key));
        let mutation = self.mutation.state();

        let cached = query
            .as_ref()
            .and_then(|q| q.data.as_deref().cloned().flatten());
        let asset = cached.or_else(|| mutation.data());

        let query_failed = query.as_ref().is_some_and(|q| q.status == QueryStatus::Error);
        let error = mutation
            .error()
            .map(ToString::to_string)
            .or_else(|| query.as_ref().and_then(|q| q.error.as_ref()).map(ToString::to_string));

        AssetSnapshot {
            payload: asset.as_ref().and_then(|a| a.payload().map(str::to_string)),
            is_cached: asset.as_ref().and_then(|a| a.cached()).unwrap_or(false),
            is_loading: query.as_ref().is_some_and(|q| q.is_loading()) || mutation.is_pending(),
            is_error: query_failed || matches!(mutation, MutationState::Error(_)),
            is_generating: mutation.is_pending(),
            error,
            asset,
        }
    }

    fn query_key(&self) -> Option<QueryKey> {
        self.character_id
            .as_deref()
            .map(|id| key::character_asset(K::QUERY_SCOPE, id))
    }
}

impl<K: CharacterAsset> Clone for AssetController<K> {
    fn clone(&self) -> Self {
        Self {
            genai: self.genai.clone(),
            queries: self.queries.clone(),
            character: self.character.clone(),
            character_id: self.character_id.clone(),
            mutation: self.mutation.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Anime sketches
// ---------------------------------------------------------------------------

/// What the presentation layer renders for the anime-sketch action.
#[derive(Debug, Clone, Default)]
pub struct SketchSnapshot {
    pub image_url: Option<String>,
    pub prompt: Option<String>,
    pub is_loading: bool,
    pub is_error: bool,
    pub error: Option<String>,
}

/// Mutation-only controller for anime sketches. Results are not cached.
#[derive(Clone)]
pub struct AnimeSketchController {
    genai: GenAiApi,
    mutation: Mutation<AnimeSketch>,
}

impl AnimeSketchController {
    pub fn new(genai: GenAiApi) -> Self {
        Self {
            genai,
            mutation: Mutation::new(),
        }
    }

    pub async fn generate(&self, character_name: &str) -> Result<Arc<AnimeSketch>, AssetError> {
        let guard = self.mutation.begin()?;
        match self.genai.generate_anime_sketch(character_name).await {
            Ok(sketch) => {
                let sketch = Arc::new(sketch);
                guard.succeed(Arc::clone(&sketch));
                Ok(sketch)
            }
            Err(e) => {
                tracing::error!(character = character_name, error = %e, "Anime sketch failed");
                guard.fail(e.clone());
                Err(e.into())
            }
        }
    }

    pub fn reset(&self) {
        self.mutation.reset();
    }

    pub fn snapshot(&self) -> SketchSnapshot {
        let state = self.mutation.state();
        let sketch = state.data();
        SketchSnapshot {
            image_url: sketch.as_ref().and_then(|s| s.image_url.clone()),
            prompt: sketch.as_ref().and_then(|s| s.prompt.clone()),
            is_loading: state.is_pending(),
            is_error: state.error().is_some(),
            error: state.error().map(ToString::to_string),
        }
    }
}

// ---- private helpers ----

async fn read_cached<K: CharacterAsset>(genai: &GenAiApi, character_id: &str) -> CachedAsset<K::Asset> {
    match genai.assets::<K>().lookup(character_id).await {
        Ok(CacheLookup::Hit(asset)) => Some(Arc::new(asset)),
        Ok(CacheLookup::Miss) => None,
        Ok(CacheLookup::BackendUnreachable { detail }) => {
            tracing::info!(
                kind = K::NOUN,
                character_id,
                detail = %detail,
                "Generation backend offline, no cached asset",
            );
            None
        }
        Err(e) => {
            tracing::error!(kind = K::NOUN, character_id, error = %e, "Error fetching cached asset");
            None
        }
    }
}
