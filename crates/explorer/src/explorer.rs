//! The explorer facade: typed catalog queries over the shared cache, plus
//! factories for the generated-asset controllers.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use holonet_core::favorites::JsonFilePersistence;
use holonet_core::view::sort_by_sequence;
use holonet_core::FavoritesStore;
use holonet_genai::{GenAiApi, Image, Story};
use holonet_swapi::{CatalogError, Character, Film, Planet, Starship, SwapiClient};

use crate::config::ExplorerConfig;
use crate::debounce::DEFAULT_DEBOUNCE;
use crate::error::{ExplorerError, QueryError};
use crate::hooks::assets::{AnimeSketchController, AssetController};
use crate::hooks::listing::ListingController;
use crate::query::{key, QueryClient, QueryKey, QueryPolicy, QueryResult, RetryConfig};

/// Entry point for everything the presentation layer reads.
///
/// Cheap to clone; clones share the cache and the favorites store.
#[derive(Debug, Clone)]
pub struct Explorer {
    catalog: SwapiClient,
    genai: GenAiApi,
    queries: QueryClient,
    favorites: Arc<FavoritesStore>,
    search_debounce: Duration,
}

impl Explorer {
    pub fn new(
        catalog: SwapiClient,
        genai: GenAiApi,
        queries: QueryClient,
        favorites: Arc<FavoritesStore>,
    ) -> Self {
        Self {
            catalog,
            genai,
            queries,
            favorites,
            search_debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// Quiet period applied to search input by [`listing`](Self::listing).
    pub fn with_search_debounce(mut self, delay: Duration) -> Self {
        self.search_debounce = delay;
        self
    }

    /// Build clients, cache, and file-backed favorites from configuration.
    pub fn from_config(config: &ExplorerConfig) -> Result<Self, ExplorerError> {
        let catalog = SwapiClient::with_timeout(config.catalog_base_url.clone(), config.catalog_timeout)?;
        let genai = GenAiApi::new(config.backend_url.clone());
        let queries = QueryClient::with_retry(RetryConfig::with_initial_delay(config.retry_base));
        let favorites = FavoritesStore::open(JsonFilePersistence::in_dir(&config.favorites_dir))?;

        tracing::info!(
            catalog = %catalog.base_url(),
            backend = %genai.api_url(),
            favorites = favorites.favorite_characters().len() + favorites.favorite_starships().len(),
            "Explorer initialised",
        );
        Ok(Self::new(catalog, genai, queries, Arc::new(favorites))
            .with_search_debounce(config.search_debounce))
    }

    pub fn catalog(&self) -> &SwapiClient {
        &self.catalog
    }

    pub fn genai(&self) -> &GenAiApi {
        &self.genai
    }

    pub fn queries(&self) -> &QueryClient {
        &self.queries
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn search_debounce(&self) -> Duration {
        self.search_debounce
    }

    // -----------------------------------------------------------------------
    // Characters
    // -----------------------------------------------------------------------

    pub async fn characters(&self) -> Result<Arc<Vec<Character>>, QueryError> {
        self.queries
            .fetch_query(
                key::characters(),
                QueryPolicy::CATALOG_COLLECTION,
                self.fetcher(|c| async move { c.get_characters().await }),
            )
            .await
    }

    /// One character by short id. Disabled for an empty id.
    pub async fn character(&self, id: &str) -> QueryResult<Character> {
        let id = id.to_string();
        self.entity(
            key::character(&id),
            self.fetcher(move |c| {
                let id = id.clone();
                async move { c.get_character(&id).await }
            }),
        )
        .await
    }

    /// One character by full resource URL. Disabled for an empty URL.
    pub async fn character_by_url(&self, url: &str) -> QueryResult<Character> {
        self.entity(key::character(url), self.character_url_fetcher(url))
            .await
    }

    // -----------------------------------------------------------------------
    // Starships
    // -----------------------------------------------------------------------

    pub async fn starships(&self) -> Result<Arc<Vec<Starship>>, QueryError> {
        self.queries
            .fetch_query(
                key::starships(),
                QueryPolicy::CATALOG_COLLECTION,
                self.fetcher(|c| async move { c.get_starships().await }),
            )
            .await
    }

    pub async fn starship(&self, id: &str) -> QueryResult<Starship> {
        let id = id.to_string();
        self.entity(
            key::starship(&id),
            self.fetcher(move |c| {
                let id = id.clone();
                async move { c.get_starship(&id).await }
            }),
        )
        .await
    }

    pub async fn starship_by_url(&self, url: &str) -> QueryResult<Starship> {
        self.entity(key::starship(url), self.starship_url_fetcher(url))
            .await
    }

    // -----------------------------------------------------------------------
    // Films and planets
    // -----------------------------------------------------------------------

    /// Films in upstream order.
    pub async fn films(&self) -> Result<Arc<Vec<Film>>, QueryError> {
        self.queries
            .fetch_query(
                key::films(),
                QueryPolicy::CATALOG_COLLECTION,
                self.fetcher(|c| async move { c.get_films().await }),
            )
            .await
    }

    /// Films ordered by ascending episode number.
    pub async fn films_by_episode(&self) -> Result<Vec<Film>, QueryError> {
        let films = self.films().await?;
        Ok(sort_by_sequence(films.as_slice()).into_iter().cloned().collect())
    }

    pub async fn film(&self, id: &str) -> QueryResult<Film> {
        let id = id.to_string();
        self.entity(
            key::film(&id),
            self.fetcher(move |c| {
                let id = id.clone();
                async move { c.get_film(&id).await }
            }),
        )
        .await
    }

    /// One page of planets, optionally filtered server-side.
    pub async fn planets(&self, page: u32, search: Option<&str>) -> Result<Arc<Vec<Planet>>, QueryError> {
        let search = search.filter(|s| !s.is_empty()).map(str::to_string);
        self.queries
            .fetch_query(
                key::planets(page, search.as_deref()),
                QueryPolicy::CATALOG_COLLECTION,
                self.fetcher(move |c| {
                    let search = search.clone();
                    async move { c.get_planets(page, search.as_deref()).await }
                }),
            )
            .await
    }

    pub async fn planet(&self, id: &str) -> QueryResult<Planet> {
        let id = id.to_string();
        self.entity(
            key::planet(&id),
            self.fetcher(move |c| {
                let id = id.clone();
                async move { c.get_planet(&id).await }
            }),
        )
        .await
    }

    // -----------------------------------------------------------------------
    // Generated content
    // -----------------------------------------------------------------------

    /// Image controller for `character`. With `None` the cache read is
    /// disabled and generation is refused.
    pub fn character_image(&self, character: Option<Character>) -> AssetController<Image> {
        AssetController::new(self.genai.clone(), self.queries.clone(), character)
    }

    pub fn character_story(&self, character: Option<Character>) -> AssetController<Story> {
        AssetController::new(self.genai.clone(), self.queries.clone(), character)
    }

    pub fn anime_sketch(&self) -> AnimeSketchController {
        AnimeSketchController::new(self.genai.clone())
    }

    /// Page and search state for a listing screen, debounced by the
    /// configured delay.
    pub fn listing(&self, page_size: usize) -> ListingController {
        ListingController::new(page_size, self.search_debounce)
    }

    // ---- crate helpers ----

    pub(crate) fn character_url_fetcher(
        &self,
        url: &str,
    ) -> impl Fn() -> BoxFuture<'static, Result<Character, QueryError>> + Send + Sync + 'static {
        let url = url.to_string();
        self.fetcher(move |c| {
            let url = url.clone();
            async move { c.get_character_by_url(&url).await }
        })
    }

    pub(crate) fn starship_url_fetcher(
        &self,
        url: &str,
    ) -> impl Fn() -> BoxFuture<'static, Result<Starship, QueryError>> + Send + Sync + 'static {
        let url = url.to_string();
        self.fetcher(move |c| {
            let url = url.clone();
            async move { c.get_starship_by_url(&url).await }
        })
    }

    // ---- private helpers ----

    /// Adapt a catalog call into a cache fetcher.
    fn fetcher<T, F, Fut>(
        &self,
        fetch: F,
    ) -> impl Fn() -> BoxFuture<'static, Result<T, QueryError>> + Send + Sync + 'static
    where
        T: 'static,
        F: Fn(SwapiClient) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, CatalogError>> + Send + 'static,
    {
        let catalog = self.catalog.clone();
        move || {
            let request = fetch(catalog.clone());
            async move { request.await.map_err(QueryError::from) }.boxed()
        }
    }

    async fn entity<T, F>(&self, key: QueryKey, fetcher: F) -> QueryResult<T>
    where
        T: Send + Sync + 'static,
        F: Fn() -> BoxFuture<'static, Result<T, QueryError>> + Send + Sync + 'static,
    {
        if key.params().iter().all(|p| p.is_empty()) {
            tracing::trace!(scope = key.scope(), "Query disabled, no identifier");
            return Ok(None);
        }
        self.queries
            .fetch_query(key, QueryPolicy::CATALOG_ENTITY, fetcher)
            .await
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use holonet_core::favorites::MemoryPersistence;

    use super::*;

    #[test]
    fn from_config_restores_file_favorites() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FavoritesStore::open(JsonFilePersistence::in_dir(dir.path())).unwrap();
            store.add_character("https://swapi.info/api/people/1").unwrap();
            store.add_starship("https://swapi.info/api/starships/10").unwrap();
        }

        let config = ExplorerConfig {
            favorites_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let explorer = Explorer::from_config(&config).unwrap();

        assert_eq!(explorer.catalog().base_url(), "https://swapi.info/api");
        assert_eq!(explorer.genai().api_url(), "http://localhost:8080");
        assert_eq!(
            explorer.favorites().favorite_characters(),
            vec!["https://swapi.info/api/people/1".to_string()]
        );
        assert_eq!(explorer.favorites().favorite_starships().len(), 1);
        assert_eq!(explorer.queries().retry_config().initial_delay, config.retry_base);
    }

    #[tokio::test(start_paused = true)]
    async fn listing_uses_configured_search_debounce() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExplorerConfig {
            favorites_dir: dir.path().to_path_buf(),
            search_debounce: Duration::from_millis(50),
            ..Default::default()
        };
        let explorer = Explorer::from_config(&config).unwrap();
        assert_eq!(explorer.search_debounce(), Duration::from_millis(50));

        let listing = explorer.listing(12);
        assert_eq!(listing.debounce(), Duration::from_millis(50));
        listing.type_search("luke");
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(listing.state().search(), "luke");
    }

    #[tokio::test]
    async fn blank_but_non_empty_id_is_still_fetched() {
        // Nothing listens on port 1, so an enabled query fails fast.
        let explorer = Explorer::new(
            SwapiClient::new("http://127.0.0.1:1/api").unwrap(),
            GenAiApi::new("http://127.0.0.1:1"),
            QueryClient::with_retry(RetryConfig::with_initial_delay(Duration::from_millis(1))),
            Arc::new(FavoritesStore::open(MemoryPersistence::default()).unwrap()),
        );

        assert!(explorer.character("").await.unwrap().is_none());
        let err = explorer.character(" ").await.unwrap_err();
        assert!(matches!(err, QueryError::Catalog(_)));
    }

    #[test]
    fn corrupt_favorites_file_fails_construction() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sw-favorites-storage.json"), "{not json").unwrap();

        let config = ExplorerConfig {
            favorites_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let err = Explorer::from_config(&config).unwrap_err();
        assert!(matches!(err, ExplorerError::Core(_)));
    }
}
