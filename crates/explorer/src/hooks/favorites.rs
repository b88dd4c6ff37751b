//! Joins the favorites store with per-URL catalog queries.
//!
//! Each favorited URL is its own `["character", url]` / `["starship", url]`
//! query, so entities already fetched elsewhere are served from the cache.

use std::sync::Arc;

use futures::future::join_all;
use holonet_swapi::{Character, Starship};

use crate::error::QueryError;
use crate::explorer::Explorer;
use crate::query::{key, QueryClient, QueryKey, QueryPolicy, QueryStatus};

/// Resolved favorites for one entity kind.
#[derive(Debug, Clone)]
pub struct FavoritesView<T> {
    /// Entities that resolved, in favorite order.
    pub items: Vec<Arc<T>>,
    /// Number of favorited URLs.
    pub requested: usize,
    /// Whether any lookup is still in flight.
    pub is_loading: bool,
    /// Lookups that failed.
    pub failed: usize,
}

impl<T> FavoritesView<T> {
    pub fn is_empty(&self) -> bool {
        self.requested == 0
    }

    fn from_results(requested: usize, results: Vec<Result<Option<Arc<T>>, QueryError>>) -> Self {
        let mut items = Vec::with_capacity(requested);
        let mut failed = 0;
        for result in results {
            match result {
                Ok(Some(item)) => items.push(item),
                Ok(None) => {}
                Err(e) => {
                    failed += 1;
                    tracing::warn!(error = %e, "Favorite lookup failed");
                }
            }
        }
        Self {
            items,
            requested,
            is_loading: false,
            failed,
        }
    }

    fn from_cache(queries: &QueryClient, keys: impl ExactSizeIterator<Item = QueryKey>) -> Self
    where
        T: Send + Sync + 'static,
    {
        let requested = keys.len();
        let mut view = Self {
            items: Vec::with_capacity(requested),
            requested,
            is_loading: false,
            failed: 0,
        };
        for key in keys {
            let state = queries.get_query_state::<T>(&key);
            match state.status {
                QueryStatus::Pending => view.is_loading = true,
                QueryStatus::Error => view.failed += 1,
                QueryStatus::Success | QueryStatus::Idle => {}
            }
            if let Some(item) = state.data {
                view.items.push(item);
            }
        }
        view
    }
}

/// Both favorite kinds, resolved together.
#[derive(Debug, Clone)]
pub struct FavoritesOverview {
    pub characters: FavoritesView<Character>,
    pub starships: FavoritesView<Starship>,
}

impl FavoritesOverview {
    pub fn is_loading(&self) -> bool {
        self.characters.is_loading || self.starships.is_loading
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty() && self.starships.is_empty()
    }
}

impl Explorer {
    /// Fetch every favorited character in parallel.
    pub async fn load_favorite_characters(&self) -> FavoritesView<Character> {
        let urls = self.favorites().favorite_characters();
        let results = join_all(urls.iter().map(|url| self.character_by_url(url))).await;
        FavoritesView::from_results(urls.len(), results)
    }

    /// Fetch every favorited starship in parallel.
    pub async fn load_favorite_starships(&self) -> FavoritesView<Starship> {
        let urls = self.favorites().favorite_starships();
        let results = join_all(urls.iter().map(|url| self.starship_by_url(url))).await;
        FavoritesView::from_results(urls.len(), results)
    }

    pub async fn load_favorites(&self) -> FavoritesOverview {
        let (characters, starships) =
            futures::join!(self.load_favorite_characters(), self.load_favorite_starships());
        FavoritesOverview {
            characters,
            starships,
        }
    }

    /// Start background lookups for every favorite without waiting.
    ///
    /// Must be called from within a tokio runtime.
    pub fn prefetch_favorites(&self) {
        for url in self.favorites().favorite_characters() {
            self.queries().prefetch_query(
                key::character(&url),
                QueryPolicy::CATALOG_ENTITY,
                self.character_url_fetcher(&url),
            );
        }
        for url in self.favorites().favorite_starships() {
            self.queries().prefetch_query(
                key::starship(&url),
                QueryPolicy::CATALOG_ENTITY,
                self.starship_url_fetcher(&url),
            );
        }
    }

    /// Current cache state of the favorites, without fetching.
    pub fn favorites_snapshot(&self) -> FavoritesOverview {
        let characters = self.favorites().favorite_characters();
        let starships = self.favorites().favorite_starships();
        FavoritesOverview {
            characters: FavoritesView::from_cache(
                self.queries(),
                characters.iter().map(|url| key::character(url)),
            ),
            starships: FavoritesView::from_cache(
                self.queries(),
                starships.iter().map(|url| key::starship(url)),
            ),
        }
    }
}
