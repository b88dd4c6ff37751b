#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use holonet_core::favorites::MemoryPersistence;
use holonet_core::{FavoriteSet, FavoritesStore};
use holonet_explorer::query::RetryConfig;
use holonet_explorer::{Explorer, QueryClient};
use holonet_genai::GenAiApi;
use holonet_swapi::SwapiClient;

/// Serve `router` on an ephemeral loopback port and return its origin.
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// An origin on a port that nothing listens on.
pub async fn unreachable_origin() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Per-path request counters shared with handlers.
#[derive(Clone, Default)]
pub struct Hits(Arc<Mutex<HashMap<String, usize>>>);

impl Hits {
    pub fn bump(&self, path: impl Into<String>) -> usize {
        let mut hits = self.0.lock().unwrap();
        let count = hits.entry(path.into()).or_default();
        *count += 1;
        *count
    }

    pub fn count(&self, path: &str) -> usize {
        self.0.lock().unwrap().get(path).copied().unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.0.lock().unwrap().values().sum()
    }
}

/// A simple shared counter for fetch closures.
#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn bump(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Explorer over the given catalog base and backend origin, with
/// in-memory favorites and millisecond retry backoff.
pub fn explorer(catalog_base: &str, backend: &str, favorites: FavoriteSet) -> Explorer {
    let catalog = SwapiClient::new(catalog_base).unwrap();
    let genai = GenAiApi::new(backend);
    let queries = QueryClient::with_retry(RetryConfig::with_initial_delay(Duration::from_millis(1)));
    let store = FavoritesStore::open(MemoryPersistence::with_state(favorites)).unwrap();
    Explorer::new(catalog, genai, queries, Arc::new(store))
}
