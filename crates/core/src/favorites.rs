//! Persisted favorites store.
//!
//! [`FavoritesStore`] owns two ordered, deduplicated collections of catalog
//! resource URLs (favorite characters and favorite starships). Reads are
//! synchronous; every state-changing write is saved through an injected
//! [`FavoritesPersistence`] adapter before it becomes visible, so the
//! persisted copy never lags behind the in-memory one.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Namespace key of the single durable-storage entry holding favorites.
pub const FAVORITES_STORAGE_KEY: &str = "sw-favorites-storage";

/// Schema version written alongside the persisted state.
pub const FAVORITES_STORAGE_VERSION: u32 = 0;

// ---------------------------------------------------------------------------
// FavoriteSet
// ---------------------------------------------------------------------------

/// The two favorite-URL collections, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteSet {
    pub favorite_characters: Vec<String>,
    pub favorite_starships: Vec<String>,
}

/// Which favorites collection an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteKind {
    Character,
    Starship,
}

impl FavoriteSet {
    /// Returns `true` if neither collection holds any URL.
    pub fn is_empty(&self) -> bool {
        self.favorite_characters.is_empty() && self.favorite_starships.is_empty()
    }

    /// The collection for `kind`.
    pub fn urls(&self, kind: FavoriteKind) -> &[String] {
        match kind {
            FavoriteKind::Character => &self.favorite_characters,
            FavoriteKind::Starship => &self.favorite_starships,
        }
    }

    fn urls_mut(&mut self, kind: FavoriteKind) -> &mut Vec<String> {
        match kind {
            FavoriteKind::Character => &mut self.favorite_characters,
            FavoriteKind::Starship => &mut self.favorite_starships,
        }
    }

    /// Drop repeated URLs, keeping the first occurrence of each.
    fn dedup_in_place(&mut self) {
        for list in [&mut self.favorite_characters, &mut self.favorite_starships] {
            let mut seen = HashSet::with_capacity(list.len());
            list.retain(|url| seen.insert(url.clone()));
        }
    }
}

// ---------------------------------------------------------------------------
// Persistence adapters
// ---------------------------------------------------------------------------

/// Durable storage for a [`FavoriteSet`].
///
/// `load` on a never-written medium must return an empty set, not an error.
pub trait FavoritesPersistence: Send + Sync {
    fn load(&self) -> Result<FavoriteSet, CoreError>;
    fn save(&self, favorites: &FavoriteSet) -> Result<(), CoreError>;
}

/// On-disk envelope: `{"state": {...}, "version": 0}`.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedFavorites {
    state: FavoriteSet,
    #[serde(default)]
    version: u32,
}

/// Stores favorites as one namespaced JSON file inside a directory.
///
/// The file is written to a temporary sibling first and renamed into place.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    /// Persist under `<dir>/sw-favorites-storage.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{FAVORITES_STORAGE_KEY}.json")),
        }
    }

    /// Full path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FavoritesPersistence for JsonFilePersistence {
    fn load(&self) -> Result<FavoriteSet, CoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(FavoriteSet::default())
            }
            Err(e) => return Err(e.into()),
        };

        let persisted: PersistedFavorites =
            serde_json::from_str(&raw).map_err(|e| CoreError::CorruptState {
                key: FAVORITES_STORAGE_KEY,
                reason: e.to_string(),
            })?;
        Ok(persisted.state)
    }

    fn save(&self, favorites: &FavoriteSet) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let envelope = PersistedFavorites {
            state: favorites.clone(),
            version: FAVORITES_STORAGE_VERSION,
        };
        let body = serde_json::to_string(&envelope)
            .map_err(|e| CoreError::Internal(format!("Failed to encode favorites: {e}")))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Keeps favorites in memory only. Counts saves so tests can assert on
/// write behaviour.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    state: Mutex<FavoriteSet>,
    saves: AtomicUsize,
}

impl MemoryPersistence {
    /// Start from a pre-populated set, as if restored from a prior session.
    pub fn with_state(state: FavoriteSet) -> Self {
        Self {
            state: Mutex::new(state),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of successful `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Copy of the last saved state.
    pub fn stored(&self) -> FavoriteSet {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl FavoritesPersistence for MemoryPersistence {
    fn load(&self) -> Result<FavoriteSet, CoreError> {
        Ok(self.stored())
    }

    fn save(&self, favorites: &FavoriteSet) -> Result<(), CoreError> {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = favorites.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl<P: FavoritesPersistence + ?Sized> FavoritesPersistence for std::sync::Arc<P> {
    fn load(&self) -> Result<FavoriteSet, CoreError> {
        (**self).load()
    }

    fn save(&self, favorites: &FavoriteSet) -> Result<(), CoreError> {
        (**self).save(favorites)
    }
}

// ---------------------------------------------------------------------------
// FavoritesStore
// ---------------------------------------------------------------------------

/// Encapsulated favorites state with write-through persistence.
///
/// Safe to share behind an `Arc`. Concurrent writers are serialized; the
/// last write wins.
pub struct FavoritesStore {
    state: RwLock<FavoriteSet>,
    persistence: Box<dyn FavoritesPersistence>,
}

impl FavoritesStore {
    /// Restore the store from its persistence adapter.
    pub fn open(persistence: impl FavoritesPersistence + 'static) -> Result<Self, CoreError> {
        let mut state = persistence.load()?;
        state.dedup_in_place();
        Ok(Self {
            state: RwLock::new(state),
            persistence: Box::new(persistence),
        })
    }

    pub fn add_character(&self, url: &str) -> Result<(), CoreError> {
        self.add(FavoriteKind::Character, url)
    }

    pub fn remove_character(&self, url: &str) -> Result<(), CoreError> {
        self.remove(FavoriteKind::Character, url)
    }

    pub fn add_starship(&self, url: &str) -> Result<(), CoreError> {
        self.add(FavoriteKind::Starship, url)
    }

    pub fn remove_starship(&self, url: &str) -> Result<(), CoreError> {
        self.remove(FavoriteKind::Starship, url)
    }

    pub fn is_character_favorite(&self, url: &str) -> bool {
        self.contains(FavoriteKind::Character, url)
    }

    pub fn is_starship_favorite(&self, url: &str) -> bool {
        self.contains(FavoriteKind::Starship, url)
    }

    /// Flip membership of `url`; returns the new membership.
    pub fn toggle(&self, kind: FavoriteKind, url: &str) -> Result<bool, CoreError> {
        if self.contains(kind, url) {
            self.remove(kind, url)?;
            Ok(false)
        } else {
            self.add(kind, url)?;
            Ok(true)
        }
    }

    /// Remove every favorite of both kinds.
    pub fn clear_all(&self) -> Result<(), CoreError> {
        self.update(|set| {
            if set.is_empty() {
                return false;
            }
            *set = FavoriteSet::default();
            true
        })
    }

    /// Favorite character URLs in insertion order.
    pub fn favorite_characters(&self) -> Vec<String> {
        self.read().favorite_characters.clone()
    }

    /// Favorite starship URLs in insertion order.
    pub fn favorite_starships(&self) -> Vec<String> {
        self.read().favorite_starships.clone()
    }

    /// Copy of the whole current state.
    pub fn snapshot(&self) -> FavoriteSet {
        self.read().clone()
    }

    /// Add `url` to the `kind` collection. Already-present URLs are a no-op.
    pub fn add(&self, kind: FavoriteKind, url: &str) -> Result<(), CoreError> {
        self.update(|set| {
            let list = set.urls_mut(kind);
            if list.iter().any(|u| u == url) {
                return false;
            }
            list.push(url.to_string());
            true
        })
    }

    /// Remove `url` from the `kind` collection. Absent URLs are a no-op.
    pub fn remove(&self, kind: FavoriteKind, url: &str) -> Result<(), CoreError> {
        self.update(|set| {
            let list = set.urls_mut(kind);
            let before = list.len();
            list.retain(|u| u != url);
            list.len() != before
        })
    }

    pub fn contains(&self, kind: FavoriteKind, url: &str) -> bool {
        self.read().urls(kind).iter().any(|u| u == url)
    }

    // ---- private helpers ----

    fn read(&self) -> std::sync::RwLockReadGuard<'_, FavoriteSet> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Apply `mutate` to a copy of the state; if it reports a change, save
    /// the copy and only then commit it.
    fn update(&self, mutate: impl FnOnce(&mut FavoriteSet) -> bool) -> Result<(), CoreError> {
        let mut guard = self.state.write().unwrap_or_else(|e| e.into_inner());
        let mut next = guard.clone();
        if !mutate(&mut next) {
            return Ok(());
        }
        self.persistence.save(&next)?;
        *guard = next;
        Ok(())
    }
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("state", &*self.read())
            .finish_non_exhaustive()
    }
}
