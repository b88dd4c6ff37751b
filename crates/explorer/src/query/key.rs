//! Logical query identities.
//!
//! A key is a scope name plus ordered parameters, e.g. `["character", "1"]`.
//! Two requests with equal keys share one cache entry and one in-flight
//! fetch.

use std::fmt;

/// Identity of one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    scope: &'static str,
    params: Vec<String>,
}

impl QueryKey {
    pub fn new(scope: &'static str) -> Self {
        Self {
            scope,
            params: Vec::new(),
        }
    }

    /// Append one parameter.
    pub fn with(mut self, param: impl Into<String>) -> Self {
        self.params.push(param.into());
        self
    }

    pub fn scope(&self) -> &'static str {
        self.scope
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}", self.scope)?;
        for param in &self.params {
            write!(f, ", {param:?}")?;
        }
        f.write_str("]")
    }
}

// ---------------------------------------------------------------------------
// Catalog and asset keys
// ---------------------------------------------------------------------------

pub fn characters() -> QueryKey {
    QueryKey::new("characters")
}

/// Keyed by id or by full resource URL, whichever the caller holds.
pub fn character(id_or_url: &str) -> QueryKey {
    QueryKey::new("character").with(id_or_url)
}

pub fn starships() -> QueryKey {
    QueryKey::new("starships")
}

pub fn starship(id_or_url: &str) -> QueryKey {
    QueryKey::new("starship").with(id_or_url)
}

pub fn films() -> QueryKey {
    QueryKey::new("films")
}

pub fn film(id: &str) -> QueryKey {
    QueryKey::new("film").with(id)
}

/// An empty search and an absent one share a key.
pub fn planets(page: u32, search: Option<&str>) -> QueryKey {
    QueryKey::new("planets")
        .with(page.to_string())
        .with(search.unwrap_or_default())
}

pub fn planet(id: &str) -> QueryKey {
    QueryKey::new("planet").with(id)
}

/// Cache-read entry for one generated asset scope (`characterImage`,
/// `characterStory`).
pub fn character_asset(scope: &'static str, character_id: &str) -> QueryKey {
    QueryKey::new(scope).with(character_id)
}
