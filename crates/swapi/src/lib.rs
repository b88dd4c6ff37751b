//! Typed client for the read-only catalog API (people, starships, films,
//! planets).
//!
//! Every payload is schema-validated before it reaches callers; failures
//! map onto the small [`CatalogError`] taxonomy.

pub mod client;
pub mod error;
pub mod models;
pub mod schema;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use client::{SwapiClient, DEFAULT_BASE_URL};
pub use error::CatalogError;
pub use models::{CatalogEntity, Character, Film, Planet, Starship};
