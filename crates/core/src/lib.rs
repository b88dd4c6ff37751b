//! Shared building blocks for the Holonet catalog explorer.
//!
//! Everything here is synchronous and free of network I/O:
//!
//! - [`error::CoreError`] -- the domain error type.
//! - [`ids`] -- resource URL to short identifier extraction.
//! - [`format`] -- display helpers for catalog string fields.
//! - [`favorites`] -- the persisted favorites store and its adapters.
//! - [`view`] -- filtering, sorting, and pagination of fetched collections.

pub mod error;
pub mod favorites;
pub mod format;
pub mod ids;
pub mod view;

pub use error::CoreError;
pub use favorites::{FavoriteSet, FavoritesPersistence, FavoritesStore};
