//! Presentation-facing controllers built on the query cache.

pub mod assets;
pub mod favorites;
pub mod listing;
pub(crate) mod mutation;

