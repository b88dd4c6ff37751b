//! Error types for the query layer and the asset controllers.

use holonet_core::CoreError;
use holonet_genai::GenAiError;
use holonet_swapi::CatalogError;

/// Errors surfaced by [`crate::query::QueryClient`].
///
/// `Clone` because one in-flight fetch fans its result out to every
/// waiter.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    /// The catalog fetch failed after any retries.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A generation-backend call failed.
    #[error(transparent)]
    Generation(#[from] GenAiError),

    /// A cached value was requested with a different type than it was
    /// stored with.
    #[error("Cached value for {key} has an unexpected type")]
    TypeMismatch { key: String },

    /// The fetch task panicked or was cancelled by the runtime.
    #[error("Query {key} ended abnormally: {detail}")]
    Aborted { key: String, detail: String },
}

impl QueryError {
    /// Whether a bounded retry may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            QueryError::Catalog(e) => e.is_transient(),
            QueryError::Generation(GenAiError::Unreachable { .. }) => true,
            QueryError::Generation(_) | QueryError::TypeMismatch { .. } | QueryError::Aborted { .. } => false,
        }
    }
}

/// Errors from the generated-asset controllers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssetError {
    /// The controller has no character to generate for.
    #[error("No character selected")]
    NoCharacter,

    /// A generation request from this controller is still in flight.
    #[error("A generation request is already in progress")]
    GenerationPending,

    #[error(transparent)]
    Generation(#[from] GenAiError),
}

/// Errors building an [`crate::Explorer`] from configuration.
#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
