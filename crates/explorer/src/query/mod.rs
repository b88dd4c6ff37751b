//! Keyed query cache with per-resource freshness, retry, and retention.
//!
//! - [`key`] -- logical query identities.
//! - [`policy`] -- freshness / retry / retention per resource class, plus
//!   the retry backoff schedule.
//! - [`cache`] -- the shared [`QueryClient`] with in-flight deduplication.

pub mod cache;
pub mod key;
pub mod policy;

pub use cache::{QueryClient, QuerySnapshot, QueryStatus};
pub use key::QueryKey;
pub use policy::{next_delay, QueryPolicy, RetryConfig};

/// Outcome of a query that may be disabled: `Ok(None)` means the query
/// had no usable input and performed no fetch.
pub type QueryResult<T> = Result<Option<std::sync::Arc<T>>, crate::error::QueryError>;
