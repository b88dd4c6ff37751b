//! Data layer of the Holonet catalog explorer.
//!
//! Wires the catalog and generation clients into a shared query cache and
//! exposes what the presentation layer needs:
//!
//! - [`Explorer`] -- typed catalog queries and controller factories.
//! - [`query`] -- the keyed cache with freshness, retry, and retention.
//! - [`hooks`] -- generated-asset controllers, favorites composition, and
//!   listing state.
//! - [`debounce`] -- search input debouncing.
//! - [`config`] / [`telemetry`] -- environment configuration and tracing
//!   setup for binaries.

pub mod config;
pub mod debounce;
pub mod error;
pub mod explorer;
pub mod hooks;
pub mod query;
pub mod telemetry;

pub use config::ExplorerConfig;
pub use debounce::Debouncer;
pub use error::{AssetError, ExplorerError, QueryError};
pub use explorer::Explorer;
pub use hooks::assets::{AnimeSketchController, AssetController, AssetSnapshot, SketchSnapshot};
pub use hooks::favorites::{FavoritesOverview, FavoritesView};
pub use hooks::listing::{ListingController, ListingView};
pub use query::{QueryClient, QueryKey, QueryPolicy, QueryStatus};
