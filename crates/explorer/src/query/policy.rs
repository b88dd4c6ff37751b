//! Per-resource cache policies and the retry backoff schedule.

use std::time::Duration;

/// Default retention for entries whose policy does not name one.
pub const DEFAULT_GC_TIME: Duration = Duration::from_secs(5 * 60);

/// Freshness, retry, and retention settings for one resource class.
///
/// `None` for a duration means "forever".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPolicy {
    /// How long fetched data is served without refetching.
    pub stale_time: Option<Duration>,
    /// Extra attempts after a transient failure.
    pub retry: u32,
    /// How long an unused entry is kept before eviction.
    pub gc_time: Option<Duration>,
}

impl QueryPolicy {
    /// Character, starship, film, and planet-page listings.
    pub const CATALOG_COLLECTION: Self = Self {
        stale_time: Some(Duration::from_secs(5 * 60)),
        retry: 2,
        gc_time: Some(Duration::from_secs(10 * 60)),
    };

    /// One catalog entity, looked up by id or URL.
    pub const CATALOG_ENTITY: Self = Self {
        stale_time: Some(Duration::from_secs(5 * 60)),
        retry: 2,
        gc_time: Some(DEFAULT_GC_TIME),
    };

    /// Cache reads of generated images and stories. Once read, the result
    /// only changes through an explicit generation.
    pub const GENERATED_ASSET: Self = Self {
        stale_time: None,
        retry: 0,
        gc_time: None,
    };

    /// Whether data written at `age` ago is still fresh.
    pub fn is_fresh(&self, age: Duration) -> bool {
        self.stale_time.is_none_or(|stale| age < stale)
    }

    /// Whether an entry idle for `idle` should be evicted.
    pub fn is_expired(&self, idle: Duration) -> bool {
        self.gc_time.is_some_and(|gc| idle >= gc)
    }
}

// ---------------------------------------------------------------------------
// Retry backoff
// ---------------------------------------------------------------------------

/// Tunable parameters for the exponential retry backoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Default schedule with a custom first delay.
    pub fn with_initial_delay(initial_delay: Duration) -> Self {
        Self {
            initial_delay,
            ..Default::default()
        }
    }
}

/// Calculate the next backoff delay from the current delay and config.
///
/// The result is clamped to [`RetryConfig::max_delay`].
pub fn next_delay(current: Duration, config: &RetryConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_delay)
}
