//! The shared query cache.
//!
//! Entries are stored type-erased behind [`QueryKey`]s. A fetch for a key
//! runs as its own tokio task; every concurrent requester awaits the same
//! shared future, and the task writes its result into the cache even if
//! all requesters have gone away.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::time::Instant;

use crate::error::QueryError;
use crate::query::key::QueryKey;
use crate::query::policy::{next_delay, QueryPolicy, RetryConfig};

type AnyValue = Arc<dyn Any + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, Result<AnyValue, QueryError>>>;

/// Lifecycle state of one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Never fetched (or disabled).
    Idle,
    /// First fetch in flight, no data yet.
    Pending,
    /// Data is available.
    Success,
    /// The latest fetch failed.
    Error,
}

/// Point-in-time view of one cache entry.
#[derive(Debug, Clone)]
pub struct QuerySnapshot<T> {
    pub status: QueryStatus,
    pub data: Option<Arc<T>>,
    pub error: Option<QueryError>,
    pub is_fetching: bool,
    pub is_stale: bool,
    pub data_updated_at: Option<Instant>,
}

impl<T> QuerySnapshot<T> {
    fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            is_fetching: false,
            is_stale: true,
            data_updated_at: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Pending
    }
}

/// Shared, cheaply cloneable handle to the query cache.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

struct Inner {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    retry: RetryConfig,
    next_fetch_id: AtomicU64,
}

struct Entry {
    data: Option<AnyValue>,
    error: Option<QueryError>,
    updated_at: Option<Instant>,
    invalidated: bool,
    last_used: Instant,
    policy: QueryPolicy,
    in_flight: Option<InFlight>,
}

struct InFlight {
    id: u64,
    future: SharedFetch,
}

/// Result of the synchronous half of a fetch.
enum Lookup {
    Fresh(AnyValue),
    Pending(SharedFetch),
}

impl QueryClient {
    pub fn new() -> Self {
        Self::with_retry(RetryConfig::default())
    }

    /// Create a cache whose retries follow `retry`.
    pub fn with_retry(retry: RetryConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                retry,
                next_fetch_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn retry_config(&self) -> RetryConfig {
        self.inner.retry
    }

    /// Return fresh cached data for `key`, or run `fetcher` (deduplicated
    /// across concurrent callers, retried per `policy`) and cache the
    /// result.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn fetch_query<T, F, Fut>(
        &self,
        key: QueryKey,
        policy: QueryPolicy,
        fetcher: F,
    ) -> Result<Arc<T>, QueryError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, QueryError>> + Send + 'static,
    {
        match self.begin(&key, policy, fetcher) {
            Lookup::Fresh(value) => downcast(&key, value),
            Lookup::Pending(fetch) => downcast(&key, fetch.await?),
        }
    }

    /// Start fetching `key` in the background unless it is fresh or
    /// already in flight. Returns immediately.
    pub fn prefetch_query<T, F, Fut>(&self, key: QueryKey, policy: QueryPolicy, fetcher: F)
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, QueryError>> + Send + 'static,
    {
        let _ = self.begin(&key, policy, fetcher);
    }

    /// Cached data for `key`, fresh or not, without fetching.
    pub fn get_query_data<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let entries = self.inner.lock();
        let data = entries.get(key)?.data.clone()?;
        data.downcast::<T>().ok()
    }

    /// Snapshot of `key`'s status, data, and freshness.
    pub fn get_query_state<T: Send + Sync + 'static>(&self, key: &QueryKey) -> QuerySnapshot<T> {
        let entries = self.inner.lock();
        let Some(entry) = entries.get(key) else {
            return QuerySnapshot::idle();
        };

        let now = Instant::now();
        let is_fetching = entry.in_flight.is_some();
        let status = match (&entry.data, &entry.error, is_fetching) {
            (None, _, true) => QueryStatus::Pending,
            (_, Some(_), false) => QueryStatus::Error,
            (Some(_), _, _) => QueryStatus::Success,
            (None, None, false) => QueryStatus::Idle,
        };

        QuerySnapshot {
            status,
            data: entry.data.clone().and_then(|d| d.downcast::<T>().ok()),
            error: entry.error.clone(),
            is_fetching,
            is_stale: entry.fresh_data(now).is_none(),
            data_updated_at: entry.updated_at,
        }
    }

    /// Write `value` as the current data for `key`, marking it fresh.
    ///
    /// A fetch already in flight for `key` still resolves for its own
    /// waiters but no longer overwrites this value.
    pub fn set_query_data<T: Send + Sync + 'static>(
        &self,
        key: QueryKey,
        policy: QueryPolicy,
        value: T,
    ) -> Arc<T> {
        let value = Arc::new(value);
        let now = Instant::now();
        let mut entries = self.inner.lock();
        let entry = entries.entry(key).or_insert_with(|| Entry::new(policy, now));
        entry.data = Some(value.clone() as AnyValue);
        entry.error = None;
        entry.updated_at = Some(now);
        entry.invalidated = false;
        entry.last_used = now;
        entry.in_flight = None;
        value
    }

    /// Mark `key` stale so the next fetch goes to the network. Returns
    /// whether the key existed.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        match self.inner.lock().get_mut(key) {
            Some(entry) => {
                entry.invalidated = true;
                tracing::debug!(key = %key, "Query invalidated");
                true
            }
            None => false,
        }
    }

    /// Drop `key` entirely. A fetch in flight for it completes for its
    /// waiters but is not cached.
    pub fn remove(&self, key: &QueryKey) -> bool {
        self.inner.lock().remove(key).is_some()
    }

    /// Evict every entry unused for longer than its retention. Entries
    /// with a fetch in flight are kept. Returns the number evicted.
    pub fn collect_garbage(&self) -> usize {
        let mut entries = self.inner.lock();
        evict_expired(&mut entries, Instant::now())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ---- private helpers ----

    fn begin<T, F, Fut>(&self, key: &QueryKey, policy: QueryPolicy, fetcher: F) -> Lookup
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, QueryError>> + Send + 'static,
    {
        let now = Instant::now();
        let mut entries = self.inner.lock();
        evict_expired(&mut entries, now);

        let entry = entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(policy, now));
        entry.policy = policy;
        entry.last_used = now;

        if let Some(data) = entry.fresh_data(now) {
            tracing::trace!(key = %key, "Serving fresh query data");
            return Lookup::Fresh(data);
        }

        if let Some(in_flight) = &entry.in_flight {
            tracing::debug!(key = %key, "Joining in-flight query");
            return Lookup::Pending(in_flight.future.clone());
        }

        let id = self.inner.next_fetch_id.fetch_add(1, Ordering::Relaxed);
        let future = self.spawn_fetch(key.clone(), id, policy, fetcher);
        entry.in_flight = Some(InFlight {
            id,
            future: future.clone(),
        });
        Lookup::Pending(future)
    }

    fn spawn_fetch<T, F, Fut>(&self, key: QueryKey, id: u64, policy: QueryPolicy, fetcher: F) -> SharedFetch
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, QueryError>> + Send + 'static,
    {
        tracing::debug!(key = %key, "Fetching query");

        let task_inner = Arc::clone(&self.inner);
        let task_key = key.clone();
        let task = tokio::spawn(async move {
            let result = run_with_retry(&task_key, policy.retry, task_inner.retry, fetcher)
                .await
                .map(|value| Arc::new(value) as AnyValue);
            task_inner.settle(&task_key, id, &result);
            result
        });

        let inner = Arc::clone(&self.inner);
        async move {
            match task.await {
                Ok(result) => result,
                Err(join_err) => {
                    tracing::error!(key = %key, error = %join_err, "Query task ended abnormally");
                    let result = Err(QueryError::Aborted {
                        key: key.to_string(),
                        detail: join_err.to_string(),
                    });
                    inner.settle(&key, id, &result);
                    result
                }
            }
        }
        .boxed()
        .shared()
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryClient")
            .field("entries", &self.len())
            .field("retry", &self.inner.retry)
            .finish()
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the outcome of fetch `id`. Ignored if the entry was removed
    /// or overwritten since the fetch started.
    fn settle(&self, key: &QueryKey, id: u64, result: &Result<AnyValue, QueryError>) {
        let mut entries = self.lock();
        let Some(entry) = entries.get_mut(key) else {
            return;
        };
        if entry.in_flight.as_ref().map(|f| f.id) != Some(id) {
            return;
        }

        let now = Instant::now();
        entry.in_flight = None;
        entry.last_used = now;
        match result {
            Ok(value) => {
                entry.data = Some(value.clone());
                entry.error = None;
                entry.updated_at = Some(now);
                entry.invalidated = false;
            }
            Err(e) => entry.error = Some(e.clone()),
        }
    }
}

impl Entry {
    fn new(policy: QueryPolicy, now: Instant) -> Self {
        Self {
            data: None,
            error: None,
            updated_at: None,
            invalidated: false,
            last_used: now,
            policy,
            in_flight: None,
        }
    }

    fn fresh_data(&self, now: Instant) -> Option<AnyValue> {
        if self.invalidated {
            return None;
        }
        let updated_at = self.updated_at?;
        if self.policy.is_fresh(now.duration_since(updated_at)) {
            self.data.clone()
        } else {
            None
        }
    }
}

fn evict_expired(entries: &mut HashMap<QueryKey, Entry>, now: Instant) -> usize {
    let before = entries.len();
    entries.retain(|key, entry| {
        let keep = entry.in_flight.is_some()
            || !entry.policy.is_expired(now.duration_since(entry.last_used));
        if !keep {
            tracing::debug!(key = %key, "Evicting unused query");
        }
        keep
    });
    before - entries.len()
}

fn downcast<T: Send + Sync + 'static>(key: &QueryKey, value: AnyValue) -> Result<Arc<T>, QueryError> {
    value.downcast::<T>().map_err(|_| QueryError::TypeMismatch {
        key: key.to_string(),
    })
}

async fn run_with_retry<T, F, Fut>(
    key: &QueryKey,
    retries: u32,
    config: RetryConfig,
    fetcher: F,
) -> Result<T, QueryError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, QueryError>>,
{
    let mut delay = config.initial_delay;
    let mut attempt = 0u32;

    loop {
        match fetcher().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < retries && e.is_transient() => {
                attempt += 1;
                tracing::warn!(
                    key = %key,
                    error = %e,
                    delay_ms = delay.as_millis() as u64,
                    "Query attempt {attempt} failed, retrying",
                );
                tokio::time::sleep(delay).await;
                delay = next_delay(delay, &config);
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, attempts = attempt + 1, "Query failed");
                return Err(e);
            }
        }
    }
}
