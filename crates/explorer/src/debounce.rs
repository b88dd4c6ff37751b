//! Trailing-edge debouncer for search input.
//!
//! The callback lives in a single-slot cell. Each [`Debouncer::call`]
//! restarts the timer; when it fires, whatever callback the cell holds at
//! that moment is invoked with the latest value.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Default delay between the last keystroke and the downstream update.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;

pub struct Debouncer<T> {
    delay: Duration,
    callback: Arc<Mutex<Callback<T>>>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, callback: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            delay,
            callback: Arc::new(Mutex::new(Arc::new(callback))),
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace the callback. A timer already running will invoke the new
    /// one.
    pub fn set_callback(&self, callback: impl Fn(T) + Send + Sync + 'static) {
        *lock(&self.callback) = Arc::new(callback);
    }

    /// Schedule `value` for delivery after the delay, cancelling any
    /// earlier scheduled value.
    ///
    /// Must be called from within a tokio runtime.
    pub fn call(&self, value: T) {
        let cell = Arc::clone(&self.callback);
        let delay = self.delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let callback = Arc::clone(&*lock(&cell));
            callback(value);
        });

        if let Some(previous) = lock(&self.pending).replace(task) {
            previous.abort();
        }
    }

    /// Drop the scheduled value, if any.
    pub fn cancel(&self) {
        if let Some(previous) = lock(&self.pending).take() {
            previous.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.pending)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(task) = lock(&self.pending).take() {
            task.abort();
        }
    }
}

impl<T> std::fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer").field("delay", &self.delay).finish()
    }
}

fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
