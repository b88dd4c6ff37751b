//! Listing state driven by debounced search input.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use holonet_core::view::{derive_listing, total_pages, ListingState, Named};

use crate::debounce::Debouncer;

/// One rendered page of a filtered listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingView<'a, T> {
    pub items: Vec<&'a T>,
    pub current_page: usize,
    pub total_pages: usize,
    /// Items matching the search, across all pages.
    pub total_items: usize,
}

/// Page and search state for one listing screen.
pub struct ListingController {
    state: Arc<Mutex<ListingState>>,
    search: Debouncer<String>,
    page_size: usize,
}

impl ListingController {
    pub fn new(page_size: usize, debounce: Duration) -> Self {
        let state = Arc::new(Mutex::new(ListingState::new()));
        let target = Arc::clone(&state);
        let search = Debouncer::new(debounce, move |query: String| {
            tracing::debug!(query = %query, "Search applied");
            lock(&target).set_search(query);
        });
        Self {
            state,
            search,
            page_size,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn debounce(&self) -> Duration {
        self.search.delay()
    }

    /// Record a keystroke. The search (and the reset to page 1) applies
    /// once input has been quiet for the debounce delay.
    ///
    /// Must be called from within a tokio runtime.
    pub fn type_search(&self, query: impl Into<String>) {
        self.search.call(query.into());
    }

    /// Apply a search immediately, discarding any pending keystrokes.
    pub fn set_search(&self, query: impl Into<String>) {
        self.search.cancel();
        lock(&self.state).set_search(query);
    }

    pub fn state(&self) -> ListingState {
        lock(&self.state).clone()
    }

    pub fn next_page(&self, matching_items: usize) {
        lock(&self.state).next_page(total_pages(matching_items, self.page_size));
    }

    pub fn previous_page(&self) {
        lock(&self.state).previous_page();
    }

    pub fn go_to(&self, page: usize, matching_items: usize) {
        lock(&self.state).go_to(page, total_pages(matching_items, self.page_size));
    }

    /// Filter `items` by the applied search and cut out the current page.
    pub fn view<'a, T: Named>(&self, items: &'a [T]) -> ListingView<'a, T> {
        let state = self.state();
        let mut scratch = Vec::new();
        let page = derive_listing(items, &state, self.page_size, &mut scratch);
        ListingView {
            items: page.items.to_vec(),
            current_page: page.current_page,
            total_pages: page.total_pages,
            total_items: page.total_items,
        }
    }
}

impl std::fmt::Debug for ListingController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingController")
            .field("state", &self.state())
            .field("page_size", &self.page_size)
            .finish()
    }
}

fn lock(state: &Mutex<ListingState>) -> MutexGuard<'_, ListingState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
