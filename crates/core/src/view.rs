//! View derivation over fetched catalog collections.
//!
//! Pure functions that turn a cached collection plus ephemeral listing
//! state into the slice the presentation layer renders. Nothing here
//! performs I/O or owns data.

// ---------------------------------------------------------------------------
// Page sizes
// ---------------------------------------------------------------------------

/// Cards per page on the character listing.
pub const CHARACTERS_PAGE_SIZE: usize = 12;

/// Cards per page on the starship listing.
pub const STARSHIPS_PAGE_SIZE: usize = 12;

/// Cards per page on the film listing.
pub const FILMS_PAGE_SIZE: usize = 6;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// An entity with a display name that search matches against.
pub trait Named {
    fn display_name(&self) -> &str;
}

/// An entity with a position in a release sequence.
pub trait Sequenced {
    fn sequence_number(&self) -> i64;
}

// ---------------------------------------------------------------------------
// Filter / sort
// ---------------------------------------------------------------------------

/// Case-insensitive substring match of `query` against each display name.
///
/// An empty query returns the whole collection. Order is preserved.
pub fn filter_by_name<'a, T: Named>(items: &'a [T], query: &str) -> Vec<&'a T> {
    if query.is_empty() {
        return items.iter().collect();
    }
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| item.display_name().to_lowercase().contains(&needle))
        .collect()
}

/// Sort ascending by sequence number, independent of fetch order.
///
/// The sort is stable, so equal sequence numbers keep their fetch order.
pub fn sort_by_sequence<T: Sequenced>(items: &[T]) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|item| item.sequence_number());
    sorted
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Number of pages needed for `count` items. Never less than one, so the
/// current page stays well-defined for an empty collection.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    count.div_ceil(page_size).max(1)
}

/// Clamp a requested 1-based page into `[1, total_pages]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// One page of a derived listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based page actually shown after clamping.
    pub current_page: usize,
    pub total_pages: usize,
    /// Size of the whole (filtered) collection.
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Slice out page `page` (1-based, clamped) of `items`.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let total = total_pages(items.len(), page_size);
    let current = clamp_page(page, total);
    let start = ((current - 1) * page_size).min(items.len());
    let end = (start + page_size).min(items.len());

    Page {
        items: &items[start..end],
        current_page: current,
        total_pages: total,
        total_items: items.len(),
    }
}

// ---------------------------------------------------------------------------
// Listing state
// ---------------------------------------------------------------------------

/// Ephemeral per-listing view state: the requested page and search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingState {
    page: usize,
    search: String,
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            page: 1,
            search: String::new(),
        }
    }
}

impl ListingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Replace the search query; always returns to page 1.
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
        self.page = 1;
    }

    /// Jump to `page`, clamped into `[1, total_pages]`.
    pub fn go_to(&mut self, page: usize, total_pages: usize) {
        self.page = clamp_page(page, total_pages);
    }

    pub fn next_page(&mut self, total_pages: usize) {
        self.go_to(self.page.saturating_add(1), total_pages);
    }

    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }
}

/// Filter by the listing's search query, then paginate.
///
/// The filtered references are collected into `scratch` so the returned
/// page can borrow them.
pub fn derive_listing<'s, 'a, T: Named>(
    items: &'a [T],
    state: &ListingState,
    page_size: usize,
    scratch: &'s mut Vec<&'a T>,
) -> Page<'s, &'a T> {
    *scratch = filter_by_name(items, state.search());
    paginate(scratch.as_slice(), state.page(), page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        name: &'static str,
        episode: i64,
    }

    impl Named for Item {
        fn display_name(&self) -> &str {
            self.name
        }
    }

    impl Sequenced for Item {
        fn sequence_number(&self) -> i64 {
            self.episode
        }
    }

    fn item(name: &'static str, episode: i64) -> Item {
        Item { name, episode }
    }

    fn numbered(count: usize) -> Vec<usize> {
        (1..=count).collect()
    }

    // -- filter --------------------------------------------------------------

    #[test]
    fn filter_matches_case_insensitively() {
        let items = vec![item("Luke Skywalker", 0), item("Leia Organa", 0)];
        let filtered = filter_by_name(&items, "luke");
        assert_eq!(filtered, vec![&items[0]]);
    }

    #[test]
    fn filter_matches_substrings() {
        let items = vec![item("Luke Skywalker", 0), item("Anakin Skywalker", 0), item("Han Solo", 0)];
        let filtered = filter_by_name(&items, "SKY");
        assert_eq!(filtered, vec![&items[0], &items[1]]);
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let items = vec![item("Luke Skywalker", 0), item("Leia Organa", 0)];
        let filtered = filter_by_name(&items, "");
        assert_eq!(filtered, vec![&items[0], &items[1]]);
    }

    #[test]
    fn no_match_returns_empty() {
        let items = vec![item("Luke Skywalker", 0)];
        assert!(filter_by_name(&items, "vader").is_empty());
    }

    // -- sort ----------------------------------------------------------------

    #[test]
    fn sorts_by_episode_ascending() {
        let items = vec![item("A New Hope", 4), item("The Phantom Menace", 1), item("Return of the Jedi", 6)];
        let sorted: Vec<i64> = sort_by_sequence(&items).iter().map(|i| i.episode).collect();
        assert_eq!(sorted, vec![1, 4, 6]);
    }

    // -- paginate ------------------------------------------------------------

    #[test]
    fn fourteen_items_make_two_pages() {
        let items = numbered(14);
        let first = paginate(&items, 1, 12);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.items, &items[0..12]);

        let second = paginate(&items, 2, 12);
        assert_eq!(second.items, &[13, 14]);
        assert!(second.has_previous());
        assert!(!second.has_next());
    }

    #[test]
    fn page_past_the_end_clamps_to_last() {
        let items = numbered(14);
        let page = paginate(&items, 3, 12);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.items, &[13, 14]);
    }

    #[test]
    fn page_zero_clamps_to_first() {
        let items = numbered(14);
        assert_eq!(paginate(&items, 0, 12).current_page, 1);
    }

    #[test]
    fn empty_collection_has_one_page() {
        let items: Vec<usize> = Vec::new();
        let page = paginate(&items, 5, 12);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn exact_multiple_has_no_extra_page() {
        assert_eq!(total_pages(12, 12), 1);
        assert_eq!(total_pages(13, 12), 2);
        assert_eq!(total_pages(6, FILMS_PAGE_SIZE), 1);
    }

    // -- listing state -------------------------------------------------------

    #[test]
    fn changing_search_resets_page() {
        let mut state = ListingState::new();
        state.go_to(3, 5);
        assert_eq!(state.page(), 3);
        state.set_search("sky");
        assert_eq!(state.page(), 1);
        assert_eq!(state.search(), "sky");
    }

    #[test]
    fn next_and_previous_clamp() {
        let mut state = ListingState::new();
        state.previous_page();
        assert_eq!(state.page(), 1);
        state.next_page(2);
        state.next_page(2);
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn derive_listing_filters_then_paginates() {
        let items: Vec<Item> = (0..20)
            .map(|i| item(if i % 2 == 0 { "Clone Trooper" } else { "Droid" }, i))
            .collect();
        let mut state = ListingState::new();
        state.set_search("clone");

        let mut scratch = Vec::new();
        let page = derive_listing(&items, &state, 6, &mut scratch);
        assert_eq!(page.total_items, 10);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 6);
        assert!(page.items.iter().all(|i| i.name == "Clone Trooper"));
    }
}
