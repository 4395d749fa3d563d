//! Client-side filtered and paginated collection.
//!
//! `ListViewState` holds the collection fetched once from a gateway and
//! derives the filtered view and the current page on every read. All writes go
//! through methods that re-clamp `page_index`, so
//! `page_index < page_count()` holds after any change to the source, the
//! filters or the page size.

pub mod in_flight;

pub use in_flight::InFlight;

use contracts::domain::common::{EntityId, Identified};
use std::fmt::Debug;

/// Either every value passes, or only the given one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T: PartialEq> Choice<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(expected) => expected == value,
        }
    }
}

/// Trait для записей, отображаемых в фильтруемом списке
pub trait ListFilter: Identified + Clone + Debug + Send + Sync + 'static {
    /// Mandatory exclusive status (active/inactive, workflow status...)
    type Status: Copy + PartialEq + Debug + Send + Sync + 'static;
    /// Optional narrowing category (role, priority...)
    type Category: Copy + PartialEq + Debug + Send + Sync + 'static;

    fn status(&self) -> Self::Status;

    fn category(&self) -> Option<Self::Category>;

    /// Fields matched against the search term
    fn search_fields(&self) -> Vec<&str>;
}

/// Records that are soft-deleted instead of removed
pub trait SoftDelete {
    fn set_deleted(&mut self, deleted: bool);
}

/// 1-based inclusive range of the rows shown, `(0, 0)` for an empty view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    pub start: usize,
    pub end: usize,
}

impl VisibleRange {
    pub fn is_empty(&self) -> bool {
        self.start == 0 && self.end == 0
    }
}

#[derive(Debug, Clone)]
pub struct ListViewState<T: ListFilter> {
    source: Vec<T>,
    status_filter: Choice<T::Status>,
    category_filter: Choice<T::Category>,
    search_term: String,
    page_size: usize,
    page_index: usize,
}

impl<T: ListFilter> ListViewState<T> {
    pub fn new(status_filter: Choice<T::Status>, page_size: usize) -> Self {
        Self {
            source: Vec::new(),
            status_filter,
            category_filter: Choice::All,
            search_term: String::new(),
            page_size: page_size.max(1),
            page_index: 0,
        }
    }

    // ---- read side ----

    pub fn source(&self) -> &[T] {
        &self.source
    }

    pub fn status_filter(&self) -> Choice<T::Status> {
        self.status_filter
    }

    pub fn category_filter(&self) -> Choice<T::Category> {
        self.category_filter
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Source after status, category and search predicates, in that order.
    pub fn filtered(&self) -> Vec<&T> {
        let needle = self.search_term.trim().to_lowercase();
        self.source
            .iter()
            .filter(|item| self.status_filter.admits(&item.status()))
            .filter(|item| match self.category_filter {
                Choice::All => true,
                Choice::Only(category) => item.category() == Some(category),
            })
            .filter(|item| {
                needle.is_empty()
                    || item
                        .search_fields()
                        .iter()
                        .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered().len()
    }

    pub fn page_count(&self) -> usize {
        page_count(self.filtered_count(), self.page_size)
    }

    /// Rows of the current page.
    pub fn page(&self) -> Vec<T> {
        let start = self.page_index * self.page_size;
        self.filtered()
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect()
    }

    pub fn visible_range(&self) -> VisibleRange {
        let count = self.filtered_count();
        if count == 0 {
            return VisibleRange { start: 0, end: 0 };
        }
        let offset = self.page_index * self.page_size;
        VisibleRange {
            start: offset + 1,
            end: (offset + self.page_size).min(count),
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.page_index + 1 < self.page_count()
    }

    pub fn find(&self, id: EntityId) -> Option<&T> {
        self.source.iter().find(|item| item.id() == id)
    }

    // ---- filters and navigation ----

    pub fn set_status_filter(&mut self, value: Choice<T::Status>) {
        self.status_filter = value;
        self.reset_page();
    }

    pub fn set_category_filter(&mut self, value: Choice<T::Category>) {
        self.category_filter = value;
        self.reset_page();
    }

    pub fn set_search_term(&mut self, text: impl Into<String>) {
        self.search_term = text.into();
        self.reset_page();
    }

    /// Returns `false` and leaves the state untouched for a zero size.
    pub fn set_page_size(&mut self, size: usize) -> bool {
        if size == 0 {
            return false;
        }
        self.page_size = size;
        self.reset_page();
        true
    }

    /// Page size typed or selected by the user. Anything that is not a
    /// positive finite number is ignored.
    pub fn set_page_size_input(&mut self, raw: &str) -> bool {
        match parse_page_size(raw) {
            Some(size) => self.set_page_size(size),
            None => false,
        }
    }

    pub fn go_to_page(&mut self, index: usize) {
        self.page_index = index;
        self.clamp_page();
    }

    pub fn next_page(&mut self) {
        if self.can_go_forward() {
            self.page_index += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.can_go_back() {
            self.page_index -= 1;
        }
    }

    // ---- source mutations ----

    /// Replace the whole source. Only used for the initial load.
    pub fn set_source(&mut self, items: Vec<T>) {
        self.source = items;
        self.reset_page();
    }

    pub fn append(&mut self, item: T) {
        self.source.push(item);
        self.clamp_page();
    }

    /// Patch the entity with the given id in place. Returns `false` when it
    /// is not in the source.
    pub fn patch(&mut self, id: EntityId, f: impl FnOnce(&mut T)) -> bool {
        let patched = match self.source.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                f(item);
                true
            }
            None => false,
        };
        self.clamp_page();
        patched
    }

    pub fn replace(&mut self, item: T) -> bool {
        let id = item.id();
        self.patch(id, move |existing| *existing = item)
    }

    fn reset_page(&mut self) {
        self.page_index = 0;
        self.clamp_page();
    }

    fn clamp_page(&mut self) {
        let last = self.page_count() - 1;
        if self.page_index > last {
            self.page_index = last;
        }
    }
}

impl<T: ListFilter + SoftDelete> ListViewState<T> {
    pub fn soft_delete(&mut self, id: EntityId) -> bool {
        self.patch(id, |item| item.set_deleted(true))
    }

    pub fn reactivate(&mut self, id: EntityId) -> bool {
        self.patch(id, |item| item.set_deleted(false))
    }
}

/// `max(ceil(count / page_size), 1)`
pub fn page_count(count: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    count.div_ceil(page_size).max(1)
}

pub fn parse_page_size(raw: &str) -> Option<usize> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() || value < 1.0 {
        return None;
    }
    Some(value.trunc() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: EntityId,
        name: String,
        group: Option<u8>,
        deleted: bool,
    }

    impl Identified for Item {
        fn id(&self) -> EntityId {
            self.id
        }
    }

    impl ListFilter for Item {
        type Status = bool;
        type Category = u8;

        fn status(&self) -> bool {
            !self.deleted
        }

        fn category(&self) -> Option<u8> {
            self.group
        }

        fn search_fields(&self) -> Vec<&str> {
            vec![self.name.as_str()]
        }
    }

    impl SoftDelete for Item {
        fn set_deleted(&mut self, deleted: bool) {
            self.deleted = deleted;
        }
    }

    fn items(n: usize) -> Vec<Item> {
        (1..=n)
            .map(|i| Item {
                id: i as EntityId,
                name: format!("item-{i:02}"),
                group: Some((i % 3) as u8),
                deleted: false,
            })
            .collect()
    }

    fn active_state(n: usize, page_size: usize) -> ListViewState<Item> {
        let mut state = ListViewState::new(Choice::Only(true), page_size);
        state.set_source(items(n));
        state
    }

    fn assert_invariant(state: &ListViewState<Item>) {
        assert!(state.page_index() < state.page_count());
    }

    #[test]
    fn test_twelve_items_two_pages() {
        let mut state = active_state(12, 10);
        assert_eq!(state.page_count(), 2);
        let ids: Vec<EntityId> = state.page().iter().map(|i| i.id).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
        assert!(state.can_go_forward());
        assert!(!state.can_go_back());

        state.next_page();
        assert_eq!(state.page_index(), 1);
        let ids: Vec<EntityId> = state.page().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![11, 12]);
        assert!(!state.can_go_forward());
        assert_eq!(state.visible_range(), VisibleRange { start: 11, end: 12 });

        state.next_page();
        assert_eq!(state.page_index(), 1);
    }

    #[test]
    fn test_prev_page_is_noop_on_first_page() {
        let mut state = active_state(5, 10);
        state.prev_page();
        assert_eq!(state.page_index(), 0);
    }

    #[test]
    fn test_filter_changes_reset_page() {
        let mut state = active_state(30, 5);
        state.go_to_page(3);
        state.set_search_term("item");
        assert_eq!(state.page_index(), 0);

        state.go_to_page(2);
        state.set_category_filter(Choice::Only(1));
        assert_eq!(state.page_index(), 0);

        state.go_to_page(1);
        state.set_status_filter(Choice::All);
        assert_eq!(state.page_index(), 0);
    }

    #[test]
    fn test_search_is_trimmed_and_case_insensitive() {
        let mut state = active_state(12, 10);
        state.set_search_term("  ITEM-1 ");
        let ids: Vec<EntityId> = state.filtered().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
        state.set_search_term("   ");
        assert_eq!(state.filtered_count(), 12);
    }

    #[test]
    fn test_category_narrows() {
        let mut state = active_state(9, 10);
        state.set_category_filter(Choice::Only(0));
        let ids: Vec<EntityId> = state.filtered().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 6, 9]);
    }

    #[test]
    fn test_visible_range_empty() {
        let mut state = active_state(4, 10);
        state.set_search_term("nothing matches");
        assert_eq!(state.filtered_count(), 0);
        assert!(state.visible_range().is_empty());
        assert_eq!(state.page_count(), 1);
        assert_eq!(state.page_index(), 0);
    }

    #[test]
    fn test_visible_range_formula() {
        let mut state = active_state(23, 10);
        assert_eq!(state.visible_range(), VisibleRange { start: 1, end: 10 });
        state.go_to_page(2);
        assert_eq!(state.visible_range(), VisibleRange { start: 21, end: 23 });
    }

    #[test]
    fn test_invalid_page_size_input_is_ignored() {
        let mut state = active_state(30, 10);
        state.go_to_page(2);
        for raw in ["abc", "-5", "0", "", "NaN", "inf"] {
            assert!(!state.set_page_size_input(raw));
            assert_eq!(state.page_size(), 10);
            assert_eq!(state.page_index(), 2);
        }
        assert!(state.set_page_size_input("25"));
        assert_eq!(state.page_size(), 25);
        assert_eq!(state.page_index(), 0);
    }

    #[test]
    fn test_go_to_page_clamps() {
        let mut state = active_state(12, 5);
        state.go_to_page(99);
        assert_eq!(state.page_index(), 2);
    }

    #[test]
    fn test_page_reclamped_when_source_shrinks_view() {
        let mut state = active_state(11, 5);
        state.go_to_page(2);
        assert_eq!(state.page().len(), 1);
        // deleting the only row of the last page pulls the index back
        assert!(state.soft_delete(11));
        assert_eq!(state.page_index(), 1);
        assert_invariant(&state);
    }

    #[test]
    fn test_soft_delete_moves_between_status_views() {
        let mut state = active_state(6, 10);
        let before: Vec<Item> = state.source().to_vec();

        assert!(state.soft_delete(4));
        assert_eq!(state.source().len(), 6);
        for (old, new) in before.iter().zip(state.source()) {
            if old.id == 4 {
                assert!(new.deleted);
                assert_eq!(old.name, new.name);
            } else {
                assert_eq!(old, new);
            }
        }
        assert!(state.filtered().iter().all(|i| i.id != 4));

        state.set_status_filter(Choice::Only(false));
        let ids: Vec<EntityId> = state.filtered().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![4]);

        assert!(state.reactivate(4));
        assert_eq!(state.filtered_count(), 0);
    }

    #[test]
    fn test_patch_unknown_id() {
        let mut state = active_state(3, 10);
        assert!(!state.patch(42, |i| i.name.clear()));
        assert_eq!(state.source().len(), 3);
    }

    #[test]
    fn test_invariant_over_mixed_sequence() {
        let mut state = active_state(37, 10);
        for round in 0..40usize {
            match round % 8 {
                0 => state.go_to_page(round),
                1 => state.next_page(),
                2 => {
                    state.set_page_size(1 + round % 7);
                }
                3 => {
                    state.soft_delete((round % 37 + 1) as EntityId);
                }
                4 => state.set_search_term(if round % 3 == 0 { "item-1" } else { "" }),
                5 => state.set_category_filter(if round % 2 == 0 {
                    Choice::All
                } else {
                    Choice::Only((round % 3) as u8)
                }),
                6 => {
                    state.go_to_page(usize::MAX / 2);
                }
                _ => state.append(Item {
                    id: 100 + round as EntityId,
                    name: format!("extra-{round}"),
                    group: None,
                    deleted: false,
                }),
            }
            assert_invariant(&state);
        }
    }

    #[test]
    fn test_page_count_helper() {
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(5, 0), 5);
    }
}
