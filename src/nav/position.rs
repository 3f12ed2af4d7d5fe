//! Per-screen position persistence.
//!
//! Screens are torn down when the user drills into details; this store
//! keeps enough state to rebuild them exactly as they were. Entries live
//! for the process lifetime and are keyed by [`ScreenKey`], so two browse
//! screens never clobber each other's scroll state.

use crate::nav::grid::GridSelection;
use crate::screens::{FilterSet, ScreenKey, SortKey};
use std::collections::HashMap;
use tracing::debug;

/// Everything remembered about one screen between visits.
#[derive(Debug, Clone, Default)]
pub struct PersistedScreenState {
    /// First visible item index in the scrolled grid.
    pub scroll_index: usize,
    /// Pixel/cell offset within the first visible row.
    pub scroll_offset: i32,
    pub selection: Option<GridSelection>,
    pub filters: Option<FilterSet>,
    pub sort_key: Option<SortKey>,
    /// Set when the user drilled into a details view from this screen;
    /// cleared once restoration commits or falls back.
    pub returning_from_child: bool,
}

#[derive(Debug, Default)]
pub struct PositionStore {
    entries: HashMap<ScreenKey, PersistedScreenState>,
}

impl PositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, key: &ScreenKey) -> &mut PersistedScreenState {
        self.entries.entry(key.clone()).or_default()
    }

    /// Validate and record a selection change in one step. Returns false
    /// and leaves the stored state untouched when the selection does not
    /// address a real item.
    pub fn request_position_change(
        &mut self,
        key: &ScreenKey,
        selection: GridSelection,
        columns: usize,
        total_items: usize,
    ) -> bool {
        if columns == 0 || selection.linear_index(columns) >= total_items {
            debug!(key = %key, ?selection, total_items, "rejected out-of-range selection");
            return false;
        }
        self.entry(key).selection = Some(selection);
        true
    }

    pub fn save_position(&mut self, key: &ScreenKey, scroll_index: usize, scroll_offset: i32) {
        let state = self.entry(key);
        state.scroll_index = scroll_index;
        state.scroll_offset = scroll_offset;
    }

    pub fn save_selection(&mut self, key: &ScreenKey, selection: GridSelection) {
        self.entry(key).selection = Some(selection);
    }

    pub fn save_filters(&mut self, key: &ScreenKey, filters: FilterSet) {
        self.entry(key).filters = Some(filters);
    }

    pub fn save_sort(&mut self, key: &ScreenKey, sort: SortKey) {
        self.entry(key).sort_key = Some(sort);
    }

    pub fn mark_returning_from_details(&mut self, key: &ScreenKey) {
        self.entry(key).returning_from_child = true;
    }

    pub fn clear_returning_flag(&mut self, key: &ScreenKey) {
        if let Some(state) = self.entries.get_mut(key) {
            state.returning_from_child = false;
        }
    }

    pub fn is_returning_from_details(&self, key: &ScreenKey) -> bool {
        self.entries
            .get(key)
            .map(|s| s.returning_from_child)
            .unwrap_or(false)
    }

    pub fn saved_position(&self, key: &ScreenKey) -> Option<(usize, i32)> {
        self.entries
            .get(key)
            .map(|s| (s.scroll_index, s.scroll_offset))
    }

    pub fn saved_selection(&self, key: &ScreenKey) -> Option<GridSelection> {
        self.entries.get(key).and_then(|s| s.selection)
    }

    pub fn saved_filters(&self, key: &ScreenKey) -> Option<&FilterSet> {
        self.entries.get(key).and_then(|s| s.filters.as_ref())
    }

    pub fn saved_sort(&self, key: &ScreenKey) -> Option<SortKey> {
        self.entries.get(key).and_then(|s| s.sort_key)
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_position_round_trips_per_key() {
        let mut store = PositionStore::new();
        store.save_position(&ScreenKey::browse_movies(), 24, -12);
        store.save_position(&ScreenKey::browse_series(), 8, 0);

        assert_eq!(store.saved_position(&ScreenKey::browse_movies()), Some((24, -12)));
        assert_eq!(store.saved_position(&ScreenKey::browse_series()), Some((8, 0)));
    }

    #[test]
    fn test_request_position_change_rejects_out_of_range() {
        let mut store = PositionStore::new();
        let key = ScreenKey::browse_movies();
        store.save_selection(&key, GridSelection::new(0, 1));

        // row 2, col 2 in a 4-column, 10-item grid addresses index 10.
        assert!(!store.request_position_change(&key, GridSelection::new(2, 2), 4, 10));
        assert_eq!(store.saved_selection(&key), Some(GridSelection::new(0, 1)));

        assert!(store.request_position_change(&key, GridSelection::new(2, 1), 4, 10));
        assert_eq!(store.saved_selection(&key), Some(GridSelection::new(2, 1)));
    }

    #[test]
    fn test_returning_flag_lifecycle() {
        let mut store = PositionStore::new();
        let key = ScreenKey::browse_movies();
        assert!(!store.is_returning_from_details(&key));

        store.mark_returning_from_details(&key);
        assert!(store.is_returning_from_details(&key));

        store.clear_returning_flag(&key);
        assert!(!store.is_returning_from_details(&key));
    }

    #[test]
    fn test_clear_flag_on_unknown_key_is_noop() {
        let mut store = PositionStore::new();
        store.clear_returning_flag(&ScreenKey::browse_movies());
        assert_eq!(store.saved_position(&ScreenKey::browse_movies()), None);
    }

    #[test]
    fn test_filters_and_sort_persist() {
        let mut store = PositionStore::new();
        let key = ScreenKey::browse_movies();
        store.save_sort(&key, SortKey::YearDesc);
        let filters = FilterSet {
            genres: vec!["Drama".into()],
            ..Default::default()
        };
        store.save_filters(&key, filters.clone());

        assert_eq!(store.saved_sort(&key), Some(SortKey::YearDesc));
        assert_eq!(store.saved_filters(&key), Some(&filters));
    }

    #[test]
    fn test_clear_all_empties_store() {
        let mut store = PositionStore::new();
        store.save_position(&ScreenKey::browse_movies(), 3, 0);
        store.clear_all();
        assert_eq!(store.saved_position(&ScreenKey::browse_movies()), None);
    }
}
