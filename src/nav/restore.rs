//! Two-phase scroll and selection restoration.
//!
//! A screen coming back from a details view cannot restore immediately:
//! its item list reloads page by page, and committing a selection before
//! the target item exists would clamp it to whatever happens to be loaded.
//! Phase one captures what is needed from the [`PositionStore`]; phase two
//! polls as data arrives and commits exactly once.

use crate::nav::grid::GridSelection;
use crate::nav::position::PositionStore;
use crate::screens::ScreenKey;
use tracing::debug;

/// Result of starting restoration for a screen mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreStart {
    /// Nothing to restore: the screen starts fresh at the origin.
    Fresh,
    /// Restoration is pending until enough data has loaded.
    Pending(PendingRestore),
}

/// Captured restoration intent, polled as pages arrive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRestore {
    pub key: ScreenKey,
    pub selection: GridSelection,
    pub scroll_index: usize,
    pub scroll_offset: i32,
    columns: usize,
}

/// Outcome of one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestorePoll {
    /// Not enough items yet; keep loading.
    Wait,
    /// Restore scroll and selection exactly as saved.
    Commit {
        scroll_index: usize,
        scroll_offset: i32,
        selection: GridSelection,
    },
    /// The saved item no longer exists; land at the origin instead.
    Fallback,
}

/// Begin restoration for `key`. Only screens flagged as returning from a
/// details view with a saved selection restore; everything else is fresh.
pub fn begin(key: &ScreenKey, store: &PositionStore, columns: usize) -> RestoreStart {
    if !store.is_returning_from_details(key) {
        return RestoreStart::Fresh;
    }
    let Some(selection) = store.saved_selection(key) else {
        return RestoreStart::Fresh;
    };
    let (scroll_index, scroll_offset) = store.saved_position(key).unwrap_or((0, 0));
    debug!(key = %key, ?selection, scroll_index, "restoration pending");
    RestoreStart::Pending(PendingRestore {
        key: key.clone(),
        selection,
        scroll_index,
        scroll_offset,
        columns,
    })
}

impl PendingRestore {
    /// Number of items that must be loaded before the saved selection is
    /// addressable.
    pub fn needed(&self) -> usize {
        self.selection.linear_index(self.columns) + 1
    }

    /// Check loaded data against the saved selection. `complete` means the
    /// source has no more items to give; once set, a still-missing target
    /// falls back instead of waiting forever.
    pub fn poll(&self, available: usize, complete: bool) -> RestorePoll {
        if available >= self.needed() {
            RestorePoll::Commit {
                scroll_index: self.scroll_index,
                scroll_offset: self.scroll_offset,
                selection: self.selection,
            }
        } else if complete {
            debug!(key = %self.key, available, needed = self.needed(), "restore fallback");
            RestorePoll::Fallback
        } else {
            RestorePoll::Wait
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store_with_saved(selection: GridSelection, returning: bool) -> PositionStore {
        let mut store = PositionStore::new();
        let key = ScreenKey::browse_movies();
        store.save_selection(&key, selection);
        store.save_position(&key, 40, -6);
        if returning {
            store.mark_returning_from_details(&key);
        }
        store
    }

    #[test]
    fn test_fresh_when_not_returning() {
        let store = store_with_saved(GridSelection::new(5, 2), false);
        assert_eq!(begin(&ScreenKey::browse_movies(), &store, 4), RestoreStart::Fresh);
    }

    #[test]
    fn test_fresh_when_no_selection_saved() {
        let mut store = PositionStore::new();
        let key = ScreenKey::browse_movies();
        store.mark_returning_from_details(&key);
        assert_eq!(begin(&key, &store, 4), RestoreStart::Fresh);
    }

    #[test]
    fn test_waits_until_target_loaded_then_commits() {
        let store = store_with_saved(GridSelection::new(5, 2), true);
        let RestoreStart::Pending(pending) = begin(&ScreenKey::browse_movies(), &store, 4) else {
            panic!("expected pending restore");
        };
        // Selection at row 5 col 2 of a 4-column grid needs 23 items.
        assert_eq!(pending.needed(), 23);
        assert_eq!(pending.poll(20, false), RestorePoll::Wait);
        assert_eq!(
            pending.poll(24, false),
            RestorePoll::Commit {
                scroll_index: 40,
                scroll_offset: -6,
                selection: GridSelection::new(5, 2),
            }
        );
    }

    #[test]
    fn test_falls_back_when_source_exhausts_short() {
        let store = store_with_saved(GridSelection::new(5, 2), true);
        let RestoreStart::Pending(pending) = begin(&ScreenKey::browse_movies(), &store, 4) else {
            panic!("expected pending restore");
        };
        assert_eq!(pending.poll(20, true), RestorePoll::Fallback);
    }

    #[test]
    fn test_commit_wins_even_when_complete() {
        let store = store_with_saved(GridSelection::new(0, 1), true);
        let RestoreStart::Pending(pending) = begin(&ScreenKey::browse_movies(), &store, 4) else {
            panic!("expected pending restore");
        };
        assert!(matches!(pending.poll(2, true), RestorePoll::Commit { .. }));
    }
}
