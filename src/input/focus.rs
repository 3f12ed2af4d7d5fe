//! Single source of truth for "what the remote is pointed at".
//!
//! Exactly one [`FocusTarget`] is current at any time. Writers call
//! [`FocusRegistry::set`] unconditionally; observers are notified
//! synchronously on every write, including writes that repeat the
//! current value. The registry performs no validation of its own -
//! callers are responsible for handing it targets that exist.

use crate::modal::{ModalId, ModalLocalFocus};
use crate::nav::grid::GridSelection;
use crate::screens::ScreenKey;
use tracing::trace;

/// Items on the persistent top navigation bar, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopBarItem {
    Search,
    Movies,
    Series,
    Settings,
}

impl TopBarItem {
    pub fn left(self) -> Self {
        match self {
            Self::Search => Self::Search,
            Self::Movies => Self::Search,
            Self::Series => Self::Movies,
            Self::Settings => Self::Series,
        }
    }

    pub fn right(self) -> Self {
        match self {
            Self::Search => Self::Movies,
            Self::Movies => Self::Series,
            Self::Series => Self::Settings,
            Self::Settings => Self::Settings,
        }
    }
}

/// Focusable positions inside a screen's own content area.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScreenLocalFocus {
    /// The inline search input on a browse screen.
    Search,
    Sort,
    Filters,
    Grid(GridSelection),
    /// Top action button on a person screen.
    Top,
    ReadMore,
    KnownFor(usize),
    Crew(usize),
}

/// Where input is currently routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusTarget {
    TopBar(TopBarItem),
    Screen {
        key: ScreenKey,
        local: ScreenLocalFocus,
    },
    Modal {
        id: ModalId,
        local: ModalLocalFocus,
    },
}

impl FocusTarget {
    pub fn is_modal(&self) -> bool {
        matches!(self, Self::Modal { .. })
    }

    pub fn screen_key(&self) -> Option<&ScreenKey> {
        match self {
            Self::Screen { key, .. } => Some(key),
            _ => None,
        }
    }
}

type Observer = Box<dyn Fn(&FocusTarget) + Send>;

/// Owns the current focus target and fans writes out to observers.
pub struct FocusRegistry {
    current: FocusTarget,
    observers: Vec<Observer>,
}

impl FocusRegistry {
    pub fn new(initial: FocusTarget) -> Self {
        Self {
            current: initial,
            observers: Vec::new(),
        }
    }

    pub fn get(&self) -> &FocusTarget {
        &self.current
    }

    /// Replace the current target and notify every observer, even when the
    /// new target equals the old one. Redundant writes are how callers
    /// re-assert focus after an external widget steals it.
    pub fn set(&mut self, target: FocusTarget) {
        trace!(?target, "focus set");
        self.current = target;
        for observer in &self.observers {
            observer(&self.current);
        }
    }

    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: Fn(&FocusTarget) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }
}

impl std::fmt::Debug for FocusRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusRegistry")
            .field("current", &self.current)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn top_bar(item: TopBarItem) -> FocusTarget {
        FocusTarget::TopBar(item)
    }

    #[test]
    fn test_set_replaces_current() {
        let mut registry = FocusRegistry::new(top_bar(TopBarItem::Movies));
        registry.set(top_bar(TopBarItem::Settings));
        assert_eq!(registry.get(), &top_bar(TopBarItem::Settings));
    }

    #[test]
    fn test_redundant_set_still_notifies() {
        let mut registry = FocusRegistry::new(top_bar(TopBarItem::Movies));
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        registry.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        registry.set(top_bar(TopBarItem::Movies));
        registry.set(top_bar(TopBarItem::Movies));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_observers_see_new_value() {
        let mut registry = FocusRegistry::new(top_bar(TopBarItem::Search));
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = hits.clone();
        registry.subscribe(move |target| {
            assert_eq!(target, &FocusTarget::TopBar(TopBarItem::Series));
            seen.fetch_add(1, Ordering::SeqCst);
        });
        registry.set(top_bar(TopBarItem::Series));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_top_bar_edges_saturate() {
        assert_eq!(TopBarItem::Search.left(), TopBarItem::Search);
        assert_eq!(TopBarItem::Settings.right(), TopBarItem::Settings);
        assert_eq!(TopBarItem::Movies.right(), TopBarItem::Series);
    }
}
