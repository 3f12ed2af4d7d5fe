//! Screen-level navigation routing.
//!
//! Each screen describes its focusable sections and the directional moves
//! between them as plain data in a [`ScreenConfig`]; the router interprets
//! that table against the current focus. Keys with no table entry are
//! dropped silently, so a half-registered screen can never panic the input
//! path.

use crate::event::NavKey;
use crate::input::ScreenLocalFocus;
use crate::nav::grid::{self, GridSelection};
use crate::screens::ScreenKey;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Coarse focusable regions of a screen. `Grid`, `KnownFor`, and `Crew`
/// carry their own inner index in [`ScreenLocalFocus`]; the transition
/// table only deals in regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Sentinel sink: a transition into `TopBar` leaves the screen.
    TopBar,
    Search,
    Sort,
    Filters,
    Grid,
    Top,
    ReadMore,
    KnownFor,
    Crew,
}

impl Section {
    fn of(local: &ScreenLocalFocus) -> Self {
        match local {
            ScreenLocalFocus::Search => Self::Search,
            ScreenLocalFocus::Sort => Self::Sort,
            ScreenLocalFocus::Filters => Self::Filters,
            ScreenLocalFocus::Grid(_) => Self::Grid,
            ScreenLocalFocus::Top => Self::Top,
            ScreenLocalFocus::ReadMore => Self::ReadMore,
            ScreenLocalFocus::KnownFor(_) => Self::KnownFor,
            ScreenLocalFocus::Crew(_) => Self::Crew,
        }
    }
}

/// Declarative description of one screen's navigable surface.
#[derive(Debug, Clone)]
pub struct ScreenConfig {
    pub key: ScreenKey,
    pub sections: Vec<Section>,
    pub transitions: HashMap<(Section, NavKey), Section>,
    pub columns: usize,
    pub total_items: usize,
    pub known_for_len: usize,
    pub crew_len: usize,
    /// Where focus lands when the screen is entered fresh.
    pub default_entry: ScreenLocalFocus,
}

impl ScreenConfig {
    pub fn has_section(&self, section: Section) -> bool {
        self.sections.contains(&section)
    }
}

/// What the router decided for a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Move focus within the screen (possibly to the same place).
    Focus(ScreenLocalFocus),
    /// Focus leaves the screen upward into the top bar.
    ExitTop,
    /// Enter pressed on a focusable: the app decides what activation means.
    Activate(ScreenLocalFocus),
    /// Back pressed with screen focus: the app unwinds navigation history.
    Back,
}

/// Holds the registered [`ScreenConfig`]s and routes keys against the
/// currently active one.
#[derive(Debug, Default)]
pub struct ScreenRouter {
    configs: HashMap<ScreenKey, ScreenConfig>,
    current: Option<ScreenKey>,
}

impl ScreenRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a screen and make it current. Re-registering an existing
    /// key replaces its config, which is how screens publish changed item
    /// counts after data loads.
    pub fn register_screen(&mut self, config: ScreenConfig) {
        debug!(key = %config.key, total = config.total_items, "register screen");
        let key = config.key.clone();
        self.configs.insert(key.clone(), config);
        self.current = Some(key);
    }

    /// Remove a screen's config, but only when it is the current one.
    /// Returns the removed config so a modal can re-register it on close.
    pub fn unregister_screen(&mut self, key: &ScreenKey) -> Option<ScreenConfig> {
        if self.current.as_ref() != Some(key) {
            return None;
        }
        self.current = None;
        self.configs.remove(key)
    }

    /// Point the router at an already-registered screen. Unknown keys are
    /// ignored so a stale ping cannot route input at a dead screen.
    pub fn set_current_route(&mut self, key: &ScreenKey) {
        if self.configs.contains_key(key) {
            self.current = Some(key.clone());
        } else {
            warn!(key = %key, "set_current_route for unregistered screen");
        }
    }

    pub fn current_route(&self) -> Option<&ScreenKey> {
        self.current.as_ref()
    }

    pub fn current_config(&self) -> Option<&ScreenConfig> {
        self.configs.get(self.current.as_ref()?)
    }

    /// Route one navigation key against the focus `local`. `None` means no
    /// screen is current or the table has no entry; the caller drops the
    /// key.
    pub fn dispatch(&self, key: NavKey, local: &ScreenLocalFocus) -> Option<RouteOutcome> {
        let config = self.current_config()?;
        let section = Section::of(local);

        match key {
            NavKey::Enter => {
                // Entering an empty grid is consumed without effect.
                if section == Section::Grid && config.total_items == 0 {
                    return Some(RouteOutcome::Focus(local.clone()));
                }
                return Some(RouteOutcome::Activate(local.clone()));
            }
            NavKey::Back => return Some(RouteOutcome::Back),
            _ => {}
        }

        // Intra-grid movement stays inside the grid unless the move is a
        // boundary no-op matched by a table entry (e.g. Up from row 0).
        if let ScreenLocalFocus::Grid(sel) = local {
            if let Some(outcome) = self.route_grid(config, key, *sel) {
                return Some(outcome);
            }
        }

        if let ScreenLocalFocus::KnownFor(i) = local {
            if let Some(outcome) = Self::route_strip(key, *i, config.known_for_len) {
                return Some(outcome.map_index(ScreenLocalFocus::KnownFor));
            }
        }
        if let ScreenLocalFocus::Crew(i) = local {
            if let Some(outcome) = Self::route_strip(key, *i, config.crew_len) {
                return Some(outcome.map_index(ScreenLocalFocus::Crew));
            }
        }

        let target = *config.transitions.get(&(section, key))?;
        Some(self.enter_section(config, target, local))
    }

    fn route_grid(
        &self,
        config: &ScreenConfig,
        key: NavKey,
        sel: GridSelection,
    ) -> Option<RouteOutcome> {
        let (total, cols) = (config.total_items, config.columns);
        if total == 0 || cols == 0 {
            return None;
        }
        let next = match key {
            NavKey::Up => {
                if sel.row == 0 {
                    // Leaving the grid upward is a table decision.
                    return None;
                }
                grid::up(sel, total, cols)
            }
            NavKey::Down => {
                if sel.row == grid::max_row(total, cols) {
                    return None;
                }
                grid::down(sel, total, cols)
            }
            NavKey::Left => {
                if sel.row == 0 && sel.col == 0 {
                    return None;
                }
                grid::left(sel, total, cols)
            }
            NavKey::Right => {
                let moved = grid::right(sel, total, cols);
                if moved == sel {
                    return None;
                }
                moved
            }
            NavKey::Enter | NavKey::Back => return None,
        };
        Some(RouteOutcome::Focus(ScreenLocalFocus::Grid(next)))
    }

    /// Horizontal strips (known-for and crew cards) move Left/Right and
    /// saturate at both ends; Up/Down fall through to the table.
    fn route_strip(key: NavKey, index: usize, len: usize) -> Option<StripMove> {
        if len == 0 {
            return None;
        }
        match key {
            NavKey::Left if index > 0 => Some(StripMove(index - 1)),
            NavKey::Left => Some(StripMove(index)),
            NavKey::Right => Some(StripMove((index + 1).min(len - 1))),
            _ => None,
        }
    }

    fn enter_section(
        &self,
        config: &ScreenConfig,
        target: Section,
        from: &ScreenLocalFocus,
    ) -> RouteOutcome {
        match target {
            Section::TopBar => RouteOutcome::ExitTop,
            Section::Search => RouteOutcome::Focus(ScreenLocalFocus::Search),
            Section::Sort => RouteOutcome::Focus(ScreenLocalFocus::Sort),
            Section::Filters => RouteOutcome::Focus(ScreenLocalFocus::Filters),
            Section::Top => RouteOutcome::Focus(ScreenLocalFocus::Top),
            Section::ReadMore => RouteOutcome::Focus(ScreenLocalFocus::ReadMore),
            Section::KnownFor => RouteOutcome::Focus(ScreenLocalFocus::KnownFor(0)),
            Section::Crew => RouteOutcome::Focus(ScreenLocalFocus::Crew(0)),
            Section::Grid => {
                if config.total_items == 0 {
                    // Nothing to land on: stay where we are.
                    return RouteOutcome::Focus(from.clone());
                }
                // Entering the grid keeps the column when coming from a
                // previous grid position, otherwise starts at the origin.
                let sel = match from {
                    ScreenLocalFocus::Grid(sel) => *sel,
                    _ => GridSelection::default(),
                };
                RouteOutcome::Focus(ScreenLocalFocus::Grid(grid::clamp(
                    sel,
                    config.total_items,
                    config.columns,
                )))
            }
        }
    }
}

struct StripMove(usize);

impl StripMove {
    fn map_index(self, f: impl Fn(usize) -> ScreenLocalFocus) -> RouteOutcome {
        RouteOutcome::Focus(f(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn browse_config(total: usize) -> ScreenConfig {
        let mut transitions = HashMap::new();
        transitions.insert((Section::Search, NavKey::Up), Section::TopBar);
        transitions.insert((Section::Search, NavKey::Down), Section::Grid);
        transitions.insert((Section::Search, NavKey::Right), Section::Sort);
        transitions.insert((Section::Sort, NavKey::Left), Section::Search);
        transitions.insert((Section::Sort, NavKey::Right), Section::Filters);
        transitions.insert((Section::Sort, NavKey::Up), Section::TopBar);
        transitions.insert((Section::Sort, NavKey::Down), Section::Grid);
        transitions.insert((Section::Filters, NavKey::Left), Section::Sort);
        transitions.insert((Section::Filters, NavKey::Up), Section::TopBar);
        transitions.insert((Section::Filters, NavKey::Down), Section::Grid);
        transitions.insert((Section::Grid, NavKey::Up), Section::Search);
        ScreenConfig {
            key: ScreenKey::browse_movies(),
            sections: vec![Section::Search, Section::Sort, Section::Filters, Section::Grid],
            transitions,
            columns: 4,
            total_items: total,
            known_for_len: 0,
            crew_len: 0,
            default_entry: ScreenLocalFocus::Grid(GridSelection::default()),
        }
    }

    fn router_with(total: usize) -> ScreenRouter {
        let mut router = ScreenRouter::new();
        router.register_screen(browse_config(total));
        router
    }

    #[test]
    fn test_register_makes_current() {
        let router = router_with(10);
        assert_eq!(router.current_route(), Some(&ScreenKey::browse_movies()));
    }

    #[test]
    fn test_unregister_requires_current() {
        let mut router = router_with(10);
        assert!(router.unregister_screen(&ScreenKey::browse_series()).is_none());
        assert_eq!(router.current_route(), Some(&ScreenKey::browse_movies()));
        assert!(router.unregister_screen(&ScreenKey::browse_movies()).is_some());
        assert_eq!(router.current_route(), None);
    }

    #[test]
    fn test_set_current_route_ignores_unknown() {
        let mut router = router_with(10);
        router.set_current_route(&ScreenKey::browse_series());
        assert_eq!(router.current_route(), Some(&ScreenKey::browse_movies()));
    }

    #[test]
    fn test_grid_movement_routes_internally() {
        let router = router_with(10);
        let from = ScreenLocalFocus::Grid(GridSelection::new(0, 0));
        assert_eq!(
            router.dispatch(NavKey::Right, &from),
            Some(RouteOutcome::Focus(ScreenLocalFocus::Grid(GridSelection::new(0, 1))))
        );
    }

    #[test]
    fn test_grid_top_edge_follows_table() {
        let router = router_with(10);
        let from = ScreenLocalFocus::Grid(GridSelection::new(0, 2));
        assert_eq!(
            router.dispatch(NavKey::Up, &from),
            Some(RouteOutcome::Focus(ScreenLocalFocus::Search))
        );
    }

    #[test]
    fn test_top_bar_sink_exits_screen() {
        let router = router_with(10);
        assert_eq!(
            router.dispatch(NavKey::Up, &ScreenLocalFocus::Search),
            Some(RouteOutcome::ExitTop)
        );
    }

    #[test]
    fn test_missing_table_entry_drops_key() {
        let router = router_with(10);
        // Search has no Left transition.
        assert_eq!(router.dispatch(NavKey::Left, &ScreenLocalFocus::Search), None);
    }

    #[test]
    fn test_enter_activates() {
        let router = router_with(10);
        let from = ScreenLocalFocus::Grid(GridSelection::new(1, 2));
        assert_eq!(
            router.dispatch(NavKey::Enter, &from),
            Some(RouteOutcome::Activate(from.clone()))
        );
    }

    #[test]
    fn test_enter_on_empty_grid_is_consumed_noop() {
        let router = router_with(0);
        let from = ScreenLocalFocus::Grid(GridSelection::default());
        assert_eq!(
            router.dispatch(NavKey::Enter, &from),
            Some(RouteOutcome::Focus(from.clone()))
        );
    }

    #[test]
    fn test_entering_empty_grid_stays_put() {
        let router = router_with(0);
        assert_eq!(
            router.dispatch(NavKey::Down, &ScreenLocalFocus::Search),
            Some(RouteOutcome::Focus(ScreenLocalFocus::Search))
        );
    }

    #[test]
    fn test_entering_grid_clamps_remembered_column() {
        let mut router = ScreenRouter::new();
        // 9 items, 4 columns: last row holds one item.
        router.register_screen(browse_config(9));
        let from = ScreenLocalFocus::Grid(GridSelection::new(2, 3));
        // Re-entering the grid from a stale position clamps in bounds.
        if let Some(RouteOutcome::Focus(ScreenLocalFocus::Grid(sel))) =
            router.dispatch(NavKey::Down, &ScreenLocalFocus::Sort)
        {
            assert!(sel.linear_index(4) < 9);
        } else {
            panic!("expected grid focus");
        }
        // Down from inside the stale selection also clamps.
        let routed = router.dispatch(NavKey::Down, &from);
        assert!(routed.is_none() || matches!(routed, Some(RouteOutcome::Focus(_))));
    }

    #[test]
    fn test_no_current_screen_drops_everything() {
        let router = ScreenRouter::new();
        assert_eq!(router.dispatch(NavKey::Enter, &ScreenLocalFocus::Search), None);
    }
}
