//! Browse screens: a filter bar over a paged poster grid.
//!
//! The movies, series, and search screens are all one type configured
//! differently. The screen owns its item list, the active sort and filter
//! set, and its [`ScreenConfig`]; any change that alters the visible item
//! count republishes the config so the router clamps stale selections.

use crate::data::{catalog::GENRES, MediaItem, PagedList};
use crate::event::NavKey;
use crate::input::ScreenLocalFocus;
use crate::nav::grid::GridSelection;
use crate::nav::{ScreenConfig, Section};
use crate::screens::ScreenKey;
use nucleo::pattern::{CaseMatching, Normalization, Pattern};
use nucleo::{Config, Matcher};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseKind {
    Movies,
    Series,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    TitleAsc,
    TitleDesc,
    YearDesc,
    YearAsc,
}

impl SortKey {
    pub fn next(self) -> Self {
        match self {
            Self::TitleAsc => Self::TitleDesc,
            Self::TitleDesc => Self::YearDesc,
            Self::YearDesc => Self::YearAsc,
            Self::YearAsc => Self::TitleAsc,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TitleAsc => "Title A-Z",
            Self::TitleDesc => "Title Z-A",
            Self::YearDesc => "Newest",
            Self::YearAsc => "Oldest",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub year_from: Option<u16>,
    #[serde(default)]
    pub year_to: Option<u16>,
}

impl FilterSet {
    pub fn matches(&self, item: &MediaItem) -> bool {
        if !self.genres.is_empty() && !self.genres.iter().any(|g| g == &item.genre) {
            return false;
        }
        if let Some(from) = self.year_from {
            if item.year < from {
                return false;
            }
        }
        if let Some(to) = self.year_to {
            if item.year > to {
                return false;
            }
        }
        true
    }

    /// Enter on the filter chip cycles: no filter, then each genre.
    pub fn cycle_genre(&mut self) {
        let next = match self.genres.first().map(String::as_str) {
            None => Some(GENRES[0]),
            Some(current) => {
                let pos = GENRES.iter().position(|g| *g == current);
                match pos {
                    Some(i) if i + 1 < GENRES.len() => Some(GENRES[i + 1]),
                    _ => None,
                }
            }
        };
        self.genres = next.map(|g| vec![g.to_string()]).unwrap_or_default();
    }

    pub fn label(&self) -> String {
        match self.genres.first() {
            Some(genre) => genre.clone(),
            None => "All genres".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct BrowseScreen {
    pub key: ScreenKey,
    pub kind: BrowseKind,
    pub list: PagedList<MediaItem>,
    pub scroll_index: usize,
    pub scroll_offset: i32,
    sort: SortKey,
    filters: FilterSet,
    columns: usize,
    query: String,
    /// Query text typed but not yet applied; committed after the debounce
    /// window elapses without further keystrokes.
    pending_query: Option<(String, Instant)>,
    search_debounce: Duration,
    capturing_search: bool,
    filtered: Vec<MediaItem>,
}

impl BrowseScreen {
    pub fn new(kind: BrowseKind, columns: usize, search_debounce: Duration) -> Self {
        let key = match kind {
            BrowseKind::Movies => ScreenKey::browse_movies(),
            BrowseKind::Series => ScreenKey::browse_series(),
            BrowseKind::Search => ScreenKey::search(),
        };
        Self {
            key,
            kind,
            list: PagedList::new(),
            scroll_index: 0,
            scroll_offset: 0,
            sort: SortKey::default(),
            filters: FilterSet::default(),
            columns,
            query: String::new(),
            pending_query: None,
            search_debounce,
            capturing_search: false,
            filtered: Vec::new(),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn visible(&self) -> &[MediaItem] {
        &self.filtered
    }

    pub fn total_items(&self) -> usize {
        self.filtered.len()
    }

    pub fn item_at(&self, sel: GridSelection) -> Option<&MediaItem> {
        self.filtered.get(sel.linear_index(self.columns))
    }

    /// Restore sort and filters saved from a previous visit.
    pub fn restore_controls(&mut self, sort: Option<SortKey>, filters: Option<FilterSet>) {
        if let Some(sort) = sort {
            self.sort = sort;
        }
        if let Some(filters) = filters {
            self.filters = filters;
        }
        self.refilter();
    }

    pub fn apply_page(&mut self, items: Vec<MediaItem>, end_of_list: bool) {
        self.list.extend_page(items, end_of_list);
        self.refilter();
    }

    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
        self.refilter();
    }

    pub fn cycle_filter(&mut self) {
        self.filters.cycle_genre();
        self.refilter();
    }

    pub fn is_capturing_search(&self) -> bool {
        self.capturing_search
    }

    pub fn begin_search_capture(&mut self) {
        self.capturing_search = true;
    }

    /// Enter or Back while capturing ends capture; any still-pending query
    /// applies immediately rather than waiting out the debounce.
    pub fn end_search_capture(&mut self) {
        self.capturing_search = false;
        if let Some((query, _)) = self.pending_query.take() {
            self.commit_query(query);
        }
    }

    /// Route a navigation key while search capture is active. Enter and
    /// Back end capture (focus stays on the field); everything else is
    /// swallowed so the router never sees keys typed into the query.
    /// Returns false when not capturing.
    pub fn capture_key(&mut self, key: NavKey) -> bool {
        if !self.capturing_search {
            return false;
        }
        if matches!(key, NavKey::Enter | NavKey::Back) {
            self.end_search_capture();
        }
        true
    }

    /// Scroll the grid window so `row` is visible. Returns true when the
    /// first visible row moved.
    pub fn ensure_visible(&mut self, row: usize, viewport_rows: usize) -> bool {
        let rows = viewport_rows.max(1);
        let previous = self.scroll_index;
        if row < self.scroll_index {
            self.scroll_index = row;
        } else if row >= self.scroll_index + rows {
            self.scroll_index = row + 1 - rows;
        }
        previous != self.scroll_index
    }

    pub fn search_char(&mut self, c: char, now: Instant) {
        if !self.capturing_search {
            return;
        }
        let mut q = self
            .pending_query
            .take()
            .map(|(q, _)| q)
            .unwrap_or_else(|| self.query.clone());
        q.push(c);
        self.pending_query = Some((q, now + self.search_debounce));
    }

    pub fn search_backspace(&mut self, now: Instant) {
        if !self.capturing_search {
            return;
        }
        let mut q = self
            .pending_query
            .take()
            .map(|(q, _)| q)
            .unwrap_or_else(|| self.query.clone());
        q.pop();
        self.pending_query = Some((q, now + self.search_debounce));
    }

    /// Returns true when the debounced query was committed (item count may
    /// have changed, so the caller republishes the config).
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.pending_query.take() {
            Some((query, deadline)) if now >= deadline => {
                self.commit_query(query);
                true
            }
            pending => {
                self.pending_query = pending;
                false
            }
        }
    }

    fn commit_query(&mut self, query: String) {
        if query != self.query {
            debug!(key = %self.key, query = %query, "search query committed");
            self.query = query;
        }
        self.refilter();
    }

    fn refilter(&mut self) {
        let mut items: Vec<MediaItem> = if self.query.is_empty() {
            self.list
                .items()
                .iter()
                .filter(|i| self.filters.matches(i))
                .cloned()
                .collect()
        } else {
            let mut matcher = Matcher::new(Config::DEFAULT);
            let pattern =
                Pattern::parse(&self.query, CaseMatching::Ignore, Normalization::Smart);
            let candidates: Vec<&MediaItem> = self
                .list
                .items()
                .iter()
                .filter(|i| self.filters.matches(i))
                .collect();
            pattern
                .match_list(candidates.iter().map(|i| i.title.as_str()), &mut matcher)
                .into_iter()
                .filter_map(|(title, _score)| {
                    candidates.iter().find(|i| i.title == title).map(|i| (*i).clone())
                })
                .collect()
        };
        // Fuzzy results keep relevance order; everything else sorts.
        if self.query.is_empty() {
            match self.sort {
                SortKey::TitleAsc => items.sort_by(|a, b| a.title.cmp(&b.title)),
                SortKey::TitleDesc => items.sort_by(|a, b| b.title.cmp(&a.title)),
                SortKey::YearDesc => items.sort_by(|a, b| b.year.cmp(&a.year)),
                SortKey::YearAsc => items.sort_by(|a, b| a.year.cmp(&b.year)),
            }
        }
        self.filtered = items;
    }

    /// The navigable surface as of the current item count.
    pub fn config(&self) -> ScreenConfig {
        let mut transitions = HashMap::new();
        transitions.insert((Section::Search, NavKey::Up), Section::TopBar);
        transitions.insert((Section::Search, NavKey::Right), Section::Sort);
        transitions.insert((Section::Search, NavKey::Down), Section::Grid);
        transitions.insert((Section::Sort, NavKey::Up), Section::TopBar);
        transitions.insert((Section::Sort, NavKey::Left), Section::Search);
        transitions.insert((Section::Sort, NavKey::Right), Section::Filters);
        transitions.insert((Section::Sort, NavKey::Down), Section::Grid);
        transitions.insert((Section::Filters, NavKey::Up), Section::TopBar);
        transitions.insert((Section::Filters, NavKey::Left), Section::Sort);
        transitions.insert((Section::Filters, NavKey::Down), Section::Grid);
        transitions.insert((Section::Grid, NavKey::Up), Section::Search);

        ScreenConfig {
            key: self.key.clone(),
            sections: vec![Section::Search, Section::Sort, Section::Filters, Section::Grid],
            transitions,
            columns: self.columns,
            total_items: self.total_items(),
            known_for_len: 0,
            crew_len: 0,
            default_entry: ScreenLocalFocus::Grid(GridSelection::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog::{catalog, MediaKind};
    use pretty_assertions::assert_eq;

    const DEBOUNCE: Duration = Duration::from_millis(400);

    fn screen_with_items(count: usize) -> BrowseScreen {
        let mut screen = BrowseScreen::new(BrowseKind::Movies, 4, DEBOUNCE);
        screen.apply_page(catalog(MediaKind::Movie, count), true);
        screen
    }

    #[test]
    fn test_config_tracks_filtered_count() {
        let screen = screen_with_items(10);
        assert_eq!(screen.config().total_items, 10);
        assert_eq!(screen.config().key, ScreenKey::browse_movies());
    }

    #[test]
    fn test_genre_filter_narrows_grid() {
        let mut screen = screen_with_items(12);
        // Cycle to the first genre; 12 items across 6 genres leaves 2.
        screen.cycle_filter();
        assert_eq!(screen.filters().genres, vec![GENRES[0].to_string()]);
        assert_eq!(screen.total_items(), 2);
    }

    #[test]
    fn test_genre_cycle_wraps_to_all() {
        let mut screen = screen_with_items(6);
        for _ in 0..GENRES.len() {
            screen.cycle_filter();
        }
        assert!(!screen.filters().genres.is_empty());
        screen.cycle_filter();
        assert!(screen.filters().genres.is_empty());
        assert_eq!(screen.total_items(), 6);
    }

    #[test]
    fn test_sort_cycles_and_orders() {
        let mut screen = screen_with_items(8);
        screen.cycle_sort();
        assert_eq!(screen.sort(), SortKey::TitleDesc);
        let titles: Vec<&str> = screen.visible().iter().map(|i| i.title.as_str()).collect();
        let mut sorted = titles.clone();
        sorted.sort();
        sorted.reverse();
        assert_eq!(titles, sorted);
    }

    #[test]
    fn test_search_debounce_commits_after_quiet_period() {
        let mut screen = screen_with_items(12);
        let t0 = Instant::now();
        screen.begin_search_capture();
        screen.search_char('h', t0);
        screen.search_char('a', t0 + Duration::from_millis(100));

        // Quiet period not yet elapsed: query unchanged.
        assert!(!screen.tick(t0 + Duration::from_millis(300)));
        assert_eq!(screen.query(), "");

        assert!(screen.tick(t0 + Duration::from_millis(500)));
        assert_eq!(screen.query(), "ha");
        // "Harbor" and derivatives match; the full list does not.
        assert!(screen.total_items() < 12);
        assert!(screen.visible().iter().all(|i| i.title.to_lowercase().contains('h')));
    }

    #[test]
    fn test_each_keystroke_resets_debounce() {
        let mut screen = screen_with_items(12);
        let t0 = Instant::now();
        screen.begin_search_capture();
        screen.search_char('h', t0);
        screen.search_char('a', t0 + Duration::from_millis(350));
        // 400ms after the first keystroke but only 50ms after the second.
        assert!(!screen.tick(t0 + Duration::from_millis(400)));
        assert!(screen.tick(t0 + Duration::from_millis(750)));
    }

    #[test]
    fn test_end_capture_flushes_pending_query() {
        let mut screen = screen_with_items(12);
        let t0 = Instant::now();
        screen.begin_search_capture();
        screen.search_char('h', t0);
        screen.end_search_capture();
        assert_eq!(screen.query(), "h");
        assert!(!screen.is_capturing_search());
    }

    #[test]
    fn test_capture_swallows_directions_and_exits_on_enter() {
        let mut screen = screen_with_items(12);
        screen.begin_search_capture();
        assert!(screen.capture_key(NavKey::Up));
        assert!(screen.capture_key(NavKey::Right));
        assert!(screen.is_capturing_search());
        assert!(screen.capture_key(NavKey::Enter));
        assert!(!screen.is_capturing_search());
        // Once capture ended the router owns the keyboard again.
        assert!(!screen.capture_key(NavKey::Down));
    }

    #[test]
    fn test_back_exits_capture_and_flushes_query() {
        let mut screen = screen_with_items(12);
        let t0 = Instant::now();
        screen.begin_search_capture();
        screen.search_char('h', t0);
        screen.search_char('a', t0);
        assert!(screen.capture_key(NavKey::Back));
        assert!(!screen.is_capturing_search());
        assert_eq!(screen.query(), "ha");
        // Typed keys after exit no longer reach the query.
        screen.search_char('x', t0);
        assert!(!screen.tick(t0 + Duration::from_secs(1)));
        assert_eq!(screen.query(), "ha");
    }

    #[test]
    fn test_pending_query_survives_early_tick() {
        let mut screen = screen_with_items(12);
        let t0 = Instant::now();
        screen.begin_search_capture();
        screen.search_char('h', t0);
        assert!(!screen.tick(t0 + Duration::from_millis(100)));
        // The pending entry must still be there and commit on time.
        assert!(screen.tick(t0 + Duration::from_millis(450)));
        assert_eq!(screen.query(), "h");
    }

    #[test]
    fn test_ensure_visible_tracks_window_edges() {
        let mut screen = screen_with_items(40);
        assert_eq!(screen.scroll_index, 0);
        // Moving within the window leaves the scroll alone.
        assert!(!screen.ensure_visible(3, 4));
        // Crossing the bottom edge scrolls down just enough.
        assert!(screen.ensure_visible(4, 4));
        assert_eq!(screen.scroll_index, 1);
        assert!(screen.ensure_visible(9, 4));
        assert_eq!(screen.scroll_index, 6);
        // Moving back above the window scrolls up to the row.
        assert!(screen.ensure_visible(2, 4));
        assert_eq!(screen.scroll_index, 2);
    }

    #[test]
    fn test_restore_controls_reapplies_saved_state() {
        let mut screen = screen_with_items(12);
        screen.restore_controls(
            Some(SortKey::YearDesc),
            Some(FilterSet {
                genres: vec![GENRES[1].to_string()],
                ..Default::default()
            }),
        );
        assert_eq!(screen.sort(), SortKey::YearDesc);
        assert_eq!(screen.total_items(), 2);
        let years: Vec<u16> = screen.visible().iter().map(|i| i.year).collect();
        let mut sorted = years.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(years, sorted);
    }
}
