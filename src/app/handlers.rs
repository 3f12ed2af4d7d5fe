// Event handlers and action dispatch

use std::time::Instant;

use chrono::Local;
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

use super::{ActiveScreen, App, RequestEntry};
use crate::action::Action;
use crate::data::catalog::{self, MediaKind};
use crate::data::{MediaItem, PersonInfo};
use crate::error::Result;
use crate::event::{CapturePing, DataEvent, NavKey};
use crate::input::{keymap, FocusTarget, ScreenLocalFocus, TopBarItem};
use crate::modal::arbiter::{ArbiterOutcome, ModalMachine};
use crate::modal::linear_form::LinearForm;
use crate::modal::list_actions::ListActions;
use crate::modal::ModalId;
use crate::nav::grid::{self, GridSelection};
use crate::nav::restore::{self, RestorePoll, RestoreStart};
use crate::nav::{RouteOutcome, ScreenConfig, Section};
use crate::screens::{BrowseKind, BrowseScreen, PersonScreen, ScreenKey};

const REQUEST_QUALITIES: [&str; 3] = ["1080p", "4K", "Original"];
const ISSUE_CATEGORIES: [&str; 4] = ["Playback", "Subtitles", "Audio", "Metadata"];

impl App {
    // ---- raw event classification ----

    pub(super) fn handle_event(&mut self, event: Event) -> Option<Action> {
        match event {
            Event::Key(key) => {
                if keymap::is_quit(&key) {
                    return Some(Action::Quit);
                }
                if self.is_capturing_text() && key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                            return Some(Action::Char(c));
                        }
                        KeyCode::Backspace => return Some(Action::Backspace),
                        _ => {}
                    }
                }
                keymap::classify(&key).map(Action::Nav)
            }
            Event::Resize(_, _) => {
                self.mark_dirty();
                None
            }
            _ => None,
        }
    }

    fn is_capturing_text(&self) -> bool {
        if self.arbiter.is_capturing_text() {
            return true;
        }
        matches!(
            &self.screen,
            Some(ActiveScreen::Browse(screen)) if screen.is_capturing_search()
        )
    }

    // ---- action dispatch ----

    pub(super) fn dispatch(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Tick => self.handle_tick(),
            Action::Nav(key) => self.handle_nav(key),
            Action::Char(c) => self.handle_char(c),
            Action::Backspace => self.handle_backspace(),
            Action::Data(event) => self.handle_data(event),
            Action::Ping(ping) => self.handle_ping(ping),
            Action::ConfigChanged(path) => {
                tracing::info!("Config file changed: {}", path.display());
                self.config_manager_mut().reload_file(&path);
                self.refresh_config();
                self.notification_manager.info("Configuration reloaded");
            }
        }
        Ok(())
    }

    /// Mount the startup screen. Called once before the run loop.
    pub fn mount_initial(&mut self) {
        self.mount_browse(BrowseKind::Movies);
    }

    // ---- navigation ----

    fn handle_nav(&mut self, key: NavKey) {
        let now = Instant::now();

        // Modals arbitrate first; the screen layer never sees these keys.
        let arbiter_outcome =
            self.arbiter
                .handle_key(key, now, &mut self.registry, &mut self.router);
        if let Some(outcome) = arbiter_outcome {
            self.handle_arbiter_outcome(outcome, now);
            return;
        }

        // Search capture owns the keyboard; Enter/Back end it and focus
        // stays on the field, nothing reaches the router.
        if let Some(ActiveScreen::Browse(screen)) = &mut self.screen {
            if screen.capture_key(key) {
                if !screen.is_capturing_search() {
                    // A flushed query may have changed the item count.
                    self.router.register_screen(screen.config());
                }
                return;
            }
        }

        match self.registry.get().clone() {
            FocusTarget::TopBar(item) => self.handle_top_bar_nav(item, key),
            FocusTarget::Screen { key: screen_key, local } => {
                self.handle_screen_nav(screen_key, local, key, now)
            }
            FocusTarget::Modal { .. } => {
                // Stale modal focus with an empty stack; drop the key.
                tracing::warn!("modal focus with empty modal stack");
            }
        }
    }

    fn handle_top_bar_nav(&mut self, item: TopBarItem, key: NavKey) {
        match key {
            NavKey::Left => self.registry.set(FocusTarget::TopBar(item.left())),
            NavKey::Right => self.registry.set(FocusTarget::TopBar(item.right())),
            NavKey::Down => {
                if let Some(config) = self.router.current_config() {
                    let key = config.key.clone();
                    let local = Self::screen_entry_focus(config);
                    self.registry.set(FocusTarget::Screen { key, local });
                }
            }
            NavKey::Enter => match item {
                TopBarItem::Search => self.switch_tab(item, BrowseKind::Search),
                TopBarItem::Movies => self.switch_tab(item, BrowseKind::Movies),
                TopBarItem::Series => self.switch_tab(item, BrowseKind::Series),
                TopBarItem::Settings => self.open_request_manager(),
            },
            NavKey::Up | NavKey::Back => {}
        }
    }

    /// Where focus lands when moving from the top bar into the screen.
    fn screen_entry_focus(config: &ScreenConfig) -> ScreenLocalFocus {
        match &config.default_entry {
            ScreenLocalFocus::Grid(_) if config.total_items == 0 => {
                if config.has_section(Section::Search) {
                    ScreenLocalFocus::Search
                } else {
                    config.default_entry.clone()
                }
            }
            ScreenLocalFocus::Grid(sel) => ScreenLocalFocus::Grid(grid::clamp(
                *sel,
                config.total_items,
                config.columns,
            )),
            other => other.clone(),
        }
    }

    fn switch_tab(&mut self, item: TopBarItem, kind: BrowseKind) {
        self.active_tab = item;
        self.mount_browse(kind);
    }

    fn handle_screen_nav(
        &mut self,
        screen_key: ScreenKey,
        local: ScreenLocalFocus,
        key: NavKey,
        now: Instant,
    ) {
        let Some(outcome) = self.router.dispatch(key, &local) else {
            return;
        };
        match outcome {
            RouteOutcome::Focus(new_local) => {
                if let ScreenLocalFocus::Grid(sel) = &new_local {
                    if let Some(config) = self.router.current_config() {
                        let (columns, total) = (config.columns, config.total_items);
                        self.positions
                            .request_position_change(&screen_key, *sel, columns, total);
                    }
                    let viewport = self.grid_viewport_rows;
                    if let Some(ActiveScreen::Browse(screen)) = &mut self.screen {
                        if screen.key == screen_key && screen.ensure_visible(sel.row, viewport)
                        {
                            self.positions.save_position(
                                &screen_key,
                                screen.scroll_index,
                                screen.scroll_offset,
                            );
                        }
                    }
                }
                self.registry.set(FocusTarget::Screen {
                    key: screen_key,
                    local: new_local,
                });
            }
            RouteOutcome::ExitTop => {
                self.registry.set(FocusTarget::TopBar(self.active_tab));
            }
            RouteOutcome::Activate(local) => self.handle_activate(screen_key, local, now),
            RouteOutcome::Back => self.handle_screen_back(screen_key),
        }
    }

    fn handle_activate(&mut self, screen_key: ScreenKey, local: ScreenLocalFocus, _now: Instant) {
        match &mut self.screen {
            Some(ActiveScreen::Browse(screen)) if screen.key == screen_key => match local {
                ScreenLocalFocus::Search => {
                    screen.begin_search_capture();
                }
                ScreenLocalFocus::Sort => {
                    screen.cycle_sort();
                    let (key, sort, config) = (screen.key.clone(), screen.sort(), screen.config());
                    self.positions.save_sort(&key, sort);
                    self.router.register_screen(config);
                }
                ScreenLocalFocus::Filters => {
                    screen.cycle_filter();
                    let key = screen.key.clone();
                    let filters = screen.filters().clone();
                    let config = screen.config();
                    self.positions.save_filters(&key, filters);
                    self.router.register_screen(config);
                }
                ScreenLocalFocus::Grid(sel) => {
                    if let Some(item) = screen.item_at(sel).cloned() {
                        let (scroll_index, scroll_offset) =
                            (screen.scroll_index, screen.scroll_offset);
                        let (columns, total) = (screen.columns(), screen.total_items());
                        self.positions.save_position(&screen_key, scroll_index, scroll_offset);
                        self.positions
                            .request_position_change(&screen_key, sel, columns, total);
                        self.positions.mark_returning_from_details(&screen_key);
                        self.open_details(item, screen_key);
                    }
                }
                _ => {}
            },
            Some(ActiveScreen::Person(screen)) if screen.key == screen_key => match local {
                ScreenLocalFocus::Top => {
                    let title = screen.person.name.clone();
                    self.open_request_form(title);
                }
                ScreenLocalFocus::ReadMore => {
                    screen.toggle_bio();
                }
                ScreenLocalFocus::KnownFor(i) => {
                    if let Some(item) = screen.person.known_for.get(i) {
                        let title = item.title.clone();
                        self.open_request_form(title);
                    }
                }
                ScreenLocalFocus::Crew(i) => {
                    if let Some(item) = screen.person.crew_credits.get(i) {
                        let title = item.title.clone();
                        self.open_request_form(title);
                    }
                }
                _ => {}
            },
            _ => {
                tracing::warn!(key = %screen_key, "activation for unmounted screen");
            }
        }
    }

    /// Enter on a grid cell drills into details. Media items map to the
    /// lead performer's person screen in the demo catalog.
    fn open_details(&mut self, item: MediaItem, origin: ScreenKey) {
        let person = PersonInfo::demo(item.id % 8);
        self.mount_person(person, origin);
    }

    fn handle_screen_back(&mut self, screen_key: ScreenKey) {
        match &self.screen {
            Some(ActiveScreen::Person(screen)) if screen.key == screen_key => {
                let origin = screen.origin.clone();
                self.router.unregister_screen(&screen_key);
                if let Some(kind) = Self::kind_for_key(&origin) {
                    self.mount_browse(kind);
                } else {
                    self.registry.set(FocusTarget::TopBar(self.active_tab));
                }
            }
            _ => {
                // Back at a browse root climbs to the top bar.
                self.registry.set(FocusTarget::TopBar(self.active_tab));
            }
        }
    }

    fn kind_for_key(key: &ScreenKey) -> Option<BrowseKind> {
        if *key == ScreenKey::browse_movies() {
            Some(BrowseKind::Movies)
        } else if *key == ScreenKey::browse_series() {
            Some(BrowseKind::Series)
        } else if *key == ScreenKey::search() {
            Some(BrowseKind::Search)
        } else {
            None
        }
    }

    // ---- screen lifecycle ----

    fn mount_browse(&mut self, kind: BrowseKind) {
        let columns = self.config().grid.columns;
        let page_size = self.config().grid.page_size;
        let mut screen = BrowseScreen::new(kind, columns, self.search_debounce());
        let key = screen.key.clone();

        screen.restore_controls(
            self.positions.saved_sort(&key),
            self.positions.saved_filters(&key).cloned(),
        );
        self.router.register_screen(screen.config());

        self.pending_restore = None;
        let start = restore::begin(&key, &self.positions, columns);
        self.registry.set(FocusTarget::Screen {
            key: key.clone(),
            local: Self::browse_mount_focus(&start),
        });
        if let RestoreStart::Pending(pending) = start {
            tracing::debug!(key = %key, "mounting with pending restore");
            self.pending_restore = Some(pending);
        }

        screen.list.begin_load();
        catalog::spawn_page_load(
            key.clone(),
            Self::source_for(kind),
            0,
            page_size,
            self.data_tx.clone(),
        );

        self.screen = Some(ActiveScreen::Browse(screen));
        self.watchdog
            .start(key, self.watchdog_interval(), self.ping_tx.clone());
        self.mark_dirty();
    }

    fn mount_person(&mut self, person: PersonInfo, origin: ScreenKey) {
        let screen = PersonScreen::new(person, origin);
        let key = screen.key.clone();
        self.pending_restore = None;
        self.router.register_screen(screen.config());
        self.registry.set(FocusTarget::Screen {
            key: key.clone(),
            local: ScreenLocalFocus::Top,
        });
        self.screen = Some(ActiveScreen::Person(screen));
        self.watchdog
            .start(key, self.watchdog_interval(), self.ping_tx.clone());
        self.mark_dirty();
    }

    /// Focus for a just-mounted browse screen. A restoring mount parks on
    /// the grid while pages stream in; a fresh mount lands on the primary
    /// input so the screen opens ready to type.
    fn browse_mount_focus(start: &RestoreStart) -> ScreenLocalFocus {
        match start {
            RestoreStart::Fresh => ScreenLocalFocus::Search,
            RestoreStart::Pending(_) => ScreenLocalFocus::Grid(GridSelection::default()),
        }
    }

    fn source_for(kind: BrowseKind) -> Vec<MediaItem> {
        match kind {
            BrowseKind::Movies => catalog::catalog(MediaKind::Movie, 96),
            BrowseKind::Series => catalog::catalog(MediaKind::Series, 60),
            BrowseKind::Search => {
                let mut all = catalog::catalog(MediaKind::Movie, 96);
                all.extend(catalog::catalog(MediaKind::Series, 60));
                all
            }
        }
    }

    // ---- background data ----

    fn handle_data(&mut self, event: DataEvent) {
        let DataEvent::PageLoaded { key, page, items, end_of_list } = event;
        let page_size = self.config().grid.page_size;

        let Some(ActiveScreen::Browse(screen)) = &mut self.screen else {
            return;
        };
        if screen.key != key {
            tracing::debug!(key = %key, page, "dropping page for unmounted screen");
            return;
        }

        screen.apply_page(items, end_of_list);

        // Republish the item count so the router clamps stale selections.
        // While a modal is open its captured parent config stays as-is and
        // is refreshed on the next data or tick republish after close.
        if !self.arbiter.is_open() {
            self.router.register_screen(screen.config());
        }

        let Some(pending) = &self.pending_restore else {
            return;
        };
        match pending.poll(screen.total_items(), screen.list.is_complete()) {
            RestorePoll::Wait => {
                if let Some(next) = screen.list.next_page(page_size) {
                    screen.list.begin_load();
                    let kind = screen.kind;
                    catalog::spawn_page_load(
                        key,
                        Self::source_for(kind),
                        next,
                        page_size,
                        self.data_tx.clone(),
                    );
                }
            }
            RestorePoll::Commit { scroll_index, scroll_offset, selection } => {
                screen.scroll_index = scroll_index;
                screen.scroll_offset = scroll_offset;
                self.registry.set(FocusTarget::Screen {
                    key: key.clone(),
                    local: ScreenLocalFocus::Grid(selection),
                });
                self.positions.clear_returning_flag(&key);
                self.pending_restore = None;
            }
            RestorePoll::Fallback => {
                self.registry.set(FocusTarget::Screen {
                    key: key.clone(),
                    local: ScreenLocalFocus::Grid(GridSelection::default()),
                });
                self.positions.clear_returning_flag(&key);
                self.pending_restore = None;
            }
        }
    }

    // ---- focus watchdog ----

    fn handle_ping(&mut self, ping: CapturePing) {
        if self.arbiter.is_open() {
            return;
        }
        let current = self.registry.get().clone();
        if current.screen_key() == Some(&ping.key) {
            tracing::trace!(key = %ping.key, "re-asserting screen focus");
            self.router.set_current_route(&ping.key);
            // Redundant write on purpose: observers get a fresh
            // notification even though the target is unchanged.
            self.registry.set(current);
        }
    }

    // ---- time ----

    fn handle_tick(&mut self) {
        let now = Instant::now();
        self.notification_manager.tick();
        self.arbiter.tick(now);

        if let Some(ActiveScreen::Browse(screen)) = &mut self.screen {
            if screen.tick(now) {
                // Debounced search query landed; item count changed.
                if !self.arbiter.is_open() {
                    self.router.register_screen(screen.config());
                }
                let (total, columns) = (screen.total_items(), screen.columns());
                if let FocusTarget::Screen { key, local: ScreenLocalFocus::Grid(sel) } =
                    self.registry.get().clone()
                {
                    let clamped = grid::clamp(sel, total, columns);
                    if clamped != sel {
                        self.registry.set(FocusTarget::Screen {
                            key,
                            local: ScreenLocalFocus::Grid(clamped),
                        });
                    }
                }
            }
        }
        self.mark_dirty();
    }

    // ---- text capture ----

    fn handle_char(&mut self, c: char) {
        if self.arbiter.is_capturing_text() {
            self.arbiter.handle_char(c);
            return;
        }
        if let Some(ActiveScreen::Browse(screen)) = &mut self.screen {
            screen.search_char(c, Instant::now());
        }
    }

    fn handle_backspace(&mut self) {
        if self.arbiter.is_capturing_text() {
            self.arbiter.handle_backspace();
            return;
        }
        if let Some(ActiveScreen::Browse(screen)) = &mut self.screen {
            screen.search_backspace(Instant::now());
        }
    }

    // ---- modals ----

    fn open_request_form(&mut self, title: String) {
        self.watchdog.cancel();
        let options = REQUEST_QUALITIES.iter().map(|s| s.to_string()).collect();
        self.pending_request_title = Some(title);
        self.arbiter.open(
            ModalId::RequestForm,
            ModalMachine::Form(LinearForm::new(options)),
            Instant::now(),
            &mut self.registry,
            &mut self.router,
        );
    }

    fn open_issue_report(&mut self) {
        let options = ISSUE_CATEGORIES.iter().map(|s| s.to_string()).collect();
        self.arbiter.open(
            ModalId::IssueReport,
            ModalMachine::Form(LinearForm::new(options)),
            Instant::now(),
            &mut self.registry,
            &mut self.router,
        );
    }

    fn open_request_manager(&mut self) {
        self.watchdog.cancel();
        let machine = ModalMachine::List(ListActions::new(
            self.requests.len(),
            self.modal_timing().confirm_window,
        ));
        self.arbiter.open(
            ModalId::RequestManager,
            machine,
            Instant::now(),
            &mut self.registry,
            &mut self.router,
        );
    }

    fn handle_arbiter_outcome(&mut self, outcome: ArbiterOutcome, _now: Instant) {
        match outcome {
            ArbiterOutcome::Consumed | ArbiterOutcome::ConfirmArmed(_) => {}
            ArbiterOutcome::Closed(id) => {
                tracing::debug!(modal = %id, "modal dismissed");
                self.restart_watchdog_if_idle();
            }
            ArbiterOutcome::Submitted { id, submission } => {
                match id {
                    ModalId::RequestForm => {
                        let title = self
                            .pending_request_title
                            .take()
                            .unwrap_or_else(|| "Untitled".to_string());
                        let quality = submission
                            .option
                            .and_then(|i| REQUEST_QUALITIES.get(i))
                            .map(|s| s.to_string());
                        let entry = RequestEntry {
                            id: self.next_request_id,
                            title: title.clone(),
                            quality,
                            note: submission.text,
                            created_at: Local::now(),
                        };
                        self.next_request_id += 1;
                        self.requests.push(entry);
                        self.notification_manager
                            .success_with_message("Request submitted", title);
                    }
                    ModalId::IssueReport => {
                        let category = submission
                            .option
                            .and_then(|i| ISSUE_CATEGORIES.get(i))
                            .map(|s| s.to_string())
                            .unwrap_or_else(|| "General".to_string());
                        self.notification_manager
                            .success_with_message("Issue reported", category);
                        // The manager's list may have changed while covered.
                        self.arbiter.set_list_len(self.requests.len(), &mut self.registry);
                    }
                    ModalId::RequestManager => {}
                }
                self.restart_watchdog_if_idle();
            }
            ArbiterOutcome::NewItemRequested => {
                self.open_issue_report();
            }
            ArbiterOutcome::Deleted(index) => {
                if index < self.requests.len() {
                    let removed = self.requests.remove(index);
                    self.notification_manager
                        .success_with_message("Request deleted", removed.title);
                }
                self.arbiter.set_list_len(self.requests.len(), &mut self.registry);
            }
        }
    }

    /// Modals suspend the watchdog; once the stack is empty the mounted
    /// screen gets it back.
    fn restart_watchdog_if_idle(&mut self) {
        if self.arbiter.is_open() {
            return;
        }
        let key = match &self.screen {
            Some(ActiveScreen::Browse(screen)) => Some(screen.key.clone()),
            Some(ActiveScreen::Person(screen)) => Some(screen.key.clone()),
            None => None,
        };
        if let Some(key) = key {
            self.watchdog
                .start(key, self.watchdog_interval(), self.ping_tx.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::PositionStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fresh_mount_focuses_primary_input() {
        let store = PositionStore::new();
        let key = ScreenKey::browse_movies();
        let start = restore::begin(&key, &store, 6);
        assert!(matches!(start, RestoreStart::Fresh));
        assert_eq!(App::browse_mount_focus(&start), ScreenLocalFocus::Search);
    }

    #[test]
    fn test_returning_mount_parks_on_grid_while_restoring() {
        let mut store = PositionStore::new();
        let key = ScreenKey::browse_movies();
        store.save_selection(&key, GridSelection { row: 2, col: 1 });
        store.mark_returning_from_details(&key);
        let start = restore::begin(&key, &store, 6);
        assert!(matches!(start, RestoreStart::Pending(_)));
        assert_eq!(
            App::browse_mount_focus(&start),
            ScreenLocalFocus::Grid(GridSelection::default())
        );
    }

    #[test]
    fn test_stale_selection_without_flag_mounts_fresh() {
        let mut store = PositionStore::new();
        let key = ScreenKey::browse_movies();
        store.save_selection(&key, GridSelection { row: 2, col: 1 });
        let start = restore::begin(&key, &store, 6);
        assert!(matches!(start, RestoreStart::Fresh));
        assert_eq!(App::browse_mount_focus(&start), ScreenLocalFocus::Search);
    }
}
