// App module - split into submodules for maintainability
// - mod.rs: App struct, constructors, accessors
// - event_loop.rs: Main run() loop and channel polling
// - rendering.rs: All UI drawing (draw method)
// - handlers.rs: Event handlers and action dispatch

#![allow(dead_code)]

mod event_loop;
mod handlers;
mod rendering;

use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::cli::Cli;
use crate::components::notification::NotificationManager;
use crate::config::{AppConfig, ConfigManager, ConfigWatcherMode};
use crate::error::{ReelError, Result};
use crate::event::{CapturePing, DataEvent};
use crate::input::{FocusRegistry, FocusTarget, TopBarItem};
use crate::modal::arbiter::{ModalArbiter, ModalTiming};
use crate::nav::restore::PendingRestore;
use crate::nav::watchdog::FocusWatchdog;
use crate::nav::{PositionStore, ScreenRouter};
use crate::screens::{BrowseScreen, PersonScreen};

/// The one screen mounted at a time. Drilling into details tears the
/// browse screen down; coming back rebuilds it through the restoration
/// path.
pub enum ActiveScreen {
    Browse(BrowseScreen),
    Person(PersonScreen),
}

/// An outstanding media request created through the request form.
#[derive(Debug, Clone)]
pub struct RequestEntry {
    pub id: u64,
    pub title: String,
    pub quality: Option<String>,
    pub note: String,
    pub created_at: DateTime<Local>,
}

pub struct App {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    should_quit: bool,
    needs_redraw: bool,
    /// Set by focus observers; folded into `needs_redraw` each loop turn.
    focus_dirty: Arc<AtomicBool>,
    last_tick: Instant,

    config_manager: ConfigManager,
    config_watcher: Option<ConfigWatcherMode>,
    /// Effective config: file values with CLI overrides applied.
    app_config: AppConfig,
    cli_columns: Option<usize>,

    pub(super) registry: FocusRegistry,
    pub(super) router: ScreenRouter,
    pub(super) positions: PositionStore,
    pub(super) arbiter: ModalArbiter,
    watchdog: FocusWatchdog,
    pending_restore: Option<PendingRestore>,

    active_tab: TopBarItem,
    /// Grid rows that fit the last-drawn frame; scroll math reads this.
    grid_viewport_rows: usize,
    screen: Option<ActiveScreen>,
    /// Title captured when the request form opens, consumed on submit.
    pending_request_title: Option<String>,
    requests: Vec<RequestEntry>,
    next_request_id: u64,
    notification_manager: NotificationManager,

    data_tx: UnboundedSender<DataEvent>,
    data_rx: UnboundedReceiver<DataEvent>,
    ping_tx: UnboundedSender<CapturePing>,
    ping_rx: UnboundedReceiver<CapturePing>,
}

impl App {
    pub fn with_cli(cli: &Cli) -> Result<Self> {
        enable_raw_mode().map_err(|e| ReelError::Terminal(e.to_string()))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|e| ReelError::Terminal(e.to_string()))?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).map_err(|e| ReelError::Terminal(e.to_string()))?;

        let config_manager = match &cli.config_dir {
            Some(dir) => ConfigManager::from_dir(dir.clone()),
            None => ConfigManager::new()?,
        };
        let mut app_config = config_manager.app_config().clone();
        if let Some(columns) = cli.columns {
            app_config.grid.columns = columns;
        }
        if cli.no_watch_config {
            app_config.general.watch_config = false;
        }

        let config_watcher = if app_config.general.watch_config {
            let debounce_ms = app_config.general.config_watch_debounce_ms;
            match ConfigWatcherMode::notify(config_manager.config_dir(), debounce_ms) {
                Ok(watcher) => Some(watcher),
                Err(e) => {
                    tracing::warn!(
                        "Failed to set up notify watcher, falling back to tick-based: {}",
                        e
                    );
                    Some(ConfigWatcherMode::tick(
                        config_manager.config_dir().to_path_buf(),
                        5000,
                    ))
                }
            }
        } else {
            None
        };

        let timing = ModalTiming {
            back_debounce: Duration::from_millis(app_config.timing.back_debounce_ms),
            child_back_window: Duration::from_millis(app_config.timing.child_back_window_ms),
            enter_guard: Duration::from_millis(app_config.timing.enter_guard_ms),
            confirm_window: Duration::from_millis(app_config.timing.confirm_window_ms),
        };

        let focus_dirty = Arc::new(AtomicBool::new(true));
        let mut registry = FocusRegistry::new(FocusTarget::TopBar(TopBarItem::Movies));
        {
            let dirty = focus_dirty.clone();
            registry.subscribe(move |_| {
                dirty.store(true, Ordering::Relaxed);
            });
        }

        let (data_tx, data_rx) = mpsc::unbounded_channel();
        let (ping_tx, ping_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            should_quit: false,
            needs_redraw: true,
            focus_dirty,
            last_tick: Instant::now(),
            config_manager,
            config_watcher,
            app_config,
            cli_columns: cli.columns,
            registry,
            router: ScreenRouter::new(),
            positions: PositionStore::new(),
            arbiter: ModalArbiter::new(timing),
            watchdog: FocusWatchdog::new(),
            pending_restore: None,
            active_tab: TopBarItem::Movies,
            grid_viewport_rows: 4,
            screen: None,
            pending_request_title: None,
            requests: Vec::new(),
            next_request_id: 1,
            notification_manager: NotificationManager::new(),
            data_tx,
            data_rx,
            ping_tx,
            ping_rx,
        })
    }

    pub(super) fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    pub(super) fn config(&self) -> &AppConfig {
        &self.app_config
    }

    pub(super) fn modal_timing(&self) -> ModalTiming {
        ModalTiming {
            back_debounce: Duration::from_millis(self.app_config.timing.back_debounce_ms),
            child_back_window: Duration::from_millis(self.app_config.timing.child_back_window_ms),
            enter_guard: Duration::from_millis(self.app_config.timing.enter_guard_ms),
            confirm_window: Duration::from_millis(self.app_config.timing.confirm_window_ms),
        }
    }

    pub(super) fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.app_config.timing.search_debounce_ms)
    }

    pub(super) fn watchdog_interval(&self) -> Duration {
        Duration::from_millis(self.app_config.timing.watchdog_interval_ms)
    }

    /// Re-apply file config after a hot reload, preserving CLI overrides.
    pub(super) fn refresh_config(&mut self) {
        self.app_config = self.config_manager.app_config().clone();
        if let Some(columns) = self.cli_columns {
            self.app_config.grid.columns = columns;
        }
    }

    pub(super) fn config_manager(&self) -> &ConfigManager {
        &self.config_manager
    }

    pub(super) fn config_manager_mut(&mut self) -> &mut ConfigManager {
        &mut self.config_manager
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.watchdog.cancel();
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}
