// Event loop - main run() method and channel polling

use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use crossterm::event;

use super::App;
use crate::action::Action;
use crate::config::ConfigEvent;
use crate::error::{ReelError, Result};

impl App {
    /// Drain data-loader pages from the background channel. Returns true
    /// if any events were processed.
    pub(super) fn poll_data_events(&mut self) -> Result<bool> {
        let mut events = Vec::new();
        while let Ok(event) = self.data_rx.try_recv() {
            events.push(event);
        }
        if events.is_empty() {
            return Ok(false);
        }
        for event in events {
            self.dispatch(Action::Data(event))?;
        }
        Ok(true)
    }

    /// Drain focus watchdog pings.
    pub(super) fn poll_ping_events(&mut self) -> Result<bool> {
        let mut pings = Vec::new();
        while let Ok(ping) = self.ping_rx.try_recv() {
            pings.push(ping);
        }
        if pings.is_empty() {
            return Ok(false);
        }
        for ping in pings {
            self.dispatch(Action::Ping(ping))?;
        }
        Ok(true)
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            // ---- 1. Poll non-input sources ----

            if self.poll_data_events()? {
                self.mark_dirty();
            }

            if self.poll_ping_events()? {
                self.mark_dirty();
            }

            // Tick (drives debounce, countdowns, toast expiry)
            let tick_interval = Duration::from_millis(self.config().general.tick_interval_ms);
            if self.last_tick.elapsed() >= tick_interval {
                self.dispatch(Action::Tick)?;
                self.last_tick = Instant::now();
            }

            // Poll config watcher for file changes
            let config_events: Vec<_> = if let Some(ref mut watcher) = self.config_watcher {
                watcher.poll_events()
            } else {
                Vec::new()
            };

            for event in config_events {
                match event {
                    ConfigEvent::Changed(path) => {
                        self.dispatch(Action::ConfigChanged(path))?;
                        self.mark_dirty();
                    }
                    ConfigEvent::Error(msg) => {
                        tracing::warn!("Config watcher error: {}", msg);
                    }
                }
            }

            // Focus observers may have fired from any of the above.
            if self.focus_dirty.swap(false, Ordering::Relaxed) {
                self.mark_dirty();
            }

            if self.should_quit {
                break;
            }

            // ---- 2. Poll user input ----

            if event::poll(Duration::from_millis(16))
                .map_err(|e| ReelError::Terminal(e.to_string()))?
            {
                let event = event::read().map_err(|e| ReelError::Terminal(e.to_string()))?;

                // Any user input implies we want to give UI feedback
                self.mark_dirty();

                if let Some(action) = self.handle_event(event) {
                    self.dispatch(action)?;
                }
            }

            if self.should_quit {
                break;
            }

            // ---- 3. Draw once if anything changed ----

            if self.needs_redraw {
                self.draw()?;
                self.needs_redraw = false;
            }
        }

        Ok(())
    }
}
