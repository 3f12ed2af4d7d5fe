use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

use notify_debouncer_mini::{
    new_debouncer, notify::RecommendedWatcher, notify::RecursiveMode, DebounceEventResult,
    Debouncer,
};

use crate::error::{ReelError, Result};

#[derive(Debug, Clone)]
pub enum ConfigEvent {
    Changed(PathBuf),
    Error(String),
}

pub struct ConfigWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
    rx: Receiver<ConfigEvent>,
}

impl ConfigWatcher {
    pub fn new(config_dir: &Path, debounce_ms: u64) -> Result<Self> {
        let (tx, rx) = channel::<ConfigEvent>();

        let mut debouncer = new_debouncer(
            Duration::from_millis(debounce_ms),
            move |result: DebounceEventResult| match result {
                Ok(events) => {
                    for event in events {
                        if Self::is_config_file(&event.path) {
                            let _ = tx.send(ConfigEvent::Changed(event.path));
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(ConfigEvent::Error(e.to_string()));
                }
            },
        )
        .map_err(|e| ReelError::Config(format!("Failed to create watcher: {}", e)))?;

        if config_dir.exists() {
            debouncer
                .watcher()
                .watch(config_dir, RecursiveMode::NonRecursive)
                .map_err(|e| ReelError::Config(format!("Failed to watch config dir: {}", e)))?;
        }

        Ok(Self {
            _debouncer: debouncer,
            rx,
        })
    }

    fn is_config_file(path: &Path) -> bool {
        let extension = path.extension().and_then(|e| e.to_str());
        matches!(extension, Some("toml"))
    }

    pub fn try_recv(&self) -> Option<ConfigEvent> {
        self.rx.try_recv().ok()
    }

    pub fn poll_events(&self) -> Vec<ConfigEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Fallback for filesystems where inotify is unavailable: compare mtimes
/// on the app tick instead.
pub struct TickBasedWatcher {
    config_dir: PathBuf,
    last_check: std::time::Instant,
    check_interval: Duration,
    file_mtimes: std::collections::HashMap<PathBuf, std::time::SystemTime>,
}

impl TickBasedWatcher {
    pub fn new(config_dir: PathBuf, check_interval_ms: u64) -> Self {
        let mut watcher = Self {
            config_dir,
            last_check: std::time::Instant::now(),
            check_interval: Duration::from_millis(check_interval_ms),
            file_mtimes: std::collections::HashMap::new(),
        };
        watcher.scan_files();
        watcher
    }

    fn scan_files(&mut self) {
        if let Ok(entries) = std::fs::read_dir(&self.config_dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if ConfigWatcher::is_config_file(&path) {
                    if let Ok(metadata) = std::fs::metadata(&path) {
                        if let Ok(mtime) = metadata.modified() {
                            self.file_mtimes.insert(path, mtime);
                        }
                    }
                }
            }
        }
    }

    pub fn check(&mut self) -> Vec<ConfigEvent> {
        if self.last_check.elapsed() < self.check_interval {
            return Vec::new();
        }

        self.last_check = std::time::Instant::now();
        let mut events = Vec::new();

        if let Ok(entries) = std::fs::read_dir(&self.config_dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if ConfigWatcher::is_config_file(&path) {
                    if let Ok(metadata) = std::fs::metadata(&path) {
                        if let Ok(mtime) = metadata.modified() {
                            let changed = self.file_mtimes
                                .get(&path)
                                .map(|&old_mtime| mtime != old_mtime)
                                .unwrap_or(true);

                            if changed {
                                self.file_mtimes.insert(path.clone(), mtime);
                                events.push(ConfigEvent::Changed(path));
                            }
                        }
                    }
                }
            }
        }

        events
    }
}

pub enum ConfigWatcherMode {
    Notify(ConfigWatcher),
    Tick(TickBasedWatcher),
}

impl ConfigWatcherMode {
    pub fn notify(config_dir: &Path, debounce_ms: u64) -> Result<Self> {
        Ok(Self::Notify(ConfigWatcher::new(config_dir, debounce_ms)?))
    }

    pub fn tick(config_dir: PathBuf, check_interval_ms: u64) -> Self {
        Self::Tick(TickBasedWatcher::new(config_dir, check_interval_ms))
    }

    pub fn poll_events(&mut self) -> Vec<ConfigEvent> {
        match self {
            Self::Notify(watcher) => watcher.poll_events(),
            Self::Tick(watcher) => watcher.check(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use std::fs;

    #[test]
    fn test_is_config_file() {
        assert!(ConfigWatcher::is_config_file(Path::new("config.toml")));
        assert!(ConfigWatcher::is_config_file(Path::new("theme.toml")));
        assert!(!ConfigWatcher::is_config_file(Path::new("script.sh")));
        assert!(!ConfigWatcher::is_config_file(Path::new("data.json")));
    }

    #[test]
    fn test_tick_based_watcher() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");
        fs::write(&config_path, "key = \"value\"").unwrap();

        let mut watcher = TickBasedWatcher::new(temp_dir.path().to_path_buf(), 0);

        let events = watcher.check();
        assert!(events.is_empty());

        std::thread::sleep(Duration::from_millis(10));
        fs::write(&config_path, "key = \"new_value\"").unwrap();

        let events = watcher.check();
        assert_eq!(events.len(), 1);
        match &events[0] {
            ConfigEvent::Changed(path) => assert_eq!(path, &config_path),
            _ => panic!("Expected Changed event"),
        }
    }
}
