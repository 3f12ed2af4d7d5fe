// Config module - some methods for future hot-reload and CLI features
#![allow(dead_code)]

mod theme;
mod watcher;

pub use theme::Theme;
pub use watcher::{ConfigEvent, ConfigWatcherMode};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use directories::BaseDirs;

use crate::error::{ReelError, Result};
use crate::input::keymap::VENDOR_ENTER_KEY_CODE;

const CONFIG_DIR: &str = "reel-control";
const MAIN_CONFIG_FILE: &str = "config.toml";
const THEME_FILE: &str = "theme.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[derive(Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub timing: TimingConfig,
    pub grid: GridConfig,
    pub input: InputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub tick_interval_ms: u64,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub watch_config: bool,
    pub config_watch_debounce_ms: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            log_level: "info".to_string(),
            log_file: None,
            watch_config: true,
            config_watch_debounce_ms: 2000,
        }
    }
}

/// Input timing windows. Defaults match the remote-control behavior the
/// UI was tuned against; override with care.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub back_debounce_ms: u64,
    pub child_back_window_ms: u64,
    pub enter_guard_ms: u64,
    pub confirm_window_ms: u64,
    pub watchdog_interval_ms: u64,
    pub search_debounce_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            back_debounce_ms: 500,
            child_back_window_ms: 600,
            enter_guard_ms: 1000,
            confirm_window_ms: 5000,
            watchdog_interval_ms: 100,
            search_debounce_ms: 400,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub columns: usize,
    pub page_size: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 6,
            page_size: 24,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Raw key codes treated as Enter in addition to the built-in vendor
    /// code. Consumed by `keymap::classify_raw`, the classification entry
    /// point for non-terminal front ends; terminal input never produces
    /// raw codes.
    pub extra_enter_codes: Vec<u64>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extra_enter_codes: vec![VENDOR_ENTER_KEY_CODE],
        }
    }
}

pub struct ConfigManager {
    config_dir: PathBuf,
    app_config: AppConfig,
    theme: Theme,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        Ok(Self::from_dir(config_dir))
    }

    /// Build against an explicit directory (CLI `--config-dir` override).
    pub fn from_dir(config_dir: PathBuf) -> Self {
        let app_config = Self::load_app_config(&config_dir);
        let theme = Self::load_theme(&config_dir);

        Self {
            config_dir,
            app_config,
            theme,
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn app_config(&self) -> &AppConfig {
        &self.app_config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn reload_all(&mut self) {
        self.app_config = Self::load_app_config(&self.config_dir);
        self.theme = Self::load_theme(&self.config_dir);
    }

    pub fn reload_file(&mut self, path: &Path) {
        let file_name = path.file_name().and_then(|n| n.to_str());

        match file_name {
            Some(MAIN_CONFIG_FILE) => {
                self.app_config = Self::load_app_config(&self.config_dir);
            }
            Some(THEME_FILE) => {
                self.theme = Self::load_theme(&self.config_dir);
            }
            _ => {
                self.reload_all();
            }
        }
    }

    fn get_config_dir() -> Result<PathBuf> {
        BaseDirs::new()
            .map(|dirs| dirs.config_dir().join(CONFIG_DIR))
            .ok_or_else(|| ReelError::Config("Could not determine config directory".to_string()))
    }

    fn load_app_config(config_dir: &Path) -> AppConfig {
        let path = config_dir.join(MAIN_CONFIG_FILE);
        Self::load_toml_file(&path).unwrap_or_default()
    }

    fn load_theme(config_dir: &Path) -> Theme {
        let path = config_dir.join(THEME_FILE);
        Self::load_toml_file(&path).unwrap_or_default()
    }

    fn load_toml_file<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> Option<T> {
        if !path.exists() {
            return None;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)
                .map_err(|e| ReelError::Config(format!("Failed to create config dir: {}", e)))?;
        }
        Ok(())
    }

    pub fn write_default_configs(&self) -> Result<()> {
        self.ensure_config_dir()?;

        let main_path = self.config_dir.join(MAIN_CONFIG_FILE);
        if !main_path.exists() {
            let content = toml::to_string_pretty(&AppConfig::default())
                .map_err(|e| ReelError::Config(format!("Failed to serialize config: {}", e)))?;
            std::fs::write(&main_path, content)
                .map_err(|e| ReelError::Config(format!("Failed to write config: {}", e)))?;
        }

        let theme_path = self.config_dir.join(THEME_FILE);
        if !theme_path.exists() {
            let content = toml::to_string_pretty(&Theme::default())
                .map_err(|e| ReelError::Config(format!("Failed to serialize theme: {}", e)))?;
            std::fs::write(&theme_path, content)
                .map_err(|e| ReelError::Config(format!("Failed to write theme: {}", e)))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();
        assert_eq!(config.general.tick_interval_ms, 100);
        assert!(config.general.watch_config);
        assert_eq!(config.timing.back_debounce_ms, 500);
        assert_eq!(config.timing.child_back_window_ms, 600);
        assert_eq!(config.timing.enter_guard_ms, 1000);
        assert_eq!(config.grid.columns, 6);
        assert_eq!(config.input.extra_enter_codes, vec![VENDOR_ENTER_KEY_CODE]);
    }

    #[test]
    fn test_app_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timing.confirm_window_ms, config.timing.confirm_window_ms);
        assert_eq!(parsed.input.extra_enter_codes, config.input.extra_enter_codes);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: AppConfig = toml::from_str("[timing]\nback_debounce_ms = 250\n").unwrap();
        assert_eq!(parsed.timing.back_debounce_ms, 250);
        assert_eq!(parsed.timing.enter_guard_ms, 1000);
        assert_eq!(parsed.grid.columns, 6);
    }
}
