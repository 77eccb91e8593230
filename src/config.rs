use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Name of the managed config file at the selected folder's root.
pub const CONFIG_FILE_NAME: &str = ".snyk";

/// Sub-folder that receives the previous config file.
pub const BACKUP_DIR_NAME: &str = "backup";

/// Shown in the content pane when a file cannot be read.
pub const READ_FAILED_PLACEHOLDER: &str = "Unable to read file content.";

/// How often the tick event fires (ms).
pub const TICK_RATE_MS: u64 = 250;

/// Folder watcher debounce interval (ms).
pub const DEBOUNCE_MS: u64 = 200;

pub const DEFAULT_LOG_LEVEL: &str = "info";

const SETTINGS_FILE_NAME: &str = ".snyk-tree.toml";

pub fn home_dir() -> PathBuf {
    std::env::var("USERPROFILE")
        .or_else(|_| std::env::var("HOME"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

pub fn default_settings_path() -> PathBuf {
    home_dir().join(SETTINGS_FILE_NAME)
}

pub fn default_log_file() -> PathBuf {
    home_dir().join(".snyk-tree").join("snyk-tree.log")
}

// ---------------------------------------------------------------------------
// Settings (~/.snyk-tree.toml)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    pub display: Option<DisplayConfig>,
    pub watch: Option<WatchConfig>,
    pub log: Option<LogConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DisplayConfig {
    pub tick_rate: Option<u64>,
    /// Draw `>` / `v` instead of folder emoji.
    pub ascii_icons: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WatchConfig {
    /// Set to false to stop refreshing the tree on disk changes.
    pub enabled: Option<bool>,
    pub debounce_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
    /// One of trace, debug, info, warn, error.
    pub level: Option<String>,
}

impl Settings {
    pub fn tick_rate(&self) -> u64 {
        self.display
            .as_ref()
            .and_then(|d| d.tick_rate)
            .unwrap_or(TICK_RATE_MS)
    }

    pub fn ascii_icons(&self) -> bool {
        self.display
            .as_ref()
            .and_then(|d| d.ascii_icons)
            .unwrap_or(false)
    }

    pub fn watch_enabled(&self) -> bool {
        self.watch
            .as_ref()
            .and_then(|w| w.enabled)
            .unwrap_or(true)
    }

    pub fn debounce_ms(&self) -> u64 {
        self.watch
            .as_ref()
            .and_then(|w| w.debounce_ms)
            .unwrap_or(DEBOUNCE_MS)
    }

    pub fn log_file(&self) -> PathBuf {
        self.log
            .as_ref()
            .and_then(|l| l.file.clone())
            .unwrap_or_else(default_log_file)
    }

    pub fn log_level(&self) -> &str {
        self.log
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

/// Load settings from `path`. A missing file yields the defaults; a file
/// that exists but cannot be read or parsed is an error.
pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}
