//! Configuration module for ColorVis-RS
//!
//! This module handles application configuration:
//! - Where snapshots come from ([`SourceConfig`])
//! - How the sample window is built ([`WindowConfig`])
//! - Chart and export defaults ([`DisplayConfig`], [`ExportConfig`])
//! - Logging ([`LogConfig`])
//!
//! # App Data Location
//!
//! The config file lives in the platform-appropriate data directory:
//! - **Linux**: `~/.local/share/dev.colorvis.colorvis-rs/`
//! - **macOS**: `~/Library/Application Support/dev.colorvis.colorvis-rs/`
//! - **Windows**: `%APPDATA%\dev.colorvis.colorvis-rs\`
//!
//! # Files
//!
//! - `config.toml` - Application configuration
//! - `logs/` - Rolling log files (when file logging is enabled)
//!
//! # Example
//!
//! ```ignore
//! use colorvis_rs::config::AppConfig;
//!
//! let mut config = AppConfig::load_or_default();
//! config.display.default_display_count = DisplayCount::Twenty;
//! config.save()?;
//! ```

use crate::error::{ColorVisError, Result};
use crate::pipeline::export::EXPORT_FILE_NAME;
use crate::types::{
    DisplayCount, TimestampMode, DEFAULT_SOURCE_PATH, MAX_SAMPLE_STEP_MS, SAMPLE_STEP_MS,
    WINDOW_CAPACITY,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.colorvis.colorvis-rs";

/// Config filename
pub const CONFIG_FILE: &str = "config.toml";

/// Log directory name under the app data dir
pub const LOG_DIR: &str = "logs";

/// Default polling interval for file sources in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Default interval between mock readings in milliseconds
pub const DEFAULT_MOCK_INTERVAL_MS: u64 = 5000;

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        ColorVisError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            ColorVisError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the config file
pub fn config_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(CONFIG_FILE))
}

// ==================== Source Config ====================

/// Kind of snapshot source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Generated readings, no external data
    #[default]
    Mock,
    /// A JSON document on disk, polled for changes
    JsonFile,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Mock => write!(f, "Mock"),
            SourceKind::JsonFile => write!(f, "JSON file"),
        }
    }
}

/// Where snapshots come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,

    /// Logical path of the readings inside the document (JSON pointer)
    #[serde(default = "default_source_path")]
    pub path: String,

    /// Document to poll (json-file sources)
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Poll interval for json-file sources
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Interval between generated readings (mock sources)
    #[serde(default = "default_mock_interval_ms")]
    pub mock_interval_ms: u64,

    /// Entries kept by the mock source before the oldest are dropped
    #[serde(default = "default_mock_history")]
    pub mock_history: usize,
}

fn default_source_path() -> String {
    DEFAULT_SOURCE_PATH.to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_mock_interval_ms() -> u64 {
    DEFAULT_MOCK_INTERVAL_MS
}

fn default_mock_history() -> usize {
    WINDOW_CAPACITY * 2
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Mock,
            path: default_source_path(),
            file: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            mock_interval_ms: DEFAULT_MOCK_INTERVAL_MS,
            mock_history: default_mock_history(),
        }
    }
}

// ==================== Window Config ====================

/// How the sample window is built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Maximum samples kept
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Spacing between synthesized timestamps
    #[serde(default = "default_step_ms")]
    pub step_ms: u64,

    #[serde(default)]
    pub timestamp_mode: TimestampMode,
}

fn default_capacity() -> usize {
    WINDOW_CAPACITY
}

fn default_step_ms() -> u64 {
    SAMPLE_STEP_MS as u64
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            capacity: WINDOW_CAPACITY,
            step_ms: SAMPLE_STEP_MS as u64,
            timestamp_mode: TimestampMode::Synthetic,
        }
    }
}

// ==================== Display / Export / Log ====================

/// Chart defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    #[serde(default)]
    pub default_display_count: DisplayCount,

    /// Use the dark egui theme
    #[serde(default)]
    pub dark_mode: bool,
}

/// Export defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory the save dialog opens in
    #[serde(default)]
    pub directory: Option<PathBuf>,

    #[serde(default = "default_export_file_name")]
    pub file_name: String,
}

fn default_export_file_name() -> String {
    EXPORT_FILE_NAME.to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_name: default_export_file_name(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Also write daily-rotated log files under the app data dir
    #[serde(default)]
    pub file_logging: bool,
}

fn default_log_filter() -> String {
    "info,colorvis_rs=debug".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            file_logging: false,
        }
    }
}

// ==================== App Config ====================

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub window: WindowConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// Load config from the default location
    pub fn load() -> Result<Self> {
        let path = config_path().ok_or_else(|| {
            ColorVisError::Config("Could not determine config path".to_string())
        })?;
        Self::load_from(path)
    }

    /// Load config from the default location, falling back to defaults
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("Using default config: {}", e);
                Self::default()
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(dir.join(CONFIG_FILE))
    }

    /// Load and validate a config file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ColorVisError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            ColorVisError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save config as TOML
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ColorVisError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ColorVisError::Serialization(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            ColorVisError::Config(format!("Failed to write config file {:?}: {}", path, e))
        })
    }

    /// Check values that would make the pipeline unusable
    pub fn validate(&self) -> Result<()> {
        if self.window.capacity == 0 {
            return Err(ColorVisError::Config(
                "window.capacity must be at least 1".to_string(),
            ));
        }
        if self.window.step_ms == 0 {
            return Err(ColorVisError::Config(
                "window.step_ms must be at least 1".to_string(),
            ));
        }
        if self.window.step_ms > MAX_SAMPLE_STEP_MS {
            return Err(ColorVisError::Config(format!(
                "window.step_ms must be at most {}",
                MAX_SAMPLE_STEP_MS
            )));
        }
        if self.export.file_name.trim().is_empty() {
            return Err(ColorVisError::Config(
                "export.file_name must not be empty".to_string(),
            ));
        }
        if self.source.kind == SourceKind::JsonFile && self.source.file.is_none() {
            return Err(ColorVisError::Config(
                "source.file is required for json-file sources".to_string(),
            ));
        }
        Ok(())
    }

    /// Directory for rolling log files
    pub fn log_dir() -> Option<PathBuf> {
        app_data_dir().map(|p| p.join(LOG_DIR))
    }
}
