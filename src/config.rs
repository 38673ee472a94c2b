//! Configuration file support for the region store.
//!
//! This module provides serialization and deserialization of store
//! settings: defaults for the outliner, the quick-select hotkey prefix and
//! the log level used by the command-line tool.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_HOTKEY_PREFIX;
use crate::outliner::{GroupingMode, OutlinerDefaults, SortKey, SortOrder, ViewMode};
use crate::tree::TreeOptions;

/// Log level setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    #[default]
    Warn,
    /// Show errors, warnings, and info messages
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Region store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Version of the configuration file format
    pub version: u32,
    /// Sort key used when none is stored
    pub default_sort: SortKey,
    /// Sort direction used when none is stored
    pub default_sort_order: SortOrder,
    /// Grouping used when none is stored
    pub default_grouping: GroupingMode,
    /// View used when none is stored and the task has no preference
    pub default_view: ViewMode,
    /// Order label groups by their hotkey
    pub sort_label_groups_by_hotkey: bool,
    /// Action prefix of the quick-select hotkeys
    pub hotkey_prefix: String,
    /// Log verbosity level
    pub log_level: LogLevel,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            default_sort: SortKey::default(),
            default_sort_order: SortOrder::default(),
            default_grouping: GroupingMode::default(),
            default_view: ViewMode::default(),
            sort_label_groups_by_hotkey: false,
            hotkey_prefix: DEFAULT_HOTKEY_PREFIX.to_string(),
            log_level: LogLevel::default(),
        }
    }
}

impl StoreConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Outliner defaults, with the task's own view preference if it has one.
    pub fn outliner_defaults(&self, task_view: Option<ViewMode>) -> OutlinerDefaults {
        OutlinerDefaults {
            sort: self.default_sort,
            order: self.default_sort_order,
            grouping: self.default_grouping,
            view: task_view.unwrap_or(self.default_view),
        }
    }

    pub fn tree_options(&self) -> TreeOptions {
        TreeOptions {
            sort_label_groups_by_hotkey: self.sort_label_groups_by_hotkey,
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "regions-config.json"
    }

    /// Get the default config file path.
    /// Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("hvat").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("hvat")
                    .join(Self::default_filename())
            })
        }
    }

    /// Try to load configuration from a file.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Option<Self> {
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration from {:?}", path);
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse config file {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Try to load configuration from the default path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        Self::load_from_path(&Self::default_path()?)
    }

    /// Save configuration to a file, creating parent directories.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
