//! Persisted key/value preferences.
//!
//! The outliner never touches ambient storage directly; it reads and
//! writes through a [`Preferences`] implementation handed to it:
//! - [`MemoryPreferences`] for tests and embedding
//! - `FilePreferences`, a JSON file in the user config directory (native)
//! - `LocalStoragePreferences`, the browser's localStorage (WASM)

use std::collections::BTreeMap;

/// String key/value storage.
pub trait Preferences {
    /// Read a stored value.
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value. Called synchronously on every change.
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferencesError>;

    /// Read a stored value, falling back to `default`.
    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}

/// Errors that can occur when persisting preferences.
#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    /// I/O error when writing the preferences file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Storage error (localStorage in WASM)
    #[error("Storage error: {0}")]
    Storage(String),
}

// ============================================================================
// In-Memory
// ============================================================================

/// Preferences kept in memory only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryPreferences {
    values: BTreeMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset a value, e.g. to simulate a previous session.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl Preferences for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferencesError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================================
// File (native)
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
pub use file::FilePreferences;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};

    use super::{Preferences, PreferencesError};

    /// Preferences stored as a JSON object in a file.
    #[derive(Debug, Clone)]
    pub struct FilePreferences {
        path: PathBuf,
        values: BTreeMap<String, String>,
    }

    impl FilePreferences {
        /// Default filename inside the config directory.
        pub fn default_filename() -> &'static str {
            "region-preferences.json"
        }

        /// Get the default preferences path.
        pub fn default_path() -> Option<PathBuf> {
            // Try to use XDG config directory, fall back to home directory
            if let Some(config_dir) = dirs::config_dir() {
                Some(config_dir.join("hvat").join(Self::default_filename()))
            } else {
                dirs::home_dir().map(|home| {
                    home.join(".config")
                        .join("hvat")
                        .join(Self::default_filename())
                })
            }
        }

        /// Open the preferences file at the default path.
        pub fn open_default() -> Option<Self> {
            Self::default_path().map(Self::open)
        }

        /// Open a preferences file.
        ///
        /// A missing file starts empty. An unreadable or corrupt file is
        /// logged and also starts empty, so the next write replaces it.
        pub fn open(path: impl Into<PathBuf>) -> Self {
            let path = path.into();
            let values = load(&path).unwrap_or_default();
            Self { path, values }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn save(&self) -> Result<(), PreferencesError> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let json = serde_json::to_string_pretty(&self.values)?;
            std::fs::write(&self.path, json)?;
            Ok(())
        }
    }

    fn load(path: &Path) -> Option<BTreeMap<String, String>> {
        if !path.exists() {
            log::debug!("No preferences file found at {:?}", path);
            return None;
        }

        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(values) => {
                    log::info!("Loaded preferences from {:?}", path);
                    Some(values)
                }
                Err(e) => {
                    log::warn!("Failed to parse preferences file {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read preferences file {:?}: {}", path, e);
                None
            }
        }
    }

    impl Preferences for FilePreferences {
        fn get(&self, key: &str) -> Option<String> {
            self.values.get(key).cloned()
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), PreferencesError> {
            self.values.insert(key.to_string(), value.to_string());
            self.save()
        }
    }
}

// ============================================================================
// localStorage (WASM)
// ============================================================================

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStoragePreferences;

#[cfg(target_arch = "wasm32")]
mod local_storage {
    use super::{Preferences, PreferencesError};

    /// Preferences stored in the browser's localStorage.
    #[derive(Debug, Clone, Default)]
    pub struct LocalStoragePreferences;

    impl LocalStoragePreferences {
        pub fn new() -> Self {
            Self
        }

        fn storage() -> Result<web_sys::Storage, PreferencesError> {
            let window = web_sys::window()
                .ok_or_else(|| PreferencesError::Storage("No window object available".to_string()))?;
            window
                .local_storage()
                .map_err(|e| PreferencesError::Storage(format!("localStorage access error: {:?}", e)))?
                .ok_or_else(|| PreferencesError::Storage("localStorage not available".to_string()))
        }
    }

    impl Preferences for LocalStoragePreferences {
        fn get(&self, key: &str) -> Option<String> {
            match Self::storage() {
                Ok(storage) => storage.get_item(key).ok().flatten(),
                Err(e) => {
                    log::warn!("Failed to read preference '{}': {}", key, e);
                    None
                }
            }
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), PreferencesError> {
            Self::storage()?.set_item(key, value).map_err(|e| {
                PreferencesError::Storage(format!("Failed to save to localStorage: {:?}", e))
            })
        }
    }
}
