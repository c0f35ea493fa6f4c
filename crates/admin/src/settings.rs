//! File-backed store for the merchant settings blob.
//!
//! One JSON file under the data directory, named after the storage key the
//! settings have always lived under. Reads never fail the caller: a missing
//! file yields the defaults, and a malformed blob is logged and replaced by
//! the defaults on the next save.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use eco_packaging_core::{AppSettings, SETTINGS_STORAGE_KEY};

/// Errors that can occur when persisting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Filesystem operation failed.
    #[error("Settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings could not be serialized.
    #[error("Settings serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Store for the single merchant settings blob.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Create a store rooted at `data_dir`.
    ///
    /// The directory is created lazily on first save.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(format!("{SETTINGS_STORAGE_KEY}.json")),
        }
    }

    /// Path of the settings blob on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the settings, falling back to defaults.
    ///
    /// A missing file is the normal first-run state. Unreadable or
    /// malformed blobs are logged as warnings and replaced by defaults so
    /// a page load can never fail on bad settings.
    #[must_use]
    pub fn load(&self) -> AppSettings {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return AppSettings::default();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Failed to read settings: {e}");
                return AppSettings::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "Malformed settings blob, using defaults: {e}"
                );
                AppSettings::default()
            }
        }
    }

    /// Persist the settings, clamped to their valid ranges.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the directory cannot be created or the
    /// file cannot be written.
    pub fn save(&self, settings: &AppSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let clamped = settings.clone().clamped();
        let blob = serde_json::to_string_pretty(&clamped)?;
        fs::write(&self.path, blob)?;
        Ok(())
    }

    /// Replace the stored settings with the defaults.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the defaults cannot be written.
    pub fn reset(&self) -> Result<AppSettings, SettingsError> {
        let defaults = AppSettings::default();
        self.save(&defaults)?;
        Ok(defaults)
    }

    /// Whether the store's directory is usable.
    ///
    /// Used by the readiness probe: creating the data directory is the
    /// only precondition a save has.
    #[must_use]
    pub fn probe(&self) -> bool {
        self.path
            .parent()
            .is_none_or(|parent| fs::create_dir_all(parent).is_ok())
    }
}
