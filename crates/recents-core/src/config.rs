//! List configuration and persisted settings.
//!
//! Two kinds of knobs live here. [`ListConfig`] is wiring chosen by the
//! embedding host at construction time (entry limit, exclude tag) and is not
//! persisted. [`Settings`] is the user-facing record (currently a single
//! auto-refresh toggle), persisted through a [`SettingsStore`]. The default
//! store writes TOML under the platform config directory, with a
//! `RECENTS_CONFIG_DIR` override for tests and development setups.
//!
//! Loading is deliberately lenient: a missing or malformed settings file
//! falls back to defaults instead of failing startup.

use crate::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default cap on the number of entries held in the list.
pub const DEFAULT_MAX_ENTRIES: usize = 30;

/// Default tag marking documents that must never appear in the list.
pub const DEFAULT_EXCLUDE_TAG: &str = "ignore-in-recent";

/// Construction-time configuration for the recency list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListConfig {
    /// Maximum number of entries the cache may hold.
    pub max_entries: usize,
    /// Documents carrying this tag are excluded before ranking.
    pub exclude_tag: String,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            exclude_tag: DEFAULT_EXCLUDE_TAG.to_string(),
        }
    }
}

/// User-facing settings, persisted opaquely by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whether stale reads may trigger a background re-query.
    pub auto_refresh_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_refresh_enabled: true,
        }
    }
}

impl Settings {
    /// Load settings from a store, falling back to defaults on any failure.
    ///
    /// A malformed or unreadable settings record is not worth failing
    /// startup over; the fallback is logged and life goes on.
    #[must_use]
    pub fn load_from(store: &dyn SettingsStore) -> Self {
        match store.load() {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "failed to load settings, using defaults");
                Self::default()
            },
        }
    }
}

/// Persistence seam for [`Settings`].
///
/// The host decides where the record lives; [`FileSettingsStore`] is the
/// default file-backed implementation.
pub trait SettingsStore: Send + Sync {
    /// Load the persisted settings. A missing record yields defaults.
    fn load(&self) -> Result<Settings>;
    /// Persist the settings.
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// TOML-file-backed settings store.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    /// Create a store at the default platform location.
    ///
    /// # Errors
    ///
    /// Returns an error if no config directory can be determined for the
    /// platform.
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: Self::default_path()?,
        })
    }

    /// Create a store backed by an explicit file path.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn default_path() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("RECENTS_CONFIG_DIR") {
            let trimmed = dir.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed).join("settings.toml"));
            }
        }

        let dirs = ProjectDirs::from("", "", "recents")
            .ok_or_else(|| Error::Config("failed to determine config directory".into()))?;
        Ok(dirs.config_dir().join("settings.toml"))
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| Error::Config(format!("failed to read settings: {e}")))?;
        Ok(toml::from_str(&content)?)
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| Error::Config("invalid settings path".into()))?;
        fs::create_dir_all(parent)
            .map_err(|e| Error::Config(format!("failed to create config directory: {e}")))?;

        let content = toml::to_string_pretty(settings)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
