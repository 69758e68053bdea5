//! Configuration type definitions

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::HousekeeperResult;
use crate::watcher::{Backend, DEFAULT_POLL_INTERVAL_MS};

use super::loader::{self, ConfigWarning};

/// Notification backend as written in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Platform-native notifications
    #[default]
    Native,
    /// Periodic scans
    Poll,
}

/// `[watch]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Watch home and the XDG user directories in addition to `directories`
    #[serde(default = "default_true")]
    pub include_defaults: bool,

    #[serde(default)]
    pub backend: BackendKind,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            include_defaults: true,
            backend: BackendKind::default(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl WatchConfig {
    /// Engine backend described by this section
    pub fn backend(&self) -> Backend {
        match self.backend {
            BackendKind::Native => Backend::Native,
            BackendKind::Poll => Backend::poll_every(Duration::from_millis(self.poll_interval_ms.max(1))),
        }
    }
}

/// `[notifications]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Extra directories to watch, stored as absolute paths
    #[serde(default)]
    pub directories: Vec<PathBuf>,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub notifications: NotificationsConfig,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// tried and a missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> HousekeeperResult<Self> {
        let (config, _warnings) = loader::load(path)?;
        Ok(config)
    }

    /// Same as [`load`](Self::load), also returning unknown-key warnings
    pub fn load_with_warnings(path: Option<&Path>) -> HousekeeperResult<(Self, Vec<ConfigWarning>)> {
        loader::load(path)
    }

    /// Apply environment variable overrides (HOUSEKEEPER_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Write the config atomically, creating parent directories
    pub fn save(&self, path: &Path) -> HousekeeperResult<()> {
        loader::save(self, path)
    }

    /// Append `dir` unless already present; returns whether the list changed
    pub fn add_directory(&mut self, dir: impl Into<PathBuf>) -> bool {
        let dir = dir.into();
        if self.directories.contains(&dir) {
            return false;
        }
        self.directories.push(dir);
        true
    }

    /// Remove every entry equal to `dir`; returns whether the list changed
    pub fn remove_directory(&mut self, dir: &Path) -> bool {
        let before = self.directories.len();
        self.directories.retain(|d| d != dir);
        self.directories.len() != before
    }
}
