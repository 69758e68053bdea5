//! Configuration module for Housekeeper
//!
//! Resolution order:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (HOUSEKEEPER_*)
//! 3. Config file (`--config FILE`, else `<config_dir>/housekeeper/config.toml`)
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{with_env_overrides, ConfigWarning};
pub use types::{BackendKind, Config, NotificationsConfig, WatchConfig};
