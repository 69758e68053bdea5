//! Error types for Housekeeper
//!
//! Library code returns [`HousekeeperError`]; the binary wraps it in `anyhow`
//! at the command boundary.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for Housekeeper operations
pub type HousekeeperResult<T> = Result<T, HousekeeperError>;

/// Main error type for Housekeeper operations
#[derive(Error, Debug)]
pub enum HousekeeperError {
    /// Watch root is relative, missing, or not a directory
    #[error("invalid watch root {path}: {reason}")]
    InvalidWatchRoot { path: PathBuf, reason: String },

    /// Notification backend could not attach (to a root, or at all)
    #[error("failed to start notifications for {target}: {reason}")]
    SubsystemInit { target: String, reason: String },

    /// Raw notification that cannot be turned into a path
    #[error("malformed event: {reason}")]
    MalformedEvent { reason: String },

    /// Something did not shut down within its bound
    #[error("{what} did not stop within {} seconds", .timeout.as_secs())]
    ShutdownTimeout { what: String, timeout: Duration },

    /// Engine or daemon is already running
    #[error("{what} is already running")]
    AlreadyRunning { what: String },

    /// Every candidate root was rejected
    #[error("no directories to watch")]
    NoDirectories,

    /// Platform directory (home, config, state) could not be determined
    #[error("could not determine the {what} directory")]
    NoAppDirectory { what: &'static str },

    /// Explicitly requested config file does not exist
    #[error("config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Config file is not valid TOML for our schema
    #[error("invalid config in {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Config could not be rendered back to TOML
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Background daemon never came up
    #[error("daemon failed to start: {reason}")]
    DaemonStartFailed { reason: String },

    /// Desktop notification could not be delivered
    #[error("desktop notifications unavailable: {reason}")]
    NotificationUnavailable { reason: String },

    /// Feature only exists on other platforms
    #[error("{feature} is not supported on this platform")]
    Unsupported { feature: &'static str },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
