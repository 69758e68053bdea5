//! Housekeeper - report every new file or directory in the folders you care about
//!
//! The core is [`watcher::WatchEngine`], which subscribes to OS filesystem
//! notifications and calls back once per newly created direct child of each
//! watch root. Around it sit config, root resolution, desktop notifications,
//! a background daemon and the macOS LaunchAgent.

pub mod agent;
pub mod config;
pub mod daemon;
pub mod error;
pub mod logging;
pub mod notifier;
pub mod paths;
pub mod signal;
pub mod sink;
pub mod targets;
pub mod watcher;

// Re-exports for convenience
pub use config::{BackendKind, Config, ConfigWarning};
pub use daemon::{Daemon, DaemonStatus, PidFile};
pub use error::{HousekeeperError, HousekeeperResult};
pub use notifier::{DesktopNotifier, Notifier, NullNotifier};
pub use sink::{Echo, EventSink, WatchOutput};
pub use targets::{Strictness, WatchRequest};
pub use watcher::{Backend, CreationEvent, EngineState, ItemType, StartReport, WatchEngine};
