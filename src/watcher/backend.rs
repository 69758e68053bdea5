//! Notification backend selection and raw event extraction
//!
//! `notify` supplies the platform watchers. This module picks one, decides
//! how roots are registered, and reduces `notify::Event`s to [`RawEvent`]s.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::event::{CreateKind, ModifyKind, RenameMode};
use notify::{Config, Event, EventHandler, EventKind, PollWatcher, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::{HousekeeperError, HousekeeperResult};

use super::event::{RawEvent, RawPath};

/// Default interval for the polling backend
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// Which `notify` watcher drives the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Platform-native notifications (inotify, FSEvents, ReadDirectoryChangesW, kqueue)
    #[default]
    Native,
    /// Periodic directory scans; works on network mounts where native APIs don't
    Poll { interval: Duration },
}

impl Backend {
    pub fn poll_every(interval: Duration) -> Self {
        Backend::Poll { interval }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Native => "native",
            Backend::Poll { .. } => "poll",
        }
    }

    /// FSEvents only reports top-level directory creation for recursive
    /// registrations, so macOS registers the subtree and the normalizer
    /// throws the nested events away.
    pub fn recursive_mode(&self) -> RecursiveMode {
        match self {
            Backend::Native if cfg!(target_os = "macos") => RecursiveMode::Recursive,
            _ => RecursiveMode::NonRecursive,
        }
    }

    /// Build the watcher. Must be called on the thread that will own it.
    pub(crate) fn create<F>(&self, handler: F) -> HousekeeperResult<Box<dyn Watcher>>
    where
        F: EventHandler,
    {
        let created: notify::Result<Box<dyn Watcher>> = match self {
            Backend::Native => RecommendedWatcher::new(handler, Config::default())
                .map(|w| Box::new(w) as Box<dyn Watcher>),
            Backend::Poll { interval } => {
                PollWatcher::new(handler, Config::default().with_poll_interval(*interval))
                    .map(|w| Box::new(w) as Box<dyn Watcher>)
            }
        };

        created.map_err(|e| HousekeeperError::SubsystemInit {
            target: format!("{} backend", self.name()),
            reason: e.to_string(),
        })
    }
}

/// Attach `watcher` to one root
pub(crate) fn subscribe(
    watcher: &mut dyn Watcher,
    root: &Path,
    mode: RecursiveMode,
) -> HousekeeperResult<()> {
    if !root.is_dir() {
        return Err(HousekeeperError::InvalidWatchRoot {
            path: root.to_path_buf(),
            reason: "not an existing directory".to_string(),
        });
    }

    watcher
        .watch(root, mode)
        .map_err(|e| HousekeeperError::SubsystemInit {
            target: root.display().to_string(),
            reason: e.to_string(),
        })
}

/// Creation notifications carried by `event`; every other kind yields nothing
pub(crate) fn raw_events(event: Event) -> Vec<RawEvent> {
    let EventKind::Create(kind) = event.kind else {
        return Vec::new();
    };

    event
        .paths
        .into_iter()
        .map(|path| {
            let is_directory = match kind {
                CreateKind::Folder => true,
                CreateKind::File => false,
                CreateKind::Any | CreateKind::Other => probe_is_directory(&path),
            };
            RawEvent {
                path: RawPath::Native(path),
                is_directory,
            }
        })
        .collect()
}

/// Paths that `event` says no longer exist under their old name
pub(crate) fn vacated_paths(event: &Event) -> &[PathBuf] {
    match event.kind {
        EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(RenameMode::From)) => event.paths.as_slice(),
        // Paired rename: the first path is the source
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => &event.paths[..event.paths.len().min(1)],
        _ => &[],
    }
}

/// Backends that don't classify the entry (polling, some Windows paths) get a stat.
/// An entry that vanished before the probe counts as a file.
fn probe_is_directory(path: &Path) -> bool {
    std::fs::symlink_metadata(path)
        .map(|m| m.is_dir())
        .unwrap_or(false)
}
