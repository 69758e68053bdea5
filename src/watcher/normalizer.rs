//! Raw notification → creation event filtering
//!
//! Some backends can only register whole subtrees (FSEvents on macOS), so
//! every backend output goes through the same direct-child check here. The
//! backends differ only in how raw events are produced.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::debug;

use super::event::{CreationEvent, ItemType, RawEvent};

/// Window in which a repeated creation of the same path, with no removal in
/// between, is treated as a duplicate
pub const DUPLICATE_WINDOW_MS: u64 = 250;

/// Turns one raw notification into zero or one creation event
pub trait EventNormalizer {
    fn classify(&self, raw: &RawEvent) -> Option<CreationEvent>;
}

/// Accepts only events whose parent directory equals the watch root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectChildFilter {
    root: PathBuf,
}

impl DirectChildFilter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl EventNormalizer for DirectChildFilter {
    fn classify(&self, raw: &RawEvent) -> Option<CreationEvent> {
        let path = match raw.path.decode() {
            Ok(path) => path,
            Err(e) => {
                debug!("Discarding event under {}: {e}", self.root.display());
                return None;
            }
        };

        if !path.is_absolute() {
            debug!("Discarding relative event path: {}", path.display());
            return None;
        }

        // `..` and the filesystem root have no file name
        path.file_name()?;

        if path.parent()? != self.root.as_path() {
            return None;
        }

        Some(CreationEvent::new(
            path,
            ItemType::from_is_directory(raw.is_directory),
        ))
    }
}

/// Recently delivered paths, used to collapse duplicate create notifications
#[derive(Debug)]
pub(crate) struct RecentCreations {
    window: Duration,
    seen: HashMap<PathBuf, Instant>,
}

impl RecentCreations {
    pub(crate) fn new() -> Self {
        Self::with_window(Duration::from_millis(DUPLICATE_WINDOW_MS))
    }

    pub(crate) fn with_window(window: Duration) -> Self {
        Self {
            window,
            seen: HashMap::new(),
        }
    }

    /// Record `path` and report whether it was not already seen inside the window
    pub(crate) fn first_sighting(&mut self, path: &Path, now: Instant) -> bool {
        let window = self.window;
        self.seen
            .retain(|_, at| now.saturating_duration_since(*at) < window);

        if self.seen.contains_key(path) {
            return false;
        }
        self.seen.insert(path.to_path_buf(), now);
        true
    }

    /// The path was removed or renamed away; its next creation is a new one
    pub(crate) fn forget(&mut self, path: &Path) {
        self.seen.remove(path);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.seen.len()
    }
}
