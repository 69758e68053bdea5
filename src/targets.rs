//! Watch root resolution
//!
//! Combines defaults, config and CLI arguments into the ordered list of roots
//! handed to the engine. The engine does no validation of its own.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::Config;
use crate::error::{HousekeeperError, HousekeeperResult};
use crate::paths;

/// Directories named on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchRequest {
    /// Ignore defaults and config
    pub only: bool,
    pub extra: Vec<PathBuf>,
}

/// What to do with a candidate that is not a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// First bad root is an error (interactive watch)
    Strict,
    /// Bad roots are dropped with a warning (daemon)
    Lenient,
}

/// Ordered, absolute, de-duplicated candidate roots.
///
/// - `only` with directories: just those
/// - `only` alone: `cwd`
/// - otherwise: defaults (when enabled), then config, then CLI directories
pub fn resolve(request: &WatchRequest, config: &Config, cwd: &Path) -> Vec<PathBuf> {
    let candidates: Vec<PathBuf> = if request.only {
        if request.extra.is_empty() {
            vec![cwd.to_path_buf()]
        } else {
            request.extra.clone()
        }
    } else {
        let defaults = if config.watch.include_defaults {
            paths::default_directories()
        } else {
            Vec::new()
        };
        defaults
            .into_iter()
            .chain(config.directories.iter().cloned())
            .chain(request.extra.iter().cloned())
            .collect()
    };

    dedup(candidates.iter().map(|p| absolutize(p, cwd)))
}

/// Absolute form of `path`; symlinks resolved when the path exists
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    joined.canonicalize().unwrap_or(joined)
}

fn dedup(paths: impl Iterator<Item = PathBuf>) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::new();
    for path in paths {
        if !out.contains(&path) {
            out.push(path);
        }
    }
    out
}

/// Keep only existing directories, per `strictness`
pub fn validate(roots: Vec<PathBuf>, strictness: Strictness) -> HousekeeperResult<Vec<PathBuf>> {
    let mut valid = Vec::with_capacity(roots.len());

    for root in roots {
        if root.is_dir() {
            valid.push(root);
            continue;
        }
        match strictness {
            Strictness::Strict => {
                return Err(HousekeeperError::InvalidWatchRoot {
                    path: root,
                    reason: "not a directory".to_string(),
                })
            }
            Strictness::Lenient => warn!("Skipping non-directory: {}", root.display()),
        }
    }

    if valid.is_empty() && strictness == Strictness::Lenient {
        return Err(HousekeeperError::NoDirectories);
    }
    Ok(valid)
}
