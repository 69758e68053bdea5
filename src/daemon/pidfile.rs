//! PID file with an exclusive advisory lock

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, warn};

use crate::error::{HousekeeperError, HousekeeperResult};

/// Location of the daemon's PID file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// PID recorded in the file; `None` if missing or not a number
    pub fn read(&self) -> Option<u32> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }

    /// Lock the file and record `pid` in it.
    ///
    /// Fails with `AlreadyRunning` while another process holds the lock.
    pub fn acquire(&self, pid: u32) -> HousekeeperResult<PidFileGuard> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;

        if let Err(e) = file.try_lock_exclusive() {
            if e.kind() == fs2::lock_contended_error().kind() {
                let what = match self.read() {
                    Some(holder) => format!("daemon (PID {holder})"),
                    None => "daemon".to_string(),
                };
                return Err(HousekeeperError::AlreadyRunning { what });
            }
            return Err(e.into());
        }

        file.set_len(0)?;
        write!(file, "{pid}")?;
        file.sync_all()?;
        debug!("Wrote PID {pid} to {}", self.path.display());

        Ok(PidFileGuard {
            path: self.path.clone(),
            file,
        })
    }

    /// Delete the file; a missing file is not an error
    pub fn remove(&self) -> HousekeeperResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Held for the daemon's lifetime; unlocks and removes the file on drop
#[derive(Debug)]
pub struct PidFileGuard {
    path: PathBuf,
    file: File,
}

impl Drop for PidFileGuard {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                warn!("Failed to remove PID file {}: {e}", self.path.display());
            }
        }
        let _ = self.file.unlock();
    }
}
