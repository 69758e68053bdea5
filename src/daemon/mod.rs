//! Background daemon
//!
//! `daemon start` re-executes the current binary as `daemon run` in its own
//! process group with null stdio, then waits for the child to record itself
//! in the PID file. `daemon stop` sends SIGTERM and waits for the process to
//! go away. Control is Unix-only; `run` itself works everywhere.

mod pidfile;
mod process;
mod runner;

use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::{HousekeeperError, HousekeeperResult};
use crate::paths;

pub use pidfile::{PidFile, PidFileGuard};
pub use process::{is_process_running, terminate};
pub use runner::run_until;

/// How long `start` waits for the child to come up
pub const START_TIMEOUT: Duration = Duration::from_secs(5);

/// Default bound for `stop`
pub const STOP_TIMEOUT: Duration = Duration::from_secs(10);

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonStatus {
    Running(u32),
    Stopped,
}

/// Controls the daemon recorded in one PID file
#[derive(Debug, Clone)]
pub struct Daemon {
    pid_file: PidFile,
    executable: Option<PathBuf>,
}

impl Daemon {
    pub fn new(pid_file: PidFile) -> Self {
        Self {
            pid_file,
            executable: None,
        }
    }

    /// Daemon using the default PID file location
    pub fn from_env() -> HousekeeperResult<Self> {
        Ok(Self::new(PidFile::new(paths::pid_file()?)))
    }

    /// Binary to launch instead of the current executable
    pub fn with_executable(mut self, exe: impl Into<PathBuf>) -> Self {
        self.executable = Some(exe.into());
        self
    }

    /// Current state; a stale PID file is removed
    pub fn status(&self) -> DaemonStatus {
        let Some(pid) = self.pid_file.read() else {
            return DaemonStatus::Stopped;
        };

        if is_process_running(pid) {
            return DaemonStatus::Running(pid);
        }

        debug!("Removing stale PID file for {pid}");
        let _ = self.pid_file.remove();
        DaemonStatus::Stopped
    }

    /// Launch the daemon and return its PID
    #[cfg(unix)]
    pub fn start(&self, config: Option<&Path>) -> HousekeeperResult<u32> {
        use std::os::unix::process::CommandExt;
        use std::process::{Command, Stdio};

        if let DaemonStatus::Running(pid) = self.status() {
            return Err(HousekeeperError::AlreadyRunning {
                what: format!("Daemon (PID {pid})"),
            });
        }

        let exe = match &self.executable {
            Some(exe) => exe.clone(),
            None => std::env::current_exe()?,
        };

        let mut cmd = Command::new(&exe);
        cmd.arg("daemon").arg("run");
        if let Some(config) = config {
            cmd.arg("--config").arg(config);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .process_group(0);

        let mut child = cmd.spawn().map_err(|e| HousekeeperError::DaemonStartFailed {
            reason: format!("could not launch {}: {e}", exe.display()),
        })?;
        debug!("Launched daemon child {}", child.id());

        let deadline = Instant::now() + START_TIMEOUT;
        while Instant::now() < deadline {
            thread::sleep(POLL_INTERVAL);

            if let Some(pid) = self.pid_file.read().filter(|pid| is_process_running(*pid)) {
                info!("Daemon started (PID {pid})");
                return Ok(pid);
            }

            if let Some(status) = child.try_wait()? {
                return Err(HousekeeperError::DaemonStartFailed {
                    reason: format!("daemon exited during startup ({status})"),
                });
            }
        }

        Err(HousekeeperError::DaemonStartFailed {
            reason: format!(
                "no PID recorded in {} within {} seconds",
                self.pid_file.path().display(),
                START_TIMEOUT.as_secs()
            ),
        })
    }

    #[cfg(not(unix))]
    pub fn start(&self, _config: Option<&Path>) -> HousekeeperResult<u32> {
        Err(HousekeeperError::Unsupported {
            feature: "daemon mode",
        })
    }

    /// Stop the daemon.
    ///
    /// Returns `false` when nothing was running.
    pub fn stop(&self, timeout: Duration) -> HousekeeperResult<bool> {
        let Some(pid) = self.pid_file.read() else {
            return Ok(false);
        };

        if !is_process_running(pid) {
            self.pid_file.remove()?;
            return Ok(false);
        }

        // Exited between the liveness check and the signal
        if !terminate(pid)? {
            debug!("Daemon (PID {pid}) already gone");
            self.pid_file.remove()?;
            return Ok(false);
        }

        let started = Instant::now();
        while is_process_running(pid) {
            if started.elapsed() > timeout {
                return Err(HousekeeperError::ShutdownTimeout {
                    what: format!("Daemon (PID {pid})"),
                    timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        }

        self.pid_file.remove()?;
        info!("Daemon (PID {pid}) stopped");
        Ok(true)
    }
}
