//! Test environment builder for isolated Housekeeper testing.
//!
//! Every path the binary touches (home, config, state) is redirected into
//! temp directories through `HOUSEKEEPER_*` variables, so tests never see the
//! real user's config or daemon.

use std::path::PathBuf;
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::TempDir;

/// Result of running a Housekeeper CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Extension trait for Command to isolate every Housekeeper directory.
pub trait IsolatedEnvExt {
    /// Sets:
    /// - `HOME` / `USERPROFILE`
    /// - `HOUSEKEEPER_TEST_HOME` (overrides `dirs::home_dir()`)
    /// - `HOUSEKEEPER_CONFIG_DIR` / `HOUSEKEEPER_STATE_DIR`
    /// - `HOUSEKEEPER_NOTIFICATIONS=0` (no desktop popups from tests)
    fn with_isolated_env(&mut self, env: &TestEnv) -> &mut Self;
}

impl IsolatedEnvExt for Command {
    fn with_isolated_env(&mut self, env: &TestEnv) -> &mut Self {
        self.env("HOME", env.home())
            .env("USERPROFILE", env.home())
            .env("HOUSEKEEPER_TEST_HOME", env.home())
            .env("HOUSEKEEPER_CONFIG_DIR", env.config_dir())
            .env("HOUSEKEEPER_STATE_DIR", env.state_dir())
            .env("HOUSEKEEPER_NOTIFICATIONS", "0")
            .env_remove("HOUSEKEEPER_LOG")
            .env_remove("HOUSEKEEPER_BACKEND")
    }
}

/// Isolated test environment with temp directories.
pub struct TestEnv {
    root: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        for dir in ["home", "config", "state", "work"] {
            std::fs::create_dir_all(root.path().join(dir)).expect("Failed to create test dir");
        }
        Self { root }
    }

    /// Canonical so paths compare equal to what the binary prints
    fn base(&self) -> PathBuf {
        self.root.path().canonicalize().expect("Failed to canonicalize temp dir")
    }

    pub fn home(&self) -> PathBuf {
        self.base().join("home")
    }

    pub fn config_dir(&self) -> PathBuf {
        self.base().join("config")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.base().join("state")
    }

    /// Working directory for commands
    pub fn work_dir(&self) -> PathBuf {
        self.base().join("work")
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir().join("config.toml")
    }

    pub fn pid_file(&self) -> PathBuf {
        self.state_dir().join("daemon.pid")
    }

    pub fn write_config(&self, toml: &str) {
        std::fs::write(self.config_path(), toml).expect("Failed to write config.toml");
    }

    pub fn read_config(&self) -> String {
        std::fs::read_to_string(self.config_path()).unwrap_or_default()
    }

    /// Create a directory under the work dir and return its path
    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let path = self.work_dir().join(relative);
        std::fs::create_dir_all(&path).expect("Failed to create directory");
        path
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(bin());
        cmd.current_dir(self.work_dir()).with_isolated_env(self);
        cmd
    }

    /// Run housekeeper to completion
    pub fn run(&self, args: &[&str]) -> TestResult {
        let output = self
            .command()
            .args(args)
            .stdin(Stdio::null())
            .output()
            .expect("Failed to execute housekeeper");
        output_to_result(output)
    }

    /// Start housekeeper with piped stdout/stderr
    pub fn spawn(&self, args: &[&str]) -> Child {
        self.command()
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn housekeeper")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

pub fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_housekeeper")
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

/// Poll `condition` until it holds or `timeout` expires
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(50));
    }
    condition()
}
