//! Command handlers
//!
//! Each handler returns the process exit code; errors bubble up to `main`,
//! which prints them and exits with status 1.

pub mod agent;
pub mod daemon;
pub mod dirs;
pub mod watch;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use tracing::warn;

use housekeeper::{paths, Config};

use crate::cli::{Cli, Commands};

pub fn dispatch(cli: Cli) -> Result<ExitCode> {
    let config_path = cli.config.as_deref();

    match cli.command {
        None => watch::cmd_watch(config_path, cli.only, cli.directories, cli.json),
        Some(Commands::Dirs { action }) => dirs::cmd_dirs(config_path, action),
        Some(Commands::Daemon { action }) => daemon::cmd_daemon(config_path, action),
        Some(Commands::Agent { action }) => agent::cmd_agent(action),
    }
}

/// Load config and report unknown keys.
///
/// `HOUSEKEEPER_*` overrides are left to the caller so they never get saved.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let (config, warnings) = Config::load_with_warnings(explicit)?;
    for warning in &warnings {
        warn!("{warning}");
    }
    Ok(config)
}

/// File that `dirs add/remove` write back to
pub(crate) fn config_write_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(paths::default_config_path()?),
    }
}
