//! Application directories and default watch roots
//!
//! `dirs` supplies the platform locations. Each location can be pinned by an
//! environment variable so tests never touch the real home:
//! - `HOUSEKEEPER_TEST_HOME` replaces the home directory, and the user
//!   directories become the conventional names beneath it
//! - `HOUSEKEEPER_CONFIG_DIR` replaces `<config_dir>/housekeeper`
//! - `HOUSEKEEPER_STATE_DIR` replaces `<state_dir>/housekeeper`

use std::path::{Path, PathBuf};

use crate::error::{HousekeeperError, HousekeeperResult};

/// Lowercase application name used in directory names
pub const APP_NAME: &str = "housekeeper";

pub const TEST_HOME_VAR: &str = "HOUSEKEEPER_TEST_HOME";
pub const CONFIG_DIR_VAR: &str = "HOUSEKEEPER_CONFIG_DIR";
pub const STATE_DIR_VAR: &str = "HOUSEKEEPER_STATE_DIR";

const CONFIG_FILE: &str = "config.toml";
const PID_FILE: &str = "daemon.pid";
const LOG_DIR: &str = "logs";

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Home directory, honouring `HOUSEKEEPER_TEST_HOME`
pub fn home_dir() -> Option<PathBuf> {
    env_path(TEST_HOME_VAR).or_else(dirs::home_dir)
}

/// Directory holding `config.toml`
pub fn config_dir() -> HousekeeperResult<PathBuf> {
    env_path(CONFIG_DIR_VAR)
        .or_else(|| dirs::config_dir().map(|d| d.join(APP_NAME)))
        .ok_or(HousekeeperError::NoAppDirectory { what: "config" })
}

pub fn default_config_path() -> HousekeeperResult<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

/// Directory for runtime state (PID file, logs).
///
/// `dirs::state_dir` only exists on Linux; elsewhere the local data dir is used.
pub fn state_dir() -> HousekeeperResult<PathBuf> {
    env_path(STATE_DIR_VAR)
        .or_else(|| {
            dirs::state_dir()
                .or_else(dirs::data_local_dir)
                .map(|d| d.join(APP_NAME))
        })
        .ok_or(HousekeeperError::NoAppDirectory { what: "state" })
}

pub fn log_dir() -> HousekeeperResult<PathBuf> {
    Ok(state_dir()?.join(LOG_DIR))
}

pub fn pid_file() -> HousekeeperResult<PathBuf> {
    Ok(state_dir()?.join(PID_FILE))
}

/// User directories watched by default, after home
fn user_directories() -> Vec<PathBuf> {
    if let Some(home) = env_path(TEST_HOME_VAR) {
        return ["Desktop", "Documents", "Downloads", "Music", "Pictures", "Videos"]
            .iter()
            .map(|name| home.join(name))
            .collect();
    }

    [
        dirs::desktop_dir(),
        dirs::document_dir(),
        dirs::download_dir(),
        dirs::audio_dir(),
        dirs::picture_dir(),
        dirs::video_dir(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Home followed by the existing user directories, without duplicates.
///
/// On headless systems the XDG user dirs often resolve to home itself.
pub fn default_directories() -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::new();
    let candidates = home_dir().into_iter().chain(user_directories());

    for dir in candidates {
        if dir.is_dir() && !out.contains(&dir) {
            out.push(dir);
        }
    }
    out
}
