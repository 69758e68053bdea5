//! Configuration loading and persistence

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{HousekeeperError, HousekeeperResult};
use crate::paths;

use super::types::{BackendKind, Config};

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{suggestion}'?)")?;
        }
        Ok(())
    }
}

/// Resolve and load the config file, see [`Config::load`]
pub fn load(explicit: Option<&Path>) -> HousekeeperResult<(Config, Vec<ConfigWarning>)> {
    match explicit {
        Some(path) => load_with_warnings(path),
        None => {
            let Some(path) = paths::default_config_path().ok() else {
                debug!("No config directory; using defaults");
                return Ok((Config::default(), Vec::new()));
            };
            match load_with_warnings(&path) {
                Err(HousekeeperError::ConfigNotFound { .. }) => Ok((Config::default(), Vec::new())),
                other => other,
            }
        }
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> HousekeeperResult<(Config, Vec<ConfigWarning>)> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(HousekeeperError::ConfigNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| HousekeeperError::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
                file: path.to_path_buf(),
                key,
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Apply environment variable overrides (HOUSEKEEPER_* prefix)
pub fn with_env_overrides(mut config: Config) -> Config {
    // HOUSEKEEPER_NOTIFICATIONS
    if let Ok(val) = std::env::var("HOUSEKEEPER_NOTIFICATIONS") {
        config.notifications.enabled = !matches!(val.to_lowercase().as_str(), "0" | "false" | "off" | "no");
    }

    // HOUSEKEEPER_BACKEND
    if let Ok(val) = std::env::var("HOUSEKEEPER_BACKEND") {
        match val.to_lowercase().as_str() {
            "native" => config.watch.backend = BackendKind::Native,
            "poll" => config.watch.backend = BackendKind::Poll,
            other => warn!("Ignoring HOUSEKEEPER_BACKEND={other}; expected 'native' or 'poll'"),
        }
    }

    config
}

/// Write `config` to `path` via a temp file in the same directory
pub fn save(config: &Config, path: &Path) -> HousekeeperResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let content = toml::to_string_pretty(config)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    debug!("Saved config to {}", path.display());
    Ok(())
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.trim_start().starts_with(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "directories",
        "watch",
        "include_defaults",
        "backend",
        "poll_interval_ms",
        "notifications",
        "enabled",
    ];

    CANDIDATES
        .iter()
        .map(|candidate| (candidate, levenshtein(unknown, candidate)))
        .min_by_key(|(_, dist)| *dist)
        .filter(|(_, dist)| *dist <= 2)
        .map(|(candidate, _)| candidate.to_string())
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
