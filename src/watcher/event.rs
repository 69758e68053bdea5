//! Creation events and the raw notifications they are built from

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{HousekeeperError, HousekeeperResult};

/// Kind of filesystem entry that appeared under a watch root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    File,
    Directory,
}

impl ItemType {
    pub fn from_is_directory(is_directory: bool) -> Self {
        if is_directory {
            ItemType::Directory
        } else {
            ItemType::File
        }
    }

    /// Lowercase label used in logs and notifications
    pub fn label(&self) -> &'static str {
        match self {
            ItemType::File => "file",
            ItemType::Directory => "directory",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A new direct child of a watch root.
///
/// Handed to the registered callback by value; the engine keeps no copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreationEvent {
    pub path: PathBuf,
    pub item_type: ItemType,
}

impl CreationEvent {
    pub fn new(path: impl Into<PathBuf>, item_type: ItemType) -> Self {
        Self {
            path: path.into(),
            item_type,
        }
    }

    /// The watch root this event was matched against
    pub fn root(&self) -> Option<&Path> {
        self.path.parent()
    }

    pub fn is_directory(&self) -> bool {
        self.item_type == ItemType::Directory
    }
}

/// Subject path of a raw notification, in whatever shape the backend produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPath {
    Native(PathBuf),
    Text(String),
    Bytes(Vec<u8>),
}

impl RawPath {
    /// Decode into a canonical `PathBuf`.
    ///
    /// Byte paths must be valid UTF-8; empty paths are rejected.
    pub fn decode(&self) -> HousekeeperResult<PathBuf> {
        let path = match self {
            RawPath::Native(path) => path.clone(),
            RawPath::Text(text) => PathBuf::from(text),
            RawPath::Bytes(bytes) => {
                let text = std::str::from_utf8(bytes).map_err(|e| {
                    HousekeeperError::MalformedEvent {
                        reason: format!("path is not valid UTF-8: {e}"),
                    }
                })?;
                PathBuf::from(text)
            }
        };

        if path.as_os_str().is_empty() {
            return Err(HousekeeperError::MalformedEvent {
                reason: "empty path".to_string(),
            });
        }

        Ok(path)
    }
}

/// One creation notification as reported by the notification backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub path: RawPath,
    pub is_directory: bool,
}

impl RawEvent {
    pub fn new(path: impl Into<PathBuf>, is_directory: bool) -> Self {
        Self {
            path: RawPath::Native(path.into()),
            is_directory,
        }
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>, is_directory: bool) -> Self {
        Self {
            path: RawPath::Bytes(bytes.into()),
            is_directory,
        }
    }
}
