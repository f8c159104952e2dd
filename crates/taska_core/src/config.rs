//! Core configuration.
//!
//! # Responsibility
//! - Describe where tasks are stored and whether file logging is enabled.
//! - Provide defaults matching the browser client's storage layout.

use crate::logging::default_log_level;
use crate::repo::task_repo::DEFAULT_STORAGE_KEY;
use std::path::{Path, PathBuf};

/// File name used by `CoreConfig::in_dir`.
pub const DEFAULT_DB_FILE_NAME: &str = "taska.sqlite3";

/// Backing database location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    File(PathBuf),
    InMemory,
}

/// File logging settings passed to `init_logging`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    /// Must be absolute.
    pub log_dir: PathBuf,
}

impl LoggingConfig {
    /// Uses the build-mode default level.
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            level: default_log_level().to_string(),
            log_dir: log_dir.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub storage: StorageLocation,
    /// Slot key holding the serialized collection.
    pub storage_key: String,
    /// `None` leaves the `log` facade untouched.
    pub logging: Option<LoggingConfig>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl CoreConfig {
    pub fn in_memory() -> Self {
        Self {
            storage: StorageLocation::InMemory,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            logging: None,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            storage: StorageLocation::File(path.into()),
            ..Self::in_memory()
        }
    }

    /// Stores tasks in `dir/taska.sqlite3`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::file(dir.as_ref().join(DEFAULT_DB_FILE_NAME))
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }
}
