//! Configuration System
//!
//! Layered configuration for the queue's storage and logging. Sources are
//! merged with the `config` crate: built-in defaults, the global user file,
//! workspace files, then `FIFOQ__*` environment variables.

use crate::logging::LoggingConfig;
use crate::store::StoreOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FifoqConfig {
    /// Queue storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where and how the queue's store is opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the queue database
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Store page cache size in bytes
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,

    /// Background flush interval in milliseconds; 0 disables it
    #[serde(default = "default_flush_every_ms")]
    pub flush_every_ms: u64,

    /// Flush after every write so each enqueue/dequeue/update is durable on return
    #[serde(default = "default_true")]
    pub sync_writes: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".fifoq/queue")
}

fn default_cache_capacity() -> u64 {
    StoreOptions::default().cache_capacity
}

fn default_flush_every_ms() -> u64 {
    StoreOptions::default().flush_every_ms.unwrap_or(0)
}

fn default_true() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            cache_capacity: default_cache_capacity(),
            flush_every_ms: default_flush_every_ms(),
            sync_writes: default_true(),
        }
    }
}

impl StorageConfig {
    /// Storage settings for a queue at `data_dir`, defaults elsewhere.
    pub fn at<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            cache_capacity: self.cache_capacity,
            flush_every_ms: (self.flush_every_ms > 0).then_some(self.flush_every_ms),
            sync_writes: self.sync_writes,
            ..StoreOptions::default()
        }
    }

    /// Resolve a relative `data_dir` against `root`.
    pub fn resolve_against(&mut self, root: &Path) {
        if self.data_dir.is_relative() {
            self.data_dir = root.join(&self.data_dir);
        }
    }

    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.data_dir.as_os_str().is_empty() {
            return Err("Data directory cannot be empty".to_string());
        }
        if self.cache_capacity == 0 {
            return Err("Cache capacity must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Storage(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Storage(msg) => write!(f, "Storage: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl FifoqConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.storage.validate() {
            errors.push(ValidationError::Storage(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
