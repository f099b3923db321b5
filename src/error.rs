//! Error types for the queue and its ordered store.

use thiserror::Error;

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Queue-level errors
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Queue is empty")]
    Empty,

    #[error("Item ID {id} is out of bounds (head: {head}, tail: {tail})")]
    OutOfBounds { id: u64, head: u64, tail: u64 },

    #[error("Invalid key: expected 8 bytes, got {0}")]
    KeyDecode(usize),

    #[error("Queue ID space exhausted")]
    Exhausted,

    #[error("Queue is closed")]
    Closed,

    #[error("Incompatible item type: {0}")]
    IncompatibleType(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl QueueError {
    /// True for the expected, recoverable conditions (`Empty`, `OutOfBounds`).
    pub fn is_not_found(&self) -> bool {
        matches!(self, QueueError::Empty | QueueError::OutOfBounds { .. })
    }
}

impl From<config::ConfigError> for QueueError {
    fn from(err: config::ConfigError) -> Self {
        QueueError::ConfigError(err.to_string())
    }
}

impl From<bincode::Error> for QueueError {
    fn from(err: bincode::Error) -> Self {
        QueueError::IncompatibleType(err.to_string())
    }
}
