//! Ordered Store
//!
//! The key-value collaborator the queue is layered on. Implementations must
//! iterate keys in byte-lexicographic order; the queue derives its head and
//! tail from the first and last keys.

pub mod persistence;

#[cfg(test)]
pub(crate) mod testing;

pub use persistence::SledStore;

use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tuning knobs for opening a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreOptions {
    /// Page cache size in bytes
    pub cache_capacity: u64,

    /// Background flush interval; `None` disables it
    pub flush_every_ms: Option<u64>,

    /// Flush after every put/delete so a successful call is durable
    pub sync_writes: bool,

    /// How many times to retry opening while another handle in this process
    /// still holds the directory lock
    pub lock_retry_attempts: u32,

    /// First retry delay; doubles per attempt up to 100ms
    pub lock_retry_delay_ms: u64,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            cache_capacity: 64 * 1024 * 1024,
            flush_every_ms: Some(500),
            sync_writes: true,
            lock_retry_attempts: 40,
            lock_retry_delay_ms: 2,
        }
    }
}

/// Ordered Store interface
pub trait OrderedStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError>;
    fn delete(&self, key: &[u8]) -> Result<(), StorageError>;

    /// Smallest key in the store, if any.
    fn first_key(&self) -> Result<Option<Vec<u8>>, StorageError>;

    /// Largest key in the store, if any.
    fn last_key(&self) -> Result<Option<Vec<u8>>, StorageError>;

    fn flush(&self) -> Result<(), StorageError>;

    /// Irreversibly erase everything persisted at `location`.
    ///
    /// Callers must have dropped every open handle to the location first.
    fn destroy(location: &Path) -> Result<(), StorageError>
    where
        Self: Sized;
}
