//! Sled-backed Ordered Store

use crate::error::StorageError;
use crate::store::{OrderedStore, StoreOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::debug;

const MAX_LOCK_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Sled-based implementation of OrderedStore
pub struct SledStore {
    db: sled::Db,
    path: PathBuf,
    sync_writes: bool,
}

impl SledStore {
    /// Open (or create) a store at the given directory with default options.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        Self::open_with(path, &StoreOptions::default())
    }

    /// Open (or create) a store at the given directory.
    ///
    /// sled releases its directory lock from background threads after the
    /// last handle is dropped, so an open right after a close in the same
    /// process can briefly see the lock held. That case is retried with a
    /// bounded backoff; any other failure is returned immediately.
    pub fn open_with<P: AsRef<Path>>(path: P, options: &StoreOptions) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let config = sled::Config::new()
            .path(&path)
            .cache_capacity(options.cache_capacity)
            .flush_every_ms(options.flush_every_ms);

        let mut delay = Duration::from_millis(options.lock_retry_delay_ms.max(1));
        let mut attempt = 0;
        let db = loop {
            match config.open() {
                Ok(db) => break db,
                Err(e) if is_lock_contention(&e) && attempt < options.lock_retry_attempts => {
                    attempt += 1;
                    debug!(
                        path = %path.display(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Store directory still locked; retrying open"
                    );
                    thread::sleep(delay);
                    delay = (delay * 2).min(MAX_LOCK_RETRY_DELAY);
                }
                Err(e) => {
                    return Err(StorageError::IoError(io::Error::new(
                        io::ErrorKind::Other,
                        format!("Failed to open sled database at {:?}: {}", path, e),
                    )));
                }
            }
        };
        Ok(Self {
            db,
            path,
            sync_writes: options.sync_writes,
        })
    }

    /// Directory the database lives in
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sync(&self) -> Result<(), StorageError> {
        if self.sync_writes {
            self.flush()?;
        }
        Ok(())
    }
}

impl OrderedStore for SledStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        let value = self
            .db
            .get(key)
            .map_err(|e| to_storage_io("Failed to get value", e))?;
        Ok(value.map(|v| v.to_vec()))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.db
            .insert(key, value)
            .map_err(|e| to_storage_io("Failed to put value", e))?;
        self.sync()
    }

    fn delete(&self, key: &[u8]) -> Result<(), StorageError> {
        self.db
            .remove(key)
            .map_err(|e| to_storage_io("Failed to delete value", e))?;
        self.sync()
    }

    fn first_key(&self) -> Result<Option<Vec<u8>>, StorageError> {
        let entry = self
            .db
            .first()
            .map_err(|e| to_storage_io("Failed to seek to first key", e))?;
        Ok(entry.map(|(k, _)| k.to_vec()))
    }

    fn last_key(&self) -> Result<Option<Vec<u8>>, StorageError> {
        let entry = self
            .db
            .last()
            .map_err(|e| to_storage_io("Failed to seek to last key", e))?;
        Ok(entry.map(|(k, _)| k.to_vec()))
    }

    fn flush(&self) -> Result<(), StorageError> {
        self.db
            .flush()
            .map_err(|e| to_storage_io("Failed to flush database", e))?;
        Ok(())
    }

    fn destroy(location: &Path) -> Result<(), StorageError> {
        if !location.exists() {
            return Ok(());
        }
        std::fs::remove_dir_all(location).map_err(|e| {
            StorageError::IoError(io::Error::new(
                e.kind(),
                format!("Failed to remove store at {:?}: {}", location, e),
            ))
        })
    }
}

/// sled reports a held directory lock as an `Other` I/O error whose message
/// carries the underlying `WouldBlock`.
fn is_lock_contention(err: &sled::Error) -> bool {
    match err {
        sled::Error::Io(io_err) => {
            io_err.kind() == io::ErrorKind::WouldBlock
                || io_err.to_string().contains("could not acquire lock")
        }
        _ => false,
    }
}

fn to_storage_io(context: &str, err: sled::Error) -> StorageError {
    StorageError::IoError(io::Error::new(
        io::ErrorKind::Other,
        format!("{}: {}", context, err),
    ))
}
