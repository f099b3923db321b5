//! In-memory store with failure injection for unit tests.

use crate::error::StorageError;
use crate::store::OrderedStore;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Default)]
pub(crate) struct Failures {
    pub put: AtomicBool,
    pub delete: AtomicBool,
    pub get: AtomicBool,
    pub scan: AtomicBool,
}

impl Failures {
    pub fn fail_puts(&self, on: bool) {
        self.put.store(on, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, on: bool) {
        self.delete.store(on, Ordering::SeqCst);
    }

    pub fn fail_gets(&self, on: bool) {
        self.get.store(on, Ordering::SeqCst);
    }

    pub fn fail_scans(&self, on: bool) {
        self.scan.store(on, Ordering::SeqCst);
    }
}

/// BTreeMap-backed store; clones share the same map and failure switches.
#[derive(Clone, Default)]
pub(crate) struct MemoryStore {
    pub entries: Arc<Mutex<BTreeMap<Vec<u8>, Vec<u8>>>>,
    pub failures: Arc<Failures>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_raw(&self, key: &[u8], value: &[u8]) {
        self.entries.lock().insert(key.to_vec(), value.to_vec());
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

fn injected(op: &str) -> StorageError {
    StorageError::IoError(io::Error::new(
        io::ErrorKind::Other,
        format!("injected {} failure", op),
    ))
}

impl OrderedStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        if self.failures.get.load(Ordering::SeqCst) {
            return Err(injected("get"));
        }
        Ok(self.entries.lock().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        if self.failures.put.load(Ordering::SeqCst) {
            return Err(injected("put"));
        }
        self.entries.lock().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), StorageError> {
        if self.failures.delete.load(Ordering::SeqCst) {
            return Err(injected("delete"));
        }
        self.entries.lock().remove(key);
        Ok(())
    }

    fn first_key(&self) -> Result<Option<Vec<u8>>, StorageError> {
        if self.failures.scan.load(Ordering::SeqCst) {
            return Err(injected("scan"));
        }
        Ok(self.entries.lock().keys().next().cloned())
    }

    fn last_key(&self) -> Result<Option<Vec<u8>>, StorageError> {
        if self.failures.scan.load(Ordering::SeqCst) {
            return Err(injected("scan"));
        }
        Ok(self.entries.lock().keys().next_back().cloned())
    }

    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }

    fn destroy(_location: &Path) -> Result<(), StorageError> {
        Ok(())
    }
}
