//! FIFO Queue
//!
//! A durable first-in, first-out queue layered on an [`OrderedStore`]. Every
//! item is stored under the big-endian encoding of its ID, so the store's key
//! order is the queue order and the live range `(head, tail]` can be recovered
//! on open by reading the first and last keys. No metadata record is kept.
//!
//! A single readers-writer lock guards the counters and the store handle.
//! Mutations (enqueue, dequeue, update, close) take it exclusively; reads
//! (peeks, length) take it shared. A failed store call never moves `head` or
//! `tail`.

use crate::config::StorageConfig;
use crate::error::{QueueError, StorageError};
use crate::item::Item;
use crate::key::{id_to_key, key_to_id};
use crate::store::{OrderedStore, SledStore};
use parking_lot::RwLock;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Durable FIFO queue
pub struct Queue<S: OrderedStore = SledStore> {
    location: PathBuf,
    state: RwLock<QueueState<S>>,
}

/// Counters and store handle; only reachable through the queue's lock.
struct QueueState<S> {
    store: Option<S>,
    head: u64,
    tail: u64,
}

impl<S: OrderedStore> QueueState<S> {
    fn store(&self) -> Result<&S, QueueError> {
        self.store.as_ref().ok_or(QueueError::Closed)
    }

    fn length(&self) -> u64 {
        self.tail - self.head
    }

    fn check_bounds(&self, id: u64) -> Result<(), QueueError> {
        if self.length() < 1 {
            return Err(QueueError::Empty);
        }
        if id <= self.head || id > self.tail {
            return Err(QueueError::OutOfBounds {
                id,
                head: self.head,
                tail: self.tail,
            });
        }
        Ok(())
    }

    fn get_item_by_id(&self, id: u64) -> Result<Item, QueueError> {
        let store = self.store()?;
        self.check_bounds(id)?;

        let key = id_to_key(id);
        let value = store
            .get(&key)?
            .ok_or_else(|| StorageError::KeyNotFound(hex::encode(key)))?;
        Ok(Item { id, key, value })
    }

    fn get_item_by_offset(&self, offset: u64) -> Result<Item, QueueError> {
        match self.head.checked_add(offset) {
            Some(id) => self.get_item_by_id(id),
            None => {
                self.store()?;
                if self.length() < 1 {
                    return Err(QueueError::Empty);
                }
                Err(QueueError::OutOfBounds {
                    id: u64::MAX,
                    head: self.head,
                    tail: self.tail,
                })
            }
        }
    }
}

impl Queue<SledStore> {
    /// Open the queue stored at `location`, creating it if it does not exist.
    pub fn open<P: AsRef<Path>>(location: P) -> Result<Self, QueueError> {
        let location = location.as_ref();
        let store = SledStore::open(location)?;
        Self::from_store(location, store)
    }

    /// Open the queue described by a storage configuration.
    pub fn open_with_config(config: &StorageConfig) -> Result<Self, QueueError> {
        let store = SledStore::open_with(&config.data_dir, &config.store_options())?;
        Self::from_store(&config.data_dir, store)
    }
}

impl<S: OrderedStore> Queue<S> {
    /// Build a queue over an already opened store, recovering head and tail
    /// from its key range.
    pub fn from_store<P: Into<PathBuf>>(location: P, store: S) -> Result<Self, QueueError> {
        let location = location.into();
        let (head, tail) = recover(&store)?;

        info!(
            location = %location.display(),
            head,
            tail,
            length = tail - head,
            "Queue opened"
        );

        Ok(Self {
            location,
            state: RwLock::new(QueueState {
                store: Some(store),
                head,
                tail,
            }),
        })
    }

    /// Storage location the queue was opened at
    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn is_open(&self) -> bool {
        self.state.read().store.is_some()
    }

    /// Append a payload to the back of the queue.
    pub fn enqueue(&self, value: &[u8]) -> Result<Item, QueueError> {
        let mut state = self.state.write();

        let id = state.tail.checked_add(1).ok_or(QueueError::Exhausted)?;
        let item = Item::new(id, value.to_vec());
        state.store()?.put(&item.key, &item.value)?;
        state.tail = id;

        debug!(id, size = item.value.len(), "Enqueued item");
        Ok(item)
    }

    pub fn enqueue_str(&self, value: &str) -> Result<Item, QueueError> {
        self.enqueue(value.as_bytes())
    }

    /// Encode `value` with bincode and enqueue it. Read it back with
    /// [`Item::to_object`].
    pub fn enqueue_object<T: Serialize>(&self, value: &T) -> Result<Item, QueueError> {
        let bytes = bincode::serialize(value)?;
        self.enqueue(&bytes)
    }

    /// Remove and return the front item.
    pub fn dequeue(&self) -> Result<Item, QueueError> {
        let mut state = self.state.write();

        let item = state.get_item_by_offset(1)?;
        state.store()?.delete(&item.key)?;
        state.head = item.id;

        debug!(id = item.id, "Dequeued item");
        Ok(item)
    }

    /// Front item, left in place.
    pub fn peek(&self) -> Result<Item, QueueError> {
        self.state.read().get_item_by_offset(1)
    }

    /// Item `offset` positions from the front; offset 1 is the front itself.
    pub fn peek_by_offset(&self, offset: u64) -> Result<Item, QueueError> {
        self.state.read().get_item_by_offset(offset)
    }

    pub fn peek_by_id(&self, id: u64) -> Result<Item, QueueError> {
        self.state.read().get_item_by_id(id)
    }

    /// Replace an item's payload without changing its position.
    ///
    /// The new value is persisted before `item.value` is touched, so on error
    /// the caller's item still holds the previous payload. Items that have
    /// already been dequeued are rejected with `Empty` or `OutOfBounds`.
    pub fn update(&self, item: &mut Item, new_value: &[u8]) -> Result<(), QueueError> {
        let state = self.state.write();

        let store = state.store()?;
        state.check_bounds(item.id)?;
        let key = id_to_key(item.id);
        store.put(&key, new_value)?;

        item.key = key;
        item.value = new_value.to_vec();

        debug!(id = item.id, size = new_value.len(), "Updated item");
        Ok(())
    }

    pub fn update_str(&self, item: &mut Item, new_value: &str) -> Result<(), QueueError> {
        self.update(item, new_value.as_bytes())
    }

    pub fn update_object<T: Serialize>(&self, item: &mut Item, value: &T) -> Result<(), QueueError> {
        let bytes = bincode::serialize(value)?;
        self.update(item, &bytes)
    }

    /// Number of items currently queued.
    ///
    /// Taken under the shared lock, so the count is consistent with any
    /// enqueue or dequeue that has already returned.
    pub fn length(&self) -> u64 {
        self.state.read().length()
    }

    pub fn is_empty(&self) -> bool {
        self.length() == 0
    }

    /// ID of the most recently dequeued item (0 if none).
    pub fn head(&self) -> u64 {
        self.state.read().head
    }

    /// ID of the most recently enqueued item (0 if none).
    pub fn tail(&self) -> u64 {
        self.state.read().tail
    }

    /// Flush and close the underlying store. Closing twice is a no-op.
    pub fn close(&self) -> Result<(), QueueError> {
        let mut state = self.state.write();
        let Some(store) = state.store.take() else {
            return Ok(());
        };

        let flushed = store.flush();
        drop(store);

        if let Err(e) = &flushed {
            error!(location = %self.location.display(), error = %e, "Flush on close failed");
        }
        info!(
            location = %self.location.display(),
            head = state.head,
            tail = state.tail,
            "Queue closed"
        );
        flushed.map_err(QueueError::from)
    }

    /// Close the queue and erase its storage location.
    pub fn drop_queue(self) -> Result<(), QueueError> {
        if let Err(e) = self.close() {
            warn!(error = %e, "Closing before drop failed; erasing storage anyway");
        }
        S::destroy(&self.location)?;
        info!(location = %self.location.display(), "Queue dropped");
        Ok(())
    }
}

/// Derive `(head, tail)` from the first and last keys in the store.
fn recover<S: OrderedStore>(store: &S) -> Result<(u64, u64), QueueError> {
    let first = match store.first_key()? {
        Some(key) => Some(key_to_id(&key)?),
        None => None,
    };
    let last = match store.last_key()? {
        Some(key) => Some(key_to_id(&key)?),
        None => None,
    };

    match (first, last) {
        (Some(first), Some(last)) => {
            if first == 0 {
                warn!("Store contains item ID 0, which the queue never assigns");
            }
            Ok((first.saturating_sub(1), last))
        }
        _ => Ok((0, 0)),
    }
}
