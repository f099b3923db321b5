//! fifoq: Durable FIFO Queue
//!
//! A first-in, first-out queue persisted in an embedded ordered key-value
//! store. Items are addressed by monotonically assigned IDs whose big-endian
//! encoding doubles as the store key, so queue order is key order and the
//! queue's bounds are recovered from the store on every open.

pub mod config;
pub mod error;
pub mod item;
pub mod key;
pub mod logging;
pub mod queue;
pub mod store;

pub use error::{QueueError, StorageError};
pub use item::Item;
pub use queue::Queue;
pub use store::{OrderedStore, SledStore, StoreOptions};
