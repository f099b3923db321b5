//! Queue item type.

use crate::error::QueueError;
use crate::key::{id_to_key, ItemKey};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::fmt;

/// Item: one element of the queue.
///
/// `key` is always the encoding of `id`; only the queue assigns either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: u64,
    pub key: ItemKey,
    pub value: Vec<u8>,
}

impl Item {
    pub(crate) fn new(id: u64, value: Vec<u8>) -> Self {
        Self {
            id,
            key: id_to_key(id),
            value,
        }
    }

    /// Borrow the payload as UTF-8 text.
    pub fn as_str(&self) -> Result<&str, QueueError> {
        std::str::from_utf8(&self.value)
            .map_err(|e| QueueError::IncompatibleType(format!("Payload is not UTF-8: {}", e)))
    }

    /// Payload as text, replacing invalid UTF-8 sequences.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.value)
    }

    /// Decode a payload written by `enqueue_object` or `update_object`.
    pub fn to_object<T: DeserializeOwned>(&self) -> Result<T, QueueError> {
        Ok(bincode::deserialize(&self.value)?)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} [{}] ({} bytes)",
            self.id,
            hex::encode(self.key),
            self.value.len()
        )
    }
}
