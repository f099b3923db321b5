//! Key Codec
//!
//! Maps item IDs to store keys. Keys are 8-byte big-endian integers so that
//! byte-lexicographic order in the store matches numeric ID order.

use crate::error::QueueError;

/// Length of every key written by the queue.
pub const KEY_LEN: usize = 8;

/// Store key for an item ID.
pub type ItemKey = [u8; KEY_LEN];

/// Encode an ID as its store key.
pub fn id_to_key(id: u64) -> ItemKey {
    id.to_be_bytes()
}

/// Decode a store key back into an ID.
///
/// Fails with [`QueueError::KeyDecode`] if `key` is not exactly 8 bytes.
pub fn key_to_id(key: &[u8]) -> Result<u64, QueueError> {
    let bytes: ItemKey = key
        .try_into()
        .map_err(|_| QueueError::KeyDecode(key.len()))?;
    Ok(u64::from_be_bytes(bytes))
}
