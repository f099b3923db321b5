//! Property-based tests for the key codec

use fifoq::key::{id_to_key, key_to_id};
use proptest::prelude::*;

/// Decoding an encoded ID yields the same ID
#[test]
fn test_key_round_trip_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&any::<u64>(), |id| {
            prop_assert_eq!(key_to_id(&id_to_key(id)).unwrap(), id);
            Ok(())
        })
        .unwrap();
}

/// Byte order of keys matches numeric order of IDs
#[test]
fn test_key_order_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(any::<u64>(), any::<u64>()), |(a, b)| {
            prop_assert_eq!(id_to_key(a).cmp(&id_to_key(b)), a.cmp(&b));
            Ok(())
        })
        .unwrap();
}

proptest! {
    /// Anything that is not exactly 8 bytes is rejected
    #[test]
    fn test_wrong_length_keys_rejected(bytes in proptest::collection::vec(any::<u8>(), 0..32)) {
        prop_assume!(bytes.len() != 8);
        prop_assert!(key_to_id(&bytes).is_err());
    }
}
