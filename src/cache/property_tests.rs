//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify the structural guarantees of the fingerprint,
//! chunking, and sharded storage layers.

use proptest::prelude::*;
use serde_json::{json, Value};

use crate::cache::{fingerprint, split_chunks, MemoryBackend, ShardedCache};

// == Test Configuration ==
const TEST_ENTRY_CAPACITY: usize = 100_000;
const TEST_MAX_TTL: u64 = 21_600;

// == Strategies ==
/// Generates arbitrary text, including empty and multibyte inputs
fn text_strategy() -> impl Strategy<Value = String> {
    ".{0,400}"
}

/// Generates key part tuples mixing strings, numbers, and null
fn key_parts_strategy() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(
        prop_oneof![
            "[a-zA-Z0-9_]{1,16}".prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            Just(Value::Null),
        ],
        1..5,
    )
}

/// Generates JSON-serializable payloads of modest depth
fn payload_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,64}".prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        prop::collection::vec(any::<i32>().prop_map(Value::from), 0..50)
            .prop_map(Value::Array),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Concatenating the chunks in order reproduces the input exactly,
    // for all strings and all positive chunk lengths.
    #[test]
    fn prop_chunk_round_trip(text in text_strategy(), max_len in 1usize..64) {
        let chunks = split_chunks(&text, max_len);
        prop_assert_eq!(chunks.concat(), text);
    }

    // Empty input is the only input producing zero chunks.
    #[test]
    fn prop_chunk_count_matches_emptiness(text in text_strategy(), max_len in 1usize..64) {
        let chunks = split_chunks(&text, max_len);
        prop_assert_eq!(chunks.is_empty(), text.is_empty());
    }

    // ASCII input never yields a chunk above the limit.
    #[test]
    fn prop_chunk_respects_limit_for_ascii(text in "[ -~]{0,200}", max_len in 1usize..32) {
        for chunk in split_chunks(&text, max_len) {
            prop_assert!(chunk.len() <= max_len);
        }
    }

    // Repeated fingerprinting of an equal tuple is stable.
    #[test]
    fn prop_fingerprint_deterministic(parts in key_parts_strategy()) {
        prop_assert_eq!(fingerprint(&parts), fingerprint(&parts));
    }

    // Reversing a tuple of two distinct parts changes the fingerprint.
    #[test]
    fn prop_fingerprint_order_sensitive(
        a in "[a-z]{1,12}",
        b in "[a-z]{1,12}",
    ) {
        prop_assume!(a != b);
        let ab = [json!(a.clone()), json!(b.clone())];
        let ba = [json!(b), json!(a)];
        prop_assert_ne!(fingerprint(&ab), fingerprint(&ba));
    }

    // Fingerprints are always 27 URL-safe characters.
    #[test]
    fn prop_fingerprint_shape(parts in key_parts_strategy()) {
        let fp = fingerprint(&parts);
        prop_assert_eq!(fp.len(), 27);
        prop_assert!(fp.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    // Whatever goes through set comes back identical through get, for any
    // payload, key tuple, and positive TTL.
    #[test]
    fn prop_sharded_round_trip(
        parts in key_parts_strategy(),
        payload in payload_strategy(),
        ttl in 1u64..3600,
        max_chunk_len in 16usize..256,
    ) {
        let cache = ShardedCache::new(max_chunk_len);
        let mut backend = MemoryBackend::new(TEST_ENTRY_CAPACITY, TEST_MAX_TTL);

        cache.set(&mut backend, &parts, &payload, ttl).unwrap();
        let hit = cache.get(&mut backend, &parts).unwrap();

        prop_assert!(hit.is_some(), "fresh write must read back");
        prop_assert_eq!(hit.unwrap().data, payload);
    }
}
