//! Sharded Cache Store Module
//!
//! The core caching strategy: a JSON payload of any size is serialized,
//! compressed, split into bounded-size chunks stored under derived keys,
//! and described by a small index entry holding the ordered chunk key list.
//! The index is written with a TTL one second shorter than its chunks, so a
//! reader that finds a live index can expect the chunks to still be there;
//! when a chunk has nonetheless vanished, the whole item reads as a miss.
//! A partial payload is never returned.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::cache::{crush, fingerprint, split_chunks, uncrush, CacheBackend};
use crate::error::{AdapterError, Result};

// == Index Record ==
/// Small cache entry describing one sharded payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Write time, milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Chunk keys in concatenation order
    pub subs: Vec<String>,
}

// == Cache Hit ==
/// A reassembled payload together with its index metadata.
#[derive(Debug, Clone)]
pub struct CacheHit {
    /// Write time, milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Chunk keys the payload was reassembled from
    pub subs: Vec<String>,
    /// The recovered value
    pub data: Value,
}

// == Sharded Cache ==
/// Compress-and-shard caching strategy over an injected backend.
#[derive(Debug, Clone)]
pub struct ShardedCache {
    /// Upper bound on one compressed chunk, in bytes
    max_chunk_len: usize,
}

impl ShardedCache {
    // == Constructor ==
    /// Creates a new ShardedCache.
    ///
    /// # Arguments
    /// * `max_chunk_len` - Maximum compressed chunk length in bytes; must
    ///   not exceed the backend's per-entry capacity
    pub fn new(max_chunk_len: usize) -> Self {
        Self { max_chunk_len }
    }

    // == Set ==
    /// Caches `value` under the given key tuple with a TTL in seconds.
    ///
    /// The value is serialized, compressed, and split; each chunk is stored
    /// under `fingerprint([index_key, position])` with the full TTL, then
    /// the index goes in under the tuple's own fingerprint with the TTL
    /// reduced by one second. A TTL of zero is legal and produces an index
    /// that is already expired, effectively no caching.
    ///
    /// Chunks written before a failure are left behind without rollback:
    /// the index is the only entry point for assembly, and orphans are
    /// reclaimed by TTL expiry.
    pub fn set<B: CacheBackend>(
        &self,
        backend: &mut B,
        key_parts: &[Value],
        value: &Value,
        ttl_seconds: u64,
    ) -> Result<IndexRecord> {
        let index_key = fingerprint(key_parts);

        let serialized = serde_json::to_string(value)
            .map_err(|e| AdapterError::Internal(format!("payload serialization failed: {}", e)))?;
        let crushed = crush(&serialized)?;

        let chunks = split_chunks(&crushed, self.max_chunk_len);

        // A chunk that cannot fit one backend entry means the configured
        // chunk length is wrong; refuse before writing anything.
        let limit = backend.entry_capacity();
        if let Some(oversized) = chunks.iter().find(|chunk| chunk.len() > limit) {
            return Err(AdapterError::ChunkTooLarge {
                size: oversized.len(),
                limit,
            });
        }

        let mut subs = Vec::with_capacity(chunks.len());
        for (position, chunk) in chunks.into_iter().enumerate() {
            let chunk_key = fingerprint(&[json!(index_key), json!(position)]);
            backend.put(&chunk_key, chunk, ttl_seconds)?;
            subs.push(chunk_key);
        }

        let record = IndexRecord {
            timestamp: Utc::now().timestamp_millis(),
            subs,
        };

        let index_json = serde_json::to_string(&record)
            .map_err(|e| AdapterError::Internal(format!("index serialization failed: {}", e)))?;
        // The index must never outlive a chunk.
        backend.put(&index_key, index_json, ttl_seconds.saturating_sub(1))?;

        Ok(record)
    }

    // == Get ==
    /// Reads the payload cached under the given key tuple.
    ///
    /// Returns `Ok(None)` when the index is absent, or when any chunk has
    /// expired out from under a live index (the expiry skew makes that
    /// unlikely but not impossible). Returns `CorruptPayload` when the
    /// assembled content fails to decode; callers treat that as a miss
    /// and recompute.
    pub fn get<B: CacheBackend>(
        &self,
        backend: &mut B,
        key_parts: &[Value],
    ) -> Result<Option<CacheHit>> {
        let index_key = fingerprint(key_parts);

        let raw_index = match backend.get(&index_key) {
            Some(raw) => raw,
            None => return Ok(None),
        };

        let record: IndexRecord = serde_json::from_str(&raw_index)
            .map_err(|e| AdapterError::CorruptPayload(format!("unreadable index: {}", e)))?;

        let mut assembled = String::new();
        for chunk_key in &record.subs {
            match backend.get(chunk_key) {
                Some(chunk) => assembled.push_str(&chunk),
                // A chunk disappeared independently of the index; the
                // whole item is a miss.
                None => return Ok(None),
            }
        }

        let text = uncrush(&assembled)?;
        let data = serde_json::from_str(&text)
            .map_err(|e| AdapterError::CorruptPayload(format!("unreadable payload: {}", e)))?;

        Ok(Some(CacheHit {
            timestamp: record.timestamp,
            subs: record.subs,
            data,
        }))
    }
}
