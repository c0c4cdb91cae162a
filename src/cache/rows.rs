//! Row Cache Module
//!
//! Sibling strategy to the sharded blob store, used for homogeneous table
//! rows: instead of compressing one payload, whole rows are distributed
//! across several entries sized by estimated byte footprint, trading
//! compression for direct row-level reassembly. Shard keys are random
//! rather than content-derived: row grouping is not idempotent across
//! calls, so derived keys would buy nothing.

use serde_json::Value;
use uuid::Uuid;

use crate::cache::{CacheBackend, KEY_LIST_SEPARATOR};
use crate::error::{AdapterError, Result};

// == Row Cache ==
/// Row-distributing caching strategy over an injected backend.
#[derive(Debug, Clone)]
pub struct RowCache {
    /// Byte budget for one shard entry
    max_entry_bytes: usize,
    /// Safety factor applied to the sampled row size, covering size
    /// variance across rows
    row_size_multiplier: f64,
}

impl RowCache {
    // == Constructor ==
    /// Creates a new RowCache.
    ///
    /// # Arguments
    /// * `max_entry_bytes` - Byte budget for one shard entry
    /// * `row_size_multiplier` - Sampled row size inflation factor (>= 1.0)
    pub fn new(max_entry_bytes: usize, row_size_multiplier: f64) -> Self {
        Self {
            max_entry_bytes,
            row_size_multiplier,
        }
    }

    // == Set Rows ==
    /// Distributes `rows` across shard entries and records the shard key
    /// list under `entity_key`. Index and shards share one TTL.
    ///
    /// Returns the shard keys in write order.
    pub fn set_rows<B: CacheBackend>(
        &self,
        backend: &mut B,
        entity_key: &str,
        rows: &[Value],
        ttl_seconds: u64,
    ) -> Result<Vec<String>> {
        let rows_per_chunk = self.rows_per_chunk(rows)?;

        let mut keys = Vec::new();
        let mut shards = Vec::new();
        for group in rows.chunks(rows_per_chunk) {
            let serialized = serde_json::to_string(group)
                .map_err(|e| AdapterError::Internal(format!("row serialization failed: {}", e)))?;
            keys.push(Uuid::new_v4().to_string());
            shards.push(serialized);
        }

        let key_list = keys.join(KEY_LIST_SEPARATOR);
        let entries = keys.iter().cloned().zip(shards).collect();

        backend.put_all(entries, ttl_seconds)?;
        backend.put(entity_key, key_list, ttl_seconds)?;

        Ok(keys)
    }

    // == Get Rows ==
    /// Reassembles the rows cached under `entity_key`.
    ///
    /// Shards are bulk-read but concatenated strictly in the stored key
    /// order, never in backend iteration order. Any missing shard makes
    /// the whole item a miss.
    pub fn get_rows<B: CacheBackend>(
        &self,
        backend: &mut B,
        entity_key: &str,
    ) -> Result<Option<Vec<Value>>> {
        let key_list = match backend.get(entity_key) {
            Some(list) => list,
            None => return Ok(None),
        };

        if key_list.is_empty() {
            return Ok(Some(Vec::new()));
        }

        let keys: Vec<String> = key_list
            .split(KEY_LIST_SEPARATOR)
            .map(str::to_string)
            .collect();
        let shards = backend.get_all(&keys);

        let mut rows = Vec::new();
        for key in &keys {
            let serialized = match shards.get(key) {
                Some(shard) => shard,
                None => return Ok(None),
            };
            let group: Vec<Value> = serde_json::from_str(serialized)
                .map_err(|e| AdapterError::CorruptPayload(format!("unreadable shard: {}", e)))?;
            rows.extend(group);
        }

        Ok(Some(rows))
    }

    /// How many rows fit one shard, judged from the first row's serialized
    /// size inflated by the safety multiplier. Always at least one.
    fn rows_per_chunk(&self, rows: &[Value]) -> Result<usize> {
        let sample = match rows.first() {
            Some(row) => row,
            None => return Ok(1),
        };

        let serialized = serde_json::to_string(sample)
            .map_err(|e| AdapterError::Internal(format!("row serialization failed: {}", e)))?;
        let estimated = (serialized.len() as f64 * self.row_size_multiplier).max(1.0);

        Ok(((self.max_entry_bytes as f64 / estimated) as usize).max(1))
    }
}
