//! Cache Backend Module
//!
//! The key-value store boundary the sharded cache layer is built over, plus
//! the in-process implementation used by the service. The backend contract
//! is deliberately narrow: string keys, string values with a per-entry size
//! ceiling, a mandatory TTL on every write capped by the backend, and reads
//! that signal absence rather than erroring on expired or missing keys.

use std::collections::HashMap;

use crate::cache::{CacheEntry, CacheStats};
use crate::error::{AdapterError, Result};

// == Cache Backend Trait ==
/// Capacity-bounded TTL key-value store consumed by the cache strategies.
///
/// Reads take `&mut self` because an implementation may drop expired
/// entries (and account for them) as they are observed.
pub trait CacheBackend {
    /// Reads one value. Absent, evicted, and expired keys all read as `None`.
    fn get(&mut self, key: &str) -> Option<String>;

    /// Reads many values, returning a mapping for the present keys only.
    fn get_all(&mut self, keys: &[String]) -> HashMap<String, String>;

    /// Writes one value with a TTL in seconds.
    fn put(&mut self, key: &str, value: String, ttl_seconds: u64) -> Result<()>;

    /// Writes many values, all sharing one TTL in seconds.
    fn put_all(&mut self, entries: Vec<(String, String)>, ttl_seconds: u64) -> Result<()>;

    /// The largest value, in bytes, a single entry may hold.
    fn entry_capacity(&self) -> usize;
}

// == Memory Backend ==
/// In-process backend keeping entries in a HashMap with expiry checked on
/// read and a periodic sweep for entries nobody reads again.
#[derive(Debug)]
pub struct MemoryBackend {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// Per-entry value size ceiling in bytes
    max_entry_bytes: usize,
    /// Longest TTL accepted; longer requests are clamped down
    max_ttl_seconds: u64,
}

impl MemoryBackend {
    // == Constructor ==
    /// Creates a new MemoryBackend.
    ///
    /// # Arguments
    /// * `max_entry_bytes` - Per-entry value size ceiling in bytes
    /// * `max_ttl_seconds` - Longest TTL accepted on a write
    pub fn new(max_entry_bytes: usize, max_ttl_seconds: u64) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            max_entry_bytes,
            max_ttl_seconds,
        }
    }

    // == Remove ==
    /// Removes an entry outright. Not part of the backend contract; exists
    /// so the sweep and tests can drop entries out-of-band.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == TTL Remaining ==
    /// Remaining TTL in seconds for a live entry, `None` if absent or expired.
    pub fn ttl_remaining(&self, key: &str) -> Option<u64> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.ttl_remaining())
    }

    // == Stats ==
    /// Returns current backend statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
            self.stats.record_expiration();
        }

        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Length ==
    /// Returns the current number of entries, live or not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the backend holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheBackend for MemoryBackend {
    fn get(&mut self, key: &str) -> Option<String> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.entries.remove(key);
                self.stats.record_expiration();
                self.stats.set_total_entries(self.entries.len());
                self.stats.record_miss();
                None
            }
            Some(entry) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    fn get_all(&mut self, keys: &[String]) -> HashMap<String, String> {
        let mut found = HashMap::new();
        for key in keys {
            if let Some(value) = self.get(key) {
                found.insert(key.clone(), value);
            }
        }
        found
    }

    fn put(&mut self, key: &str, value: String, ttl_seconds: u64) -> Result<()> {
        if value.len() > self.max_entry_bytes {
            return Err(AdapterError::EntryTooLarge {
                size: value.len(),
                limit: self.max_entry_bytes,
            });
        }

        let effective_ttl = ttl_seconds.min(self.max_ttl_seconds);
        self.entries
            .insert(key.to_string(), CacheEntry::new(value, effective_ttl));
        self.stats.set_total_entries(self.entries.len());

        Ok(())
    }

    fn put_all(&mut self, entries: Vec<(String, String)>, ttl_seconds: u64) -> Result<()> {
        for (key, value) in entries {
            self.put(&key, value, ttl_seconds)?;
        }
        Ok(())
    }

    fn entry_capacity(&self) -> usize {
        self.max_entry_bytes
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    fn test_backend() -> MemoryBackend {
        MemoryBackend::new(1024, 21_600)
    }

    #[test]
    fn test_backend_put_and_get() {
        let mut backend = test_backend();

        backend.put("key1", "value1".to_string(), 60).unwrap();
        let value = backend.get("key1");

        assert_eq!(value.as_deref(), Some("value1"));
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_backend_get_missing_is_absence() {
        let mut backend = test_backend();

        assert!(backend.get("nonexistent").is_none());
        assert_eq!(backend.stats().misses, 1);
    }

    #[test]
    fn test_backend_overwrite() {
        let mut backend = test_backend();

        backend.put("key1", "value1".to_string(), 60).unwrap();
        backend.put("key1", "value2".to_string(), 60).unwrap();

        assert_eq!(backend.get("key1").as_deref(), Some("value2"));
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_backend_expired_entry_reads_as_absent() {
        let mut backend = test_backend();

        backend.put("key1", "value1".to_string(), 1).unwrap();
        assert!(backend.get("key1").is_some());

        sleep(Duration::from_millis(1100));

        assert!(backend.get("key1").is_none());
        assert_eq!(backend.stats().expirations, 1);
        assert!(backend.is_empty());
    }

    #[test]
    fn test_backend_zero_ttl_is_immediate_miss() {
        let mut backend = test_backend();

        backend.put("key1", "value1".to_string(), 0).unwrap();

        assert!(backend.get("key1").is_none());
    }

    #[test]
    fn test_backend_value_too_large() {
        let mut backend = test_backend();
        let large_value = "x".repeat(1025);

        let result = backend.put("key", large_value, 60);
        assert!(matches!(result, Err(AdapterError::EntryTooLarge { .. })));
    }

    #[test]
    fn test_backend_value_at_capacity_accepted() {
        let mut backend = test_backend();
        let value = "x".repeat(1024);

        assert!(backend.put("key", value, 60).is_ok());
    }

    #[test]
    fn test_backend_ttl_clamped_to_maximum() {
        let mut backend = MemoryBackend::new(1024, 100);

        backend.put("key1", "value1".to_string(), 5000).unwrap();

        assert!(backend.ttl_remaining("key1").unwrap() <= 100);
    }

    #[test]
    fn test_backend_get_all_returns_present_only() {
        let mut backend = test_backend();

        backend.put("a", "1".to_string(), 60).unwrap();
        backend.put("b", "2".to_string(), 60).unwrap();

        let keys = vec!["a".to_string(), "missing".to_string(), "b".to_string()];
        let found = backend.get_all(&keys);

        assert_eq!(found.len(), 2);
        assert_eq!(found.get("a").map(String::as_str), Some("1"));
        assert_eq!(found.get("b").map(String::as_str), Some("2"));
        assert!(!found.contains_key("missing"));
    }

    #[test]
    fn test_backend_put_all_shares_one_ttl() {
        let mut backend = test_backend();

        backend
            .put_all(
                vec![
                    ("a".to_string(), "1".to_string()),
                    ("b".to_string(), "2".to_string()),
                ],
                60,
            )
            .unwrap();

        assert_eq!(backend.len(), 2);
        let ttl_a = backend.ttl_remaining("a").unwrap();
        let ttl_b = backend.ttl_remaining("b").unwrap();
        assert!(ttl_a.abs_diff(ttl_b) <= 1);
    }

    #[test]
    fn test_backend_cleanup_expired() {
        let mut backend = test_backend();

        backend.put("key1", "value1".to_string(), 1).unwrap();
        backend.put("key2", "value2".to_string(), 10).unwrap();

        sleep(Duration::from_millis(1100));

        let removed = backend.cleanup_expired();
        assert_eq!(removed, 1);
        assert_eq!(backend.len(), 1);
        assert!(backend.get("key2").is_some());
    }

    #[test]
    fn test_backend_remove() {
        let mut backend = test_backend();

        backend.put("key1", "value1".to_string(), 60).unwrap();
        assert!(backend.remove("key1"));
        assert!(!backend.remove("key1"));
        assert!(backend.get("key1").is_none());
    }
}
