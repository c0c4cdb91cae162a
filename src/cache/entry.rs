//! Cache Entry Module
//!
//! Defines the structure for individual backend entries. Every entry
//! carries a TTL; the backend has no notion of an immortal value.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// Represents a single stored entry with its expiry metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: String,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl_seconds` from now.
    pub fn new(value: String, ttl_seconds: u64) -> Self {
        let now = current_timestamp_ms();

        Self {
            value,
            created_at: now,
            expires_at: now + ttl_seconds * 1000,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired when the current time is
    /// greater than or equal to the expiration time, so a TTL of zero is
    /// expired the moment it is written.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }

    // == Time To Live ==
    /// Returns remaining TTL in seconds, zero once expired.
    pub fn ttl_remaining(&self) -> u64 {
        let now = current_timestamp_ms();
        if self.expires_at > now {
            (self.expires_at - now) / 1000
        } else {
            0
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("test_value".to_string(), 60);

        assert_eq!(entry.value, "test_value");
        assert!(!entry.is_expired());
        assert!(entry.expires_at > entry.created_at);
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("test_value".to_string(), 1);

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(1100));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let entry = CacheEntry::new("test_value".to_string(), 0);

        assert!(entry.is_expired());
        assert_eq!(entry.ttl_remaining(), 0);
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new("test_value".to_string(), 10);

        let remaining = entry.ttl_remaining();
        assert!(remaining <= 10);
        assert!(remaining >= 9);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = current_timestamp_ms();
        let entry = CacheEntry {
            value: "test".to_string(),
            created_at: now,
            expires_at: now, // Expires exactly at creation time
        };

        assert!(entry.is_expired(), "Entry should be expired at boundary");
    }
}
