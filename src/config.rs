//! Configuration Module
//!
//! Handles loading and managing adapter configuration from environment
//! variables. All tunables that were previously scattered as globals live
//! here as named fields.

use std::env;

/// Default cache TTL for fetched table data, in minutes.
pub const DEFAULT_CACHE_TTL_MINUTES: u64 = 25;

/// Largest TTL override the host may request, in minutes.
pub const MAX_CACHE_TTL_MINUTES: u64 = 60;

/// Adapter configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Root URL of the remote OData service
    pub odata_endpoint: String,
    /// API key sent with every upstream request
    pub api_key: String,
    /// Default TTL in seconds for cached table data
    pub default_cache_ttl: u64,
    /// Per-entry size ceiling of the cache backend, in bytes
    pub max_entry_bytes: usize,
    /// Maximum length of one compressed payload chunk, in bytes.
    /// Kept under `max_entry_bytes` so a chunk always fits one entry.
    pub max_chunk_len: usize,
    /// Longest TTL the backend will accept, in seconds
    pub max_ttl_seconds: u64,
    /// Safety multiplier applied to the sampled row size when the row cache
    /// estimates how many rows fit one entry
    pub row_size_multiplier: f64,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `ODATA_ENDPOINT` - Root URL of the remote OData service (default: empty)
    /// - `ODATA_API_KEY` - API key for the remote service (default: empty)
    /// - `DEFAULT_CACHE_TTL` - Default data TTL in seconds (default: 1500)
    /// - `MAX_ENTRY_BYTES` - Backend per-entry ceiling in bytes (default: 100000)
    /// - `MAX_CHUNK_LEN` - Compressed chunk length in bytes (default: 90000)
    /// - `MAX_TTL_SECONDS` - Backend TTL cap in seconds (default: 21600)
    /// - `ROW_SIZE_MULTIPLIER` - Row size safety factor (default: 1.5)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            odata_endpoint: env::var("ODATA_ENDPOINT").unwrap_or_default(),
            api_key: env::var("ODATA_API_KEY").unwrap_or_default(),
            default_cache_ttl: env::var("DEFAULT_CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CACHE_TTL_MINUTES * 60),
            max_entry_bytes: env::var("MAX_ENTRY_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100_000),
            max_chunk_len: env::var("MAX_CHUNK_LEN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(90_000),
            max_ttl_seconds: env::var("MAX_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(21_600),
            row_size_multiplier: env::var("ROW_SIZE_MULTIPLIER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1.5),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }

    /// Resolves a host-supplied TTL override, in minutes, to a TTL in seconds.
    ///
    /// Overrides outside 0..=60 minutes fall back to the default of 25
    /// minutes; `None` keeps the configured default.
    pub fn resolve_cache_ttl(&self, override_minutes: Option<u64>) -> u64 {
        match override_minutes {
            Some(minutes) if minutes <= MAX_CACHE_TTL_MINUTES => minutes * 60,
            Some(_) => DEFAULT_CACHE_TTL_MINUTES * 60,
            None => self.default_cache_ttl,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            odata_endpoint: String::new(),
            api_key: String::new(),
            default_cache_ttl: DEFAULT_CACHE_TTL_MINUTES * 60,
            max_entry_bytes: 100_000,
            max_chunk_len: 90_000,
            max_ttl_seconds: 21_600,
            row_size_multiplier: 1.5,
            cleanup_interval: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.default_cache_ttl, 1500);
        assert_eq!(config.max_entry_bytes, 100_000);
        assert_eq!(config.max_chunk_len, 90_000);
        assert_eq!(config.max_ttl_seconds, 21_600);
        assert_eq!(config.cleanup_interval, 60);
    }

    #[test]
    fn test_chunk_length_fits_one_entry() {
        let config = Config::default();
        assert!(config.max_chunk_len <= config.max_entry_bytes);
    }

    #[test]
    fn test_resolve_cache_ttl_default() {
        let config = Config::default();
        assert_eq!(config.resolve_cache_ttl(None), 1500);
    }

    #[test]
    fn test_resolve_cache_ttl_override() {
        let config = Config::default();
        assert_eq!(config.resolve_cache_ttl(Some(10)), 600);
        assert_eq!(config.resolve_cache_ttl(Some(0)), 0);
        assert_eq!(config.resolve_cache_ttl(Some(60)), 3600);
    }

    #[test]
    fn test_resolve_cache_ttl_out_of_range_falls_back() {
        let config = Config::default();
        assert_eq!(config.resolve_cache_ttl(Some(61)), 1500);
        assert_eq!(config.resolve_cache_ttl(Some(10_000)), 1500);
    }
}
