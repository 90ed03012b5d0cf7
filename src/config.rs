//! Configuration Module
//!
//! Loads server, cache and pipeline settings from environment variables.

use std::env;
use std::str::FromStr;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Maximum number of keys the timeline cache can hold
    pub cache_max_entries: usize,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Followers loaded per page during fan-out
    pub fanout_batch_size: usize,
    /// Timeline members fetched per cache round trip
    pub timeline_batch_size: usize,
    /// Most timeline members one read may examine
    pub timeline_scan_limit: usize,
    /// Attempts per task before it is dropped
    pub task_max_attempts: u32,
    /// Bound of the in-process task channel
    pub task_queue_capacity: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache keys (default: 100000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 60)
    /// - `FANOUT_BATCH_SIZE` - Followers per fan-out page (default: 100)
    /// - `TIMELINE_BATCH_SIZE` - Members per timeline fetch (default: 100)
    /// - `TIMELINE_SCAN_LIMIT` - Members examined per read (default: 10000)
    /// - `TASK_MAX_ATTEMPTS` - Attempts per task (default: 3)
    /// - `TASK_QUEUE_CAPACITY` - Task channel bound (default: 1024)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cache_max_entries: env_or("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            fanout_batch_size: env_or("FANOUT_BATCH_SIZE", defaults.fanout_batch_size),
            timeline_batch_size: env_or("TIMELINE_BATCH_SIZE", defaults.timeline_batch_size),
            timeline_scan_limit: env_or("TIMELINE_SCAN_LIMIT", defaults.timeline_scan_limit),
            task_max_attempts: env_or("TASK_MAX_ATTEMPTS", defaults.task_max_attempts),
            task_queue_capacity: env_or("TASK_QUEUE_CAPACITY", defaults.task_queue_capacity),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_max_entries: 100_000,
            cleanup_interval: 60,
            fanout_batch_size: 100,
            timeline_batch_size: 100,
            timeline_scan_limit: 10_000,
            task_max_attempts: 3,
            task_queue_capacity: 1024,
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
        assert_eq!(config.cache_max_entries, 100_000);
        assert_eq!(config.cleanup_interval, 60);
        assert_eq!(config.fanout_batch_size, 100);
        assert_eq!(config.timeline_batch_size, 100);
        assert_eq!(config.timeline_scan_limit, 10_000);
        assert_eq!(config.task_max_attempts, 3);
        assert_eq!(config.task_queue_capacity, 1024);
    }

    #[test]
    fn test_env_or_parses_and_falls_back() {
        env::set_var("SLEEP_TIMELINE_TEST_NUMBER", "42");
        env::set_var("SLEEP_TIMELINE_TEST_GARBAGE", "forty-two");
        env::remove_var("SLEEP_TIMELINE_TEST_MISSING");

        assert_eq!(env_or("SLEEP_TIMELINE_TEST_NUMBER", 7usize), 42);
        assert_eq!(env_or("SLEEP_TIMELINE_TEST_GARBAGE", 7usize), 7);
        assert_eq!(env_or("SLEEP_TIMELINE_TEST_MISSING", 7u32), 7);
    }
}
