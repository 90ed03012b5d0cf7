//! Cache Statistics Module
//!
//! Counters for lookups, evictions and TTL expirations.

use serde::Serialize;

// == Cache Stats ==
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Reads that found a live key
    pub hits: u64,
    /// Reads on absent or expired keys
    pub misses: u64,
    /// Keys dropped by the LRU policy at capacity
    pub evictions: u64,
    /// Keys dropped because their TTL elapsed
    pub expirations: u64,
    /// Keys currently stored (expired-but-unswept keys included)
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 before any read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Counts a read as a hit or a miss.
    pub fn record_read(&mut self, hit: bool) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }
}
