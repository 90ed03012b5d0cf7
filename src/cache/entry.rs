//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::collections::HashMap;

use crate::cache::SortedSet;

// == Cache Value ==
/// The data structure stored under a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheValue {
    /// Field -> value map
    Hash(HashMap<String, String>),
    /// Score-ranked member set
    SortedSet(SortedSet),
}

impl CacheValue {
    /// Name of the structure, used in type-mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            CacheValue::Hash(_) => "hash",
            CacheValue::SortedSet(_) => "sorted set",
        }
    }
}

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: CacheValue,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<i64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry without expiration.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `now_ms` - Current Unix time in milliseconds
    pub fn new(value: CacheValue, now_ms: i64) -> Self {
        Self {
            value,
            created_at: now_ms,
            expires_at: None,
        }
    }

    // == Expire ==
    /// Sets the expiration to `ttl_seconds` after `now_ms`.
    pub fn expire_in(&mut self, ttl_seconds: u64, now_ms: i64) {
        let ttl_ms = i64::try_from(ttl_seconds.saturating_mul(1000)).unwrap_or(i64::MAX);
        self.expires_at = Some(now_ms.saturating_add(ttl_ms));
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiration time.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in seconds, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(0)` if the entry has expired
    /// - `Some(remaining_seconds)` if the entry has TTL and hasn't expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining(&self, now_ms: i64) -> Option<u64> {
        self.expires_at
            .map(|expires| u64::try_from((expires - now_ms).max(0) / 1000).unwrap_or(0))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_741_644_000_000;

    fn hash_value() -> CacheValue {
        CacheValue::Hash(HashMap::from([("field".to_string(), "value".to_string())]))
    }

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = CacheEntry::new(hash_value(), NOW);

        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired(NOW + 10_000_000));
        assert!(entry.ttl_remaining(NOW).is_none());
    }

    #[test]
    fn test_entry_expire_in() {
        let mut entry = CacheEntry::new(hash_value(), NOW);
        entry.expire_in(60, NOW);

        assert_eq!(entry.expires_at, Some(NOW + 60_000));
        assert!(!entry.is_expired(NOW + 59_999));
        assert_eq!(entry.ttl_remaining(NOW + 30_000), Some(30));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let mut entry = CacheEntry::new(hash_value(), NOW);
        entry.expire_in(0, NOW);

        assert!(entry.is_expired(NOW), "Entry should be expired at boundary");
        assert_eq!(entry.ttl_remaining(NOW + 5_000), Some(0));
    }

    #[test]
    fn test_value_kind() {
        assert_eq!(hash_value().kind(), "hash");
        assert_eq!(CacheValue::SortedSet(SortedSet::new()).kind(), "sorted set");
    }
}
