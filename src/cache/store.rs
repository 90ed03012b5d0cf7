//! Cache Store Module
//!
//! Main cache engine: typed values (hashes, sorted sets) per key, LRU
//! eviction at capacity and per-key TTL expiration.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::{AddOutcome, CacheEntry, CacheStats, CacheValue, LruTracker, SortedSet, MAX_KEY_LENGTH};
use crate::clock::Clock;
use crate::error::CacheError;

type Result<T> = std::result::Result<T, CacheError>;

// == Cache Store ==
/// Keyed storage of hashes and sorted sets with TTL support.
///
/// Every method is atomic with respect to a single key; callers share the
/// store behind a lock.
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of keys allowed
    max_entries: usize,
    /// Time source for TTL bookkeeping
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("entries", &self.entries.len())
            .field("max_entries", &self.max_entries)
            .field("stats", &self.stats)
            .finish()
    }
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of keys the cache can hold
    /// * `clock` - Time source used to evaluate TTLs
    pub fn new(max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
            clock,
        }
    }

    // == Set Hash ==
    /// Merges `fields` into the hash stored at `key`, creating it if needed.
    ///
    /// An existing TTL on the key is preserved.
    pub fn set_hash(&mut self, key: &str, fields: HashMap<String, String>) -> Result<()> {
        validate_key(key)?;
        let entry = self.entry_or_insert(key, || CacheValue::Hash(HashMap::new()))?;

        match &mut entry.value {
            CacheValue::Hash(hash) => {
                hash.extend(fields);
                Ok(())
            }
            other => Err(CacheError::WrongType {
                key: key.to_string(),
                actual: other.kind(),
            }),
        }
    }

    // == Get Hash ==
    /// Returns all fields of the hash at `key`, or None if absent or expired.
    pub fn get_hash(&mut self, key: &str) -> Result<Option<HashMap<String, String>>> {
        let Some(entry) = self.live_entry(key) else {
            self.stats.record_read(false);
            return Ok(None);
        };

        match &entry.value {
            CacheValue::Hash(hash) => {
                let hash = hash.clone();
                self.stats.record_read(true);
                self.lru.touch(key);
                Ok(Some(hash))
            }
            other => Err(CacheError::WrongType {
                key: key.to_string(),
                actual: other.kind(),
            }),
        }
    }

    // == Add Scored ==
    /// Adds `member` with `score` to the sorted set at `key`.
    ///
    /// Re-adding an identical `(member, score)` pair leaves the set unchanged.
    pub fn add_scored(&mut self, key: &str, member: &str, score: i64) -> Result<AddOutcome> {
        validate_key(key)?;
        let entry = self.entry_or_insert(key, || CacheValue::SortedSet(SortedSet::new()))?;

        match &mut entry.value {
            CacheValue::SortedSet(set) => Ok(set.add(member, score)),
            other => Err(CacheError::WrongType {
                key: key.to_string(),
                actual: other.kind(),
            }),
        }
    }

    // == Reverse Range ==
    /// Returns the members ranked `start..=stop` by descending score.
    ///
    /// Absent or expired keys read as an empty set.
    pub fn rev_range_scored(&mut self, key: &str, start: usize, stop: usize) -> Result<Vec<(String, i64)>> {
        let Some(entry) = self.live_entry(key) else {
            self.stats.record_read(false);
            return Ok(Vec::new());
        };

        match &entry.value {
            CacheValue::SortedSet(set) => {
                let range = set.rev_range(start, stop);
                self.stats.record_read(true);
                self.lru.touch(key);
                Ok(range)
            }
            other => Err(CacheError::WrongType {
                key: key.to_string(),
                actual: other.kind(),
            }),
        }
    }

    // == Expire ==
    /// Sets the TTL of `key` to `ttl_seconds` from now.
    ///
    /// Returns false if the key does not exist. A TTL of zero removes the key.
    pub fn expire(&mut self, key: &str, ttl_seconds: u64) -> Result<bool> {
        let now = self.clock.now_ms();
        if self.live_entry(key).is_none() {
            return Ok(false);
        }

        if ttl_seconds == 0 {
            self.remove_key(key);
            self.stats.record_expirations(1);
            return Ok(true);
        }

        if let Some(entry) = self.entries.get_mut(key) {
            entry.expire_in(ttl_seconds, now);
        }
        Ok(true)
    }

    // == TTL ==
    /// Remaining TTL in seconds; None if the key is absent or never expires.
    pub fn ttl(&mut self, key: &str) -> Option<u64> {
        let now = self.clock.now_ms();
        self.live_entry(key).and_then(|entry| entry.ttl_remaining(now))
    }

    // == Delete ==
    /// Removes an entry by key.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        if self.remove_key(key) {
            Ok(())
        } else {
            Err(CacheError::NotFound(key.to_string()))
        }
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.entries.len();
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_key(key);
        }

        self.stats.record_expirations(expired_keys.len());
        expired_keys.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Internals ==

    /// Returns the entry at `key`, purging it first if its TTL has elapsed.
    fn live_entry(&mut self, key: &str) -> Option<&CacheEntry> {
        let now = self.clock.now_ms();
        if self.entries.get(key)?.is_expired(now) {
            self.remove_key(key);
            self.stats.record_expirations(1);
            return None;
        }
        self.entries.get(key)
    }

    /// Returns the live entry at `key`, inserting `init()` if absent.
    ///
    /// Inserting a new key at capacity evicts the least recently used key.
    fn entry_or_insert(&mut self, key: &str, init: impl FnOnce() -> CacheValue) -> Result<&mut CacheEntry> {
        let now = self.clock.now_ms();

        if self.live_entry(key).is_none() {
            if self.entries.len() >= self.max_entries {
                let evicted = self.lru.evict_oldest().ok_or_else(|| {
                    CacheError::Unavailable("cache is full and nothing can be evicted".to_string())
                })?;
                self.entries.remove(&evicted);
                self.stats.record_eviction();
            }
            self.entries.insert(key.to_string(), CacheEntry::new(init(), now));
        }

        self.lru.touch(key);
        self.entries
            .get_mut(key)
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    }

    fn remove_key(&mut self, key: &str) -> bool {
        self.lru.remove(key);
        self.entries.remove(key).is_some()
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidRequest("Key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}
