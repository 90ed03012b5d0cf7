//! Cache Client Module
//!
//! The narrow cache interface the timeline core depends on, and its
//! implementation over the shared in-memory [`CacheStore`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::{CacheStats, CacheStore};
use crate::error::CacheError;

type Result<T> = std::result::Result<T, CacheError>;

// == Scored Member ==
/// A sorted-set member together with its score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredMember {
    pub member: String,
    pub score: i64,
}

// == Cache Client Trait ==
/// Abstraction over a hash + sorted-set key-value cache with TTL support.
///
/// Each call is atomic at the key level. Implementations must return `Send`
/// futures so the client can be used from tokio tasks and axum handlers.
pub trait CacheClient: Send + Sync + 'static {
    /// Returns every field of the hash at `key`, or None when absent.
    fn get_hash(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<HashMap<String, String>>>> + Send;

    /// Writes `fields` into the hash at `key`.
    fn set_hash(
        &self,
        key: &str,
        fields: HashMap<String, String>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Adds `member` with `score` to the sorted set at `key`.
    /// Returns true if the set changed.
    fn add_scored(
        &self,
        key: &str,
        member: &str,
        score: i64,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Returns members ranked `start..=stop`, highest score first.
    fn range_scored(
        &self,
        key: &str,
        start: usize,
        stop: usize,
    ) -> impl Future<Output = Result<Vec<ScoredMember>>> + Send;

    /// Sets the TTL of `key`. Returns false if the key does not exist.
    fn expire(&self, key: &str, ttl_seconds: u64) -> impl Future<Output = Result<bool>> + Send;

    /// Remaining TTL of `key` in seconds. None if the key is absent or never
    /// expires.
    fn ttl(&self, key: &str) -> impl Future<Output = Result<Option<u64>>> + Send;
}

// == Shared Cache ==
/// Thread-safe handle to an in-process [`CacheStore`].
#[derive(Debug, Clone)]
pub struct SharedCache {
    inner: Arc<RwLock<CacheStore>>,
}

impl SharedCache {
    pub fn new(store: CacheStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// The underlying lock-protected store, for maintenance tasks.
    pub fn store(&self) -> Arc<RwLock<CacheStore>> {
        self.inner.clone()
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }
}

impl CacheClient for SharedCache {
    async fn get_hash(&self, key: &str) -> Result<Option<HashMap<String, String>>> {
        // Write lock: reads update LRU order and statistics
        self.inner.write().await.get_hash(key)
    }

    async fn set_hash(&self, key: &str, fields: HashMap<String, String>) -> Result<()> {
        self.inner.write().await.set_hash(key, fields)
    }

    async fn add_scored(&self, key: &str, member: &str, score: i64) -> Result<bool> {
        let outcome = self.inner.write().await.add_scored(key, member, score)?;
        Ok(outcome.changed())
    }

    async fn range_scored(&self, key: &str, start: usize, stop: usize) -> Result<Vec<ScoredMember>> {
        let range = self.inner.write().await.rev_range_scored(key, start, stop)?;
        Ok(range
            .into_iter()
            .map(|(member, score)| ScoredMember { member, score })
            .collect())
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<bool> {
        self.inner.write().await.expire(key, ttl_seconds)
    }

    async fn ttl(&self, key: &str) -> Result<Option<u64>> {
        Ok(self.inner.write().await.ttl(key))
    }
}
