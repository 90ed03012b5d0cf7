//! Cache Module
//!
//! In-memory hash and sorted-set cache with TTL expiration and LRU eviction,
//! plus the client interface the timeline core talks to.

mod client;
mod entry;
pub mod keys;
mod lru;
mod sorted_set;
mod stats;
mod store;


// Re-export public types
pub use client::{CacheClient, ScoredMember, SharedCache};
pub use entry::{CacheEntry, CacheValue};
pub use lru::LruTracker;
pub use sorted_set::{AddOutcome, SortedSet};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
