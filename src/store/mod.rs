//! Relational Store Module
//!
//! The source of truth for users, follow relations and sleep sessions. The
//! timeline core depends on the [`SleepStore`] trait; [`MemoryStore`] is the
//! in-process backend.

mod memory;

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{FollowRelation, SleepSession, User};

pub use memory::MemoryStore;

type Result<T> = std::result::Result<T, StoreError>;

// == Sleep Store Trait ==
/// Abstraction over the relational backend.
///
/// Each method is atomic. Uniqueness (one handle per user, one follow
/// relation per pair, one in-progress session per user) and the session
/// compare-and-swap are enforced here, not by callers.
pub trait SleepStore: Send + Sync + 'static {
    // ── Users ─────────────────────────────────────────────────────────────

    /// Persists a user. Returns false if the handle is already taken.
    fn insert_user(&self, user: User) -> impl Future<Output = Result<bool>> + Send;

    fn get_user(&self, id: Uuid) -> impl Future<Output = Result<Option<User>>> + Send;

    fn find_user_by_handle(&self, handle: &str) -> impl Future<Output = Result<Option<User>>> + Send;

    // ── Follow relations ──────────────────────────────────────────────────

    fn get_follow(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
    ) -> impl Future<Output = Result<Option<FollowRelation>>> + Send;

    /// Creates the relation or updates `active` on the existing one.
    fn upsert_follow(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
        active: bool,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<FollowRelation>> + Send;

    /// Active followers of `followed_id` ordered by id, strictly after
    /// `after`, at most `limit` of them.
    fn followers_after(
        &self,
        followed_id: Uuid,
        after: Option<Uuid>,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Uuid>>> + Send;

    // ── Sleep sessions ────────────────────────────────────────────────────

    fn get_session(&self, id: Uuid) -> impl Future<Output = Result<Option<SleepSession>>> + Send;

    fn find_in_progress(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Option<SleepSession>>> + Send;

    /// Inserts an in-progress session. Returns false, writing nothing, if
    /// the user already has one.
    fn insert_in_progress(&self, session: SleepSession) -> impl Future<Output = Result<bool>> + Send;

    /// Replaces the stored session with its completed form, only if the
    /// stored row is still in progress. Returns false if the swap lost.
    fn complete_session(&self, completed: SleepSession) -> impl Future<Output = Result<bool>> + Send;

    /// Completed sessions clocked in at or after `since` whose owners
    /// `follower_id` actively follows. Longest first, ties by session id;
    /// `offset` rows are skipped and at most `limit` returned.
    fn followed_sessions_since(
        &self,
        follower_id: Uuid,
        since: DateTime<Utc>,
        offset: usize,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<SleepSession>>> + Send;
}
