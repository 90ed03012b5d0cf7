//! Timeline Push Writer
//!
//! Writes one completed session into one follower's precomputed timeline.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::keys;
use crate::cache::CacheClient;
use crate::clock::Clock;
use crate::error::{AppError, Result};
use crate::models::{SleepSession, VISIBILITY_WINDOW_SECS};
use crate::store::SleepStore;
use crate::timeline::TimelineMember;

/// TTL applied to `timeline:<followerId>` on every push.
pub const TIMELINE_TTL_SECS: u64 = VISIBILITY_WINDOW_SECS as u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Entry is present in the follower's timeline. `changed` is false when
    /// an identical entry was already there.
    Written { changed: bool },
    /// The session's visibility window had closed; nothing was written
    OutsideWindow,
}

// == Timeline Push Writer ==
pub struct TimelinePushWriter<S, C> {
    store: Arc<S>,
    cache: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<S: SleepStore, C: CacheClient> TimelinePushWriter<S, C> {
    pub fn new(store: Arc<S>, cache: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self { store, cache, clock }
    }

    // == Push ==
    /// Adds `session_id` to the timeline of `follower_id`.
    ///
    /// All checks run before the first cache write.
    ///
    /// # Errors
    /// - `NotClockedOut` if the session is missing or still in progress
    /// - `UserNotFound` if the follower does not exist
    /// - `AlreadyUnfollowed` if the follower no longer follows the owner
    pub async fn push(&self, session_id: Uuid, follower_id: Uuid) -> Result<PushOutcome> {
        let session = self
            .store
            .get_session(session_id)
            .await?
            .filter(SleepSession::is_completed)
            .ok_or(AppError::NotClockedOut(session_id))?;
        self.store
            .get_user(follower_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let following = self
            .store
            .get_follow(follower_id, session.user_id)
            .await?
            .is_some_and(|relation| relation.active);
        if !following {
            return Err(AppError::AlreadyUnfollowed);
        }

        let member = TimelineMember::for_session(&session);
        if member.is_expired(self.clock.now().timestamp()) {
            debug!(%session_id, %follower_id, "Session is past its visibility window, skipping push");
            return Ok(PushOutcome::OutsideWindow);
        }

        let timeline_key = keys::timeline(follower_id);
        let changed = self
            .cache
            .add_scored(&timeline_key, &member.to_string(), session.duration_seconds)
            .await?;
        self.cache.expire(&timeline_key, TIMELINE_TTL_SECS).await?;

        info!(%session_id, %follower_id, changed, "Session pushed to timeline");
        Ok(PushOutcome::Written { changed })
    }
}
