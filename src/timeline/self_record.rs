//! Self Record Writer
//!
//! Mirrors a completed session into its owner's leaderboard and writes the
//! `session-meta` hash every timeline read hydrates from.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::SecondsFormat;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::keys::{self, meta};
use crate::cache::CacheClient;
use crate::clock::Clock;
use crate::error::{AppError, Result};
use crate::models::{SleepSession, User};
use crate::store::SleepStore;
use crate::timeline::TimelineMember;

/// What a self-record write did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfRecordOutcome {
    /// Leaderboard entry and metadata were written with this TTL
    Written { ttl_seconds: u64 },
    /// The visibility window had already closed; nothing was written
    OutsideWindow,
}

// == Self Record Writer ==
pub struct SelfRecordWriter<S, C> {
    store: Arc<S>,
    cache: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<S: SleepStore, C: CacheClient> SelfRecordWriter<S, C> {
    pub fn new(store: Arc<S>, cache: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self { store, cache, clock }
    }

    // == Write ==
    /// Writes the owner's leaderboard member and the session metadata.
    ///
    /// # Errors
    /// - `NotClockedOut` if the session is missing or still in progress
    /// - `UserNotFound` if the owner no longer exists
    pub async fn write(&self, session_id: Uuid) -> Result<SelfRecordOutcome> {
        let session = self
            .store
            .get_session(session_id)
            .await?
            .filter(SleepSession::is_completed)
            .ok_or(AppError::NotClockedOut(session_id))?;
        let owner = self
            .store
            .get_user(session.user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let remaining = (session.visibility_deadline() - self.clock.now()).num_seconds();
        if remaining <= 0 {
            debug!(%session_id, "Session is past its visibility window, skipping self record");
            return Ok(SelfRecordOutcome::OutsideWindow);
        }
        let ttl_seconds = remaining as u64;

        let member = TimelineMember::for_session(&session).to_string();
        let leaderboard_key = keys::leaderboard(owner.id);
        self.cache
            .add_scored(&leaderboard_key, &member, session.duration_seconds)
            .await?;
        // The board lives as long as its newest session; only ever extend it
        let current_ttl = self.cache.ttl(&leaderboard_key).await?;
        if current_ttl.map_or(true, |current| ttl_seconds > current) {
            self.cache.expire(&leaderboard_key, ttl_seconds).await?;
        }

        let meta_key = keys::session_meta(session.id);
        self.cache
            .set_hash(&meta_key, metadata_fields(&session, &owner))
            .await?;
        self.cache.expire(&meta_key, ttl_seconds).await?;

        info!(
            %session_id,
            owner_id = %owner.id,
            duration = session.duration_seconds,
            ttl_seconds,
            "Self record written"
        );
        Ok(SelfRecordOutcome::Written { ttl_seconds })
    }
}

/// Fields of the `session-meta:<sessionId>` hash.
fn metadata_fields(session: &SleepSession, owner: &User) -> HashMap<String, String> {
    let iso = |at: chrono::DateTime<chrono::Utc>| at.to_rfc3339_opts(SecondsFormat::Secs, true);

    let mut fields = HashMap::from([
        (meta::USER_ID.to_string(), owner.id.to_string()),
        (meta::USERNAME.to_string(), owner.handle.clone()),
        (meta::CLOCKED_IN_AT.to_string(), iso(session.clocked_in_at)),
        (meta::DURATION.to_string(), session.duration_seconds.to_string()),
    ]);
    if let Some(clocked_out_at) = session.clocked_out_at {
        fields.insert(meta::CLOCKED_OUT_AT.to_string(), iso(clocked_out_at));
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheClient;
    use crate::testing::Fixture;
    use chrono::Duration;

    #[tokio::test]
    async fn test_writes_leaderboard_and_metadata() {
        let fx = Fixture::new();
        let bob = fx.user("bob").await;
        let session = fx.completed_session(&bob, fx.now() - Duration::hours(8), 28_800).await;

        let outcome = fx.self_writer().write(session.id).await.unwrap();

        let expected_ttl = (session.visibility_deadline() - fx.now()).num_seconds() as u64;
        assert_eq!(outcome, SelfRecordOutcome::Written { ttl_seconds: expected_ttl });

        let board = fx.cache.range_scored(&keys::leaderboard(bob.id), 0, 99).await.unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].member, TimelineMember::for_session(&session).to_string());
        assert_eq!(board[0].score, 28_800);

        let meta = fx.cache.get_hash(&keys::session_meta(session.id)).await.unwrap().unwrap();
        assert_eq!(meta[meta::USER_ID], bob.id.to_string());
        assert_eq!(meta[meta::USERNAME], "bob");
        assert_eq!(meta[meta::CLOCKED_IN_AT], "2025-03-10T22:00:00Z");
        assert_eq!(meta[meta::CLOCKED_OUT_AT], "2025-03-11T06:00:00Z");
        assert_eq!(meta[meta::DURATION], "28800");

        let ttl = fx.cache.store().write().await.ttl(&keys::session_meta(session.id));
        assert_eq!(ttl, Some(expected_ttl));
    }

    #[tokio::test]
    async fn test_rewrite_is_idempotent() {
        let fx = Fixture::new();
        let bob = fx.user("bob").await;
        let session = fx.completed_session(&bob, fx.now() - Duration::hours(8), 28_800).await;
        let writer = fx.self_writer();

        writer.write(session.id).await.unwrap();
        let board_once = fx.cache.range_scored(&keys::leaderboard(bob.id), 0, 99).await.unwrap();
        let meta_once = fx.cache.get_hash(&keys::session_meta(session.id)).await.unwrap();

        writer.write(session.id).await.unwrap();
        assert_eq!(fx.cache.range_scored(&keys::leaderboard(bob.id), 0, 99).await.unwrap(), board_once);
        assert_eq!(fx.cache.get_hash(&keys::session_meta(session.id)).await.unwrap(), meta_once);
    }

    #[tokio::test]
    async fn test_older_session_does_not_shorten_leaderboard_ttl() {
        let fx = Fixture::new();
        let bob = fx.user("bob").await;
        let recent = fx.completed_session(&bob, fx.now() - Duration::hours(10), 28_800).await;
        let older = fx.completed_session(&bob, fx.now() - Duration::days(6), 25_200).await;
        let writer = fx.self_writer();
        let board = keys::leaderboard(bob.id);

        writer.write(recent.id).await.unwrap();
        let ttl_after_recent = fx.cache.ttl(&board).await.unwrap();
        // A retried task delivers the older session last
        writer.write(older.id).await.unwrap();
        assert_eq!(fx.cache.ttl(&board).await.unwrap(), ttl_after_recent);

        // A day later the older session has aged out but the board survives
        fx.clock.advance(Duration::days(1));
        let members = fx.cache.range_scored(&board, 0, 99).await.unwrap();
        assert_eq!(members.len(), 2);
        assert!(members
            .iter()
            .any(|m| m.member == TimelineMember::for_session(&recent).to_string()));
    }

    #[tokio::test]
    async fn test_past_visibility_window_writes_nothing() {
        let fx = Fixture::new();
        let bob = fx.user("bob").await;
        let session = fx.completed_session(&bob, fx.now() - Duration::days(8), 28_800).await;

        let outcome = fx.self_writer().write(session.id).await.unwrap();

        assert_eq!(outcome, SelfRecordOutcome::OutsideWindow);
        assert!(fx.cache.store().read().await.is_empty());
    }

    #[tokio::test]
    async fn test_in_progress_session_is_rejected() {
        let fx = Fixture::new();
        let bob = fx.user("bob").await;
        let session = fx.open_session(&bob, fx.now() - Duration::hours(1)).await;

        let result = fx.self_writer().write(session.id).await;
        assert!(matches!(result, Err(AppError::NotClockedOut(id)) if id == session.id));
        assert!(fx.cache.store().read().await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_session_is_rejected() {
        let fx = Fixture::new();
        let result = fx.self_writer().write(Uuid::now_v7()).await;
        assert!(matches!(result, Err(AppError::NotClockedOut(_))));
    }
}
