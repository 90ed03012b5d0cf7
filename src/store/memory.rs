//! In-memory implementation of [`SleepStore`].

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Bound;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{FollowRelation, SessionState, SleepSession, User};
use crate::store::SleepStore;

type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    /// Unique index on `users.handle`
    handles: HashMap<String, Uuid>,
    /// Keyed (followed_id, follower_id) so followers of a user are contiguous
    follows: BTreeMap<(Uuid, Uuid), FollowRelation>,
    sessions: HashMap<Uuid, SleepSession>,
    /// Unique index: user_id -> their in-progress session
    in_progress: HashMap<Uuid, Uuid>,
}

// == Memory Store ==
/// All tables behind one lock; every trait method holds it for its whole
/// body, so each call is a single atomic transaction.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a session as-is, bypassing the lifecycle checks. Used to load
    /// historical sessions.
    pub async fn seed_session(&self, session: SleepSession) {
        let mut tables = self.tables.write().await;
        if session.state == SessionState::InProgress {
            tables.in_progress.insert(session.user_id, session.id);
        }
        tables.sessions.insert(session.id, session);
    }
}

impl SleepStore for MemoryStore {
    async fn insert_user(&self, user: User) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.handles.contains_key(&user.handle) {
            return Ok(false);
        }
        tables.handles.insert(user.handle.clone(), user.id);
        tables.users.insert(user.id, user);
        Ok(true)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_handle(&self, handle: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .handles
            .get(handle)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn get_follow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<Option<FollowRelation>> {
        let tables = self.tables.read().await;
        Ok(tables.follows.get(&(followed_id, follower_id)).cloned())
    }

    async fn upsert_follow(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
        active: bool,
        at: DateTime<Utc>,
    ) -> Result<FollowRelation> {
        if follower_id == followed_id {
            return Err(StoreError::Integrity(format!(
                "user {} cannot follow themselves",
                follower_id
            )));
        }

        let mut tables = self.tables.write().await;
        let relation = tables
            .follows
            .entry((followed_id, follower_id))
            .and_modify(|relation| {
                relation.active = active;
                relation.updated_at = at;
            })
            .or_insert_with(|| FollowRelation {
                follower_id,
                followed_id,
                active,
                created_at: at,
                updated_at: at,
            });
        Ok(relation.clone())
    }

    async fn followers_after(&self, followed_id: Uuid, after: Option<Uuid>, limit: usize) -> Result<Vec<Uuid>> {
        let lower = match after {
            Some(cursor) => Bound::Excluded((followed_id, cursor)),
            None => Bound::Included((followed_id, Uuid::nil())),
        };
        let upper = Bound::Included((followed_id, Uuid::max()));

        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .range((lower, upper))
            .filter(|(_, relation)| relation.active)
            .map(|((_, follower_id), _)| *follower_id)
            .take(limit)
            .collect())
    }

    async fn get_session(&self, id: Uuid) -> Result<Option<SleepSession>> {
        Ok(self.tables.read().await.sessions.get(&id).cloned())
    }

    async fn find_in_progress(&self, user_id: Uuid) -> Result<Option<SleepSession>> {
        let tables = self.tables.read().await;
        Ok(tables
            .in_progress
            .get(&user_id)
            .and_then(|session_id| tables.sessions.get(session_id))
            .cloned())
    }

    async fn insert_in_progress(&self, session: SleepSession) -> Result<bool> {
        if session.state != SessionState::InProgress {
            return Err(StoreError::Integrity(format!(
                "session {} must be in progress to be opened",
                session.id
            )));
        }

        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&session.user_id) {
            return Err(StoreError::Integrity(format!("unknown user {}", session.user_id)));
        }
        if tables.in_progress.contains_key(&session.user_id) {
            return Ok(false);
        }
        tables.in_progress.insert(session.user_id, session.id);
        tables.sessions.insert(session.id, session);
        Ok(true)
    }

    async fn complete_session(&self, completed: SleepSession) -> Result<bool> {
        let mut tables = self.tables.write().await;

        let swapped = match tables.sessions.get_mut(&completed.id) {
            Some(stored) if stored.state == SessionState::InProgress => {
                *stored = completed.clone();
                true
            }
            _ => false,
        };

        if swapped {
            tables.in_progress.remove(&completed.user_id);
        }
        Ok(swapped)
    }

    async fn followed_sessions_since(
        &self,
        follower_id: Uuid,
        since: DateTime<Utc>,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SleepSession>> {
        let tables = self.tables.read().await;

        // The follows index is keyed by followed user, so this is a full scan
        let followed: HashSet<Uuid> = tables
            .follows
            .values()
            .filter(|relation| relation.active && relation.follower_id == follower_id)
            .map(|relation| relation.followed_id)
            .collect();
        if followed.is_empty() {
            return Ok(Vec::new());
        }

        let mut sessions: Vec<&SleepSession> = tables
            .sessions
            .values()
            .filter(|session| {
                session.is_completed()
                    && session.clocked_in_at >= since
                    && followed.contains(&session.user_id)
            })
            .collect();
        sessions.sort_by_key(|session| (Reverse(session.duration_seconds), session.id));

        Ok(sessions
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}
