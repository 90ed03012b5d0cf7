//! Follow / unfollow toggles on the follow relation.
//!
//! Unfollowing does not retract entries already pushed into the follower's
//! timeline; they age out with their visibility window.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{AppError, Result};
use crate::models::FollowRelation;
use crate::store::SleepStore;

pub struct FollowService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S: SleepStore> FollowService<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    // == Follow ==
    /// Starts following `target_id`, reactivating a previous relation if any.
    ///
    /// # Errors
    /// - `UserNotFound` if either user does not exist
    /// - `CannotFollowSelf` if `follower_id == target_id`
    /// - `AlreadyFollowed` if the relation is already active
    pub async fn follow(&self, follower_id: Uuid, target_id: Uuid) -> Result<FollowRelation> {
        self.require_users(follower_id, target_id).await?;
        if follower_id == target_id {
            return Err(AppError::CannotFollowSelf);
        }

        let existing = self.store.get_follow(follower_id, target_id).await?;
        if existing.is_some_and(|relation| relation.active) {
            return Err(AppError::AlreadyFollowed);
        }

        let relation = self
            .store
            .upsert_follow(follower_id, target_id, true, self.clock.now())
            .await?;
        info!(%follower_id, %target_id, "Followed");
        Ok(relation)
    }

    // == Unfollow ==
    /// Deactivates the relation to `target_id`.
    ///
    /// # Errors
    /// - `UserNotFound` if either user does not exist
    /// - `AlreadyUnfollowed` if there is no active relation
    pub async fn unfollow(&self, follower_id: Uuid, target_id: Uuid) -> Result<FollowRelation> {
        self.require_users(follower_id, target_id).await?;

        let existing = self.store.get_follow(follower_id, target_id).await?;
        if !existing.is_some_and(|relation| relation.active) {
            return Err(AppError::AlreadyUnfollowed);
        }

        let relation = self
            .store
            .upsert_follow(follower_id, target_id, false, self.clock.now())
            .await?;
        info!(%follower_id, %target_id, "Unfollowed");
        Ok(relation)
    }

    async fn require_users(&self, follower_id: Uuid, target_id: Uuid) -> Result<()> {
        for id in [target_id, follower_id] {
            if self.store.get_user(id).await?.is_none() {
                return Err(AppError::UserNotFound);
            }
        }
        Ok(())
    }
}
