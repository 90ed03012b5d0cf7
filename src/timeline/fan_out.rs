//! Fan-Out Dispatcher
//!
//! Schedules one timeline push per active follower of a session's owner.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{AppError, Result};
use crate::models::SleepSession;
use crate::store::SleepStore;
use crate::tasks::{Task, TaskQueue};
use crate::timeline::TimelineMember;

/// Default number of followers loaded per page.
pub const DEFAULT_FANOUT_BATCH_SIZE: usize = 100;

// == Fan-Out Dispatcher ==
pub struct FanOutDispatcher<S, Q> {
    store: Arc<S>,
    queue: Arc<Q>,
    clock: Arc<dyn Clock>,
    batch_size: usize,
}

impl<S: SleepStore, Q: TaskQueue> FanOutDispatcher<S, Q> {
    pub fn new(store: Arc<S>, queue: Arc<Q>, clock: Arc<dyn Clock>, batch_size: usize) -> Self {
        Self {
            store,
            queue,
            clock,
            batch_size: batch_size.max(1),
        }
    }

    // == Dispatch ==
    /// Enqueues a `PushTimeline` task for every active follower, loading
    /// followers `batch_size` at a time. Returns the number scheduled.
    ///
    /// # Errors
    /// - `NotClockedOut` if the session is missing or still in progress
    pub async fn dispatch(&self, session_id: Uuid) -> Result<usize> {
        let session = self
            .store
            .get_session(session_id)
            .await?
            .filter(SleepSession::is_completed)
            .ok_or(AppError::NotClockedOut(session_id))?;

        if TimelineMember::for_session(&session).is_expired(self.clock.now().timestamp()) {
            debug!(%session_id, "Session is past its visibility window, nothing to fan out");
            return Ok(0);
        }

        let mut scheduled = 0;
        let mut cursor = None;
        loop {
            let followers = self
                .store
                .followers_after(session.user_id, cursor, self.batch_size)
                .await?;

            for follower_id in &followers {
                self.queue
                    .enqueue(Task::PushTimeline {
                        session_id,
                        follower_id: *follower_id,
                    })
                    .await?;
            }
            scheduled += followers.len();

            if followers.len() < self.batch_size {
                break;
            }
            cursor = followers.last().copied();
        }

        info!(%session_id, owner_id = %session.user_id, scheduled, "Fan-out dispatched");
        Ok(scheduled)
    }
}
