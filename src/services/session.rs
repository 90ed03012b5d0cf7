//! Sleep session lifecycle: clock-in and clock-out.
//!
//! Clock-out commits the `InProgress -> Completed` transition first and only
//! then runs the post-commit handlers, which schedule the self-record and
//! fan-out tasks. Handler failures are logged and never undo the transition.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{AppError, Result};
use crate::models::SleepSession;
use crate::store::SleepStore;
use crate::tasks::{Task, TaskQueue};

// == Session Service ==
pub struct SessionService<S, Q> {
    store: Arc<S>,
    queue: Arc<Q>,
    clock: Arc<dyn Clock>,
}

impl<S: SleepStore, Q: TaskQueue> SessionService<S, Q> {
    pub fn new(store: Arc<S>, queue: Arc<Q>, clock: Arc<dyn Clock>) -> Self {
        Self { store, queue, clock }
    }

    // == Clock In ==
    /// Opens a new session for `user_id` starting now.
    ///
    /// # Errors
    /// - `UserNotFound` if the user does not exist
    /// - `AlreadyClockedIn` if the user already has a session in progress
    pub async fn clock_in(&self, user_id: Uuid) -> Result<SleepSession> {
        self.require_user(user_id).await?;

        if self.store.find_in_progress(user_id).await?.is_some() {
            return Err(AppError::AlreadyClockedIn);
        }

        let session = SleepSession::clock_in(user_id, self.clock.now());
        // The store's uniqueness check closes the race between two clock-ins
        if !self.store.insert_in_progress(session.clone()).await? {
            return Err(AppError::AlreadyClockedIn);
        }

        info!(%user_id, session_id = %session.id, "Clocked in");
        Ok(session)
    }

    // == Clock Out ==
    /// Completes the user's in-progress session and returns it.
    ///
    /// # Errors
    /// - `UserNotFound` if the user does not exist
    /// - `NotClockedIn` if there is no session in progress, including when a
    ///   concurrent clock-out completed it first
    pub async fn clock_out(&self, user_id: Uuid) -> Result<SleepSession> {
        self.require_user(user_id).await?;

        let session = self
            .store
            .find_in_progress(user_id)
            .await?
            .ok_or(AppError::NotClockedIn)?;
        let completed = session.clock_out(self.clock.now())?;

        if !self.store.complete_session(completed.clone()).await? {
            return Err(AppError::NotClockedIn);
        }

        info!(
            %user_id,
            session_id = %completed.id,
            duration = completed.duration_seconds,
            "Clocked out"
        );
        self.after_clock_out(&completed).await;
        Ok(completed)
    }

    /// Post-commit handlers for a completed session.
    async fn after_clock_out(&self, session: &SleepSession) {
        let tasks = [
            Task::UpdateSelfRecord { session_id: session.id },
            Task::FanOut { session_id: session.id },
        ];

        for task in tasks {
            let kind = task.kind();
            if let Err(err) = self.queue.enqueue(task).await {
                warn!(session_id = %session.id, kind, error = %err, "Failed to schedule post clock-out task");
            }
        }
    }

    async fn require_user(&self, user_id: Uuid) -> Result<()> {
        self.store
            .get_user(user_id)
            .await?
            .map(|_| ())
            .ok_or(AppError::UserNotFound)
    }
}
