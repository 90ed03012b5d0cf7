//! Domain records shared by the relational store and the services.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Length of the window after clock-in during which a session may appear in
/// any feed.
pub const VISIBILITY_WINDOW_SECS: i64 = 7 * 24 * 60 * 60;

/// Maximum handle length in characters.
pub const MAX_HANDLE_LENGTH: usize = 20;

// == User ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Unique public name
    pub handle: String,
    /// Display name
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(handle: impl Into<String>, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            handle: handle.into(),
            name: name.into(),
            created_at: now,
        }
    }
}

// == Follow Relation ==
/// A directed follower -> followed edge. Unfollowing deactivates the edge
/// rather than deleting it, so re-following reuses the same relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowRelation {
    pub follower_id: Uuid,
    pub followed_id: Uuid,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// == Session State Machine ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    ClockOut,
}

impl SessionState {
    /// Transition table. `Completed` is terminal.
    pub fn transition(self, event: SessionEvent) -> Result<SessionState> {
        match (self, event) {
            (SessionState::InProgress, SessionEvent::ClockOut) => Ok(SessionState::Completed),
            (state, event) => Err(AppError::InvalidTransition { state, event }),
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::InProgress => f.write_str("in progress"),
            SessionState::Completed => f.write_str("completed"),
        }
    }
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::ClockOut => f.write_str("clock out"),
        }
    }
}

// == Sleep Session ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub clocked_in_at: DateTime<Utc>,
    pub clocked_out_at: Option<DateTime<Utc>>,
    /// Authoritative only once `state` is `Completed`
    pub duration_seconds: i64,
    pub state: SessionState,
}

impl SleepSession {
    /// Opens a new in-progress session for `user_id` at `at`.
    pub fn clock_in(user_id: Uuid, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            clocked_in_at: at,
            clocked_out_at: None,
            duration_seconds: 0,
            state: SessionState::InProgress,
        }
    }

    /// Returns the completed form of this session, closed at `at`.
    ///
    /// Fails if the session is already completed or `at` does not come
    /// after the clock-in time.
    pub fn clock_out(&self, at: DateTime<Utc>) -> Result<SleepSession> {
        let state = self.state.transition(SessionEvent::ClockOut)?;
        if at <= self.clocked_in_at {
            return Err(AppError::InvalidRequest(
                "clock out time must be after the clock in time".to_string(),
            ));
        }

        Ok(SleepSession {
            clocked_out_at: Some(at),
            duration_seconds: (at - self.clocked_in_at).num_seconds(),
            state,
            ..self.clone()
        })
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    /// End of the visibility window: `clocked_in_at + 7 days`.
    pub fn visibility_deadline(&self) -> DateTime<Utc> {
        self.clocked_in_at + Duration::seconds(VISIBILITY_WINDOW_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn night() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 22, 0, 0).unwrap()
    }

    #[test]
    fn test_transition_table() {
        assert_eq!(
            SessionState::InProgress.transition(SessionEvent::ClockOut).unwrap(),
            SessionState::Completed
        );
        assert!(matches!(
            SessionState::Completed.transition(SessionEvent::ClockOut),
            Err(AppError::InvalidTransition { state: SessionState::Completed, .. })
        ));
    }

    #[test]
    fn test_clock_out_computes_duration() {
        let session = SleepSession::clock_in(Uuid::now_v7(), night());
        let done = session.clock_out(night() + Duration::hours(8)).unwrap();

        assert_eq!(done.duration_seconds, 28_800);
        assert_eq!(done.clocked_out_at, Some(night() + Duration::hours(8)));
        assert!(done.is_completed());
        assert_eq!(done.id, session.id);
    }

    #[test]
    fn test_completed_session_is_terminal() {
        let session = SleepSession::clock_in(Uuid::now_v7(), night());
        let done = session.clock_out(night() + Duration::hours(1)).unwrap();

        let again = done.clock_out(night() + Duration::hours(2));
        assert!(matches!(again, Err(AppError::InvalidTransition { .. })));
    }

    #[test]
    fn test_clock_out_must_follow_clock_in() {
        let session = SleepSession::clock_in(Uuid::now_v7(), night());
        assert!(matches!(session.clock_out(night()), Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn test_visibility_deadline() {
        let session = SleepSession::clock_in(Uuid::now_v7(), night());
        assert_eq!(session.visibility_deadline(), night() + Duration::days(7));
    }
}
