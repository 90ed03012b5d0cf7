//! Followings Timeline
//!
//! Last week's completed sessions of everyone a reader follows, queried from
//! the relational store and ranked by duration. It needs no cache, so it
//! answers even when the precomputed timeline is cold or unavailable.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, SecondsFormat, TimeZone, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{AppError, Result};
use crate::models::{Owner, SleepSession, TimelineRow, User};
use crate::store::SleepStore;
use crate::timeline::humanize_duration;

/// Days of history included, counted back to the start of that UTC day.
pub const FOLLOWINGS_LOOKBACK_DAYS: i64 = 7;

// == Followings Timeline ==
pub struct FollowingsTimeline<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S: SleepStore> FollowingsTimeline<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    // == Read ==
    /// Returns page `page` (1-based) of `per_page` rows, longest first.
    ///
    /// # Errors
    /// - `InvalidRequest` if `page` or `per_page` is zero
    /// - `UserNotFound` if the reader does not exist
    pub async fn read(&self, follower_id: Uuid, page: usize, per_page: usize) -> Result<Vec<TimelineRow>> {
        if page == 0 || per_page == 0 {
            return Err(AppError::InvalidRequest(
                "page and per_page must be positive".to_string(),
            ));
        }
        self.store
            .get_user(follower_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let since = lookback_start(self.clock.now());
        let offset = (page - 1).saturating_mul(per_page);
        let sessions = self
            .store
            .followed_sessions_since(follower_id, since, offset, per_page)
            .await?;

        let mut owners: HashMap<Uuid, User> = HashMap::new();
        let mut rows = Vec::with_capacity(sessions.len());
        for session in sessions {
            if !owners.contains_key(&session.user_id) {
                match self.store.get_user(session.user_id).await? {
                    Some(user) => {
                        owners.insert(user.id, user);
                    }
                    None => {
                        warn!(session_id = %session.id, owner_id = %session.user_id, "Session owner missing, skipping");
                        continue;
                    }
                }
            }
            if let Some(row) = owners.get(&session.user_id).and_then(|owner| to_row(&session, owner)) {
                rows.push(row);
            }
        }

        debug!(%follower_id, page, per_page, rows = rows.len(), "Followings timeline read");
        Ok(rows)
    }
}

/// Midnight UTC at the start of the day `FOLLOWINGS_LOOKBACK_DAYS` ago.
fn lookback_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let day = (now - Duration::days(FOLLOWINGS_LOOKBACK_DAYS)).date_naive();
    Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN))
}

fn to_row(session: &SleepSession, owner: &User) -> Option<TimelineRow> {
    let iso = |at: DateTime<Utc>| at.to_rfc3339_opts(SecondsFormat::Secs, true);
    let clocked_out_at = session.clocked_out_at?;

    Some(TimelineRow {
        id: session.id.to_string(),
        clocked_in_at: iso(session.clocked_in_at),
        clocked_out_at: iso(clocked_out_at),
        duration: session.duration_seconds,
        humanized_duration: humanize_duration(session.duration_seconds),
        owner: Owner {
            id: owner.id.to_string(),
            handle: owner.handle.clone(),
        },
    })
}
