//! Timeline Reader
//!
//! Serves a follower's precomputed timeline, highest duration first, using
//! the cache rank as an opaque cursor.
//!
//! Members are scanned in fixed-size batches starting at the caller's
//! cursor. A member is skipped when its expiry tag has passed or when its
//! `session-meta` hash is gone; skipped members still advance the cursor.
//! Scanning stops when the page is full, when a batch comes back short (end
//! of data), or when `scan_limit` members have been examined in this call.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::keys::{self, meta};
use crate::cache::{CacheClient, ScoredMember};
use crate::clock::Clock;
use crate::error::{AppError, Result};
use crate::models::{Owner, TimelineRow};
use crate::store::SleepStore;
use crate::timeline::{humanize_duration, TimelineMember};

/// Default number of members fetched per cache round trip.
pub const DEFAULT_TIMELINE_BATCH_SIZE: usize = 100;

/// Default cap on members examined by a single read.
pub const DEFAULT_SCAN_LIMIT: usize = 10_000;

/// One page of a timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelinePage {
    pub rows: Vec<TimelineRow>,
    /// Rank position just after the last member examined
    pub next_index: usize,
}

// == Timeline Reader ==
pub struct TimelineReader<S, C> {
    store: Arc<S>,
    cache: Arc<C>,
    clock: Arc<dyn Clock>,
    batch_size: usize,
    scan_limit: usize,
}

impl<S: SleepStore, C: CacheClient> TimelineReader<S, C> {
    pub fn new(
        store: Arc<S>,
        cache: Arc<C>,
        clock: Arc<dyn Clock>,
        batch_size: usize,
        scan_limit: usize,
    ) -> Self {
        Self {
            store,
            cache,
            clock,
            batch_size: batch_size.max(1),
            scan_limit: scan_limit.max(1),
        }
    }

    // == Read ==
    /// Returns up to `per_page` valid rows starting at rank `start_index`.
    ///
    /// # Errors
    /// - `InvalidRequest` if `per_page` is zero
    /// - `UserNotFound` if the follower does not exist
    pub async fn read(&self, follower_id: Uuid, start_index: usize, per_page: usize) -> Result<TimelinePage> {
        if per_page == 0 {
            return Err(AppError::InvalidRequest("per_page must be positive".to_string()));
        }
        self.store
            .get_user(follower_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let key = keys::timeline(follower_id);
        let now_epoch = self.clock.now().timestamp();
        let scan_end = start_index.saturating_add(self.scan_limit);

        let mut rows = Vec::with_capacity(per_page);
        let mut cursor = start_index;

        'scan: while cursor < scan_end {
            let stop = cursor.saturating_add(self.batch_size).min(scan_end) - 1;
            let requested = stop - cursor + 1;
            let batch = self.cache.range_scored(&key, cursor, stop).await?;

            for entry in &batch {
                cursor += 1;
                if let Some(row) = self.hydrate(entry, now_epoch).await? {
                    rows.push(row);
                    if rows.len() == per_page {
                        break 'scan;
                    }
                }
            }

            if batch.len() < requested {
                break;
            }
        }

        if cursor >= scan_end && rows.len() < per_page {
            debug!(%follower_id, start_index, cursor, "Timeline scan limit reached");
        }

        Ok(TimelinePage {
            rows,
            next_index: cursor,
        })
    }

    /// Turns a cached member into a row, or None if it must be skipped.
    async fn hydrate(&self, entry: &ScoredMember, now_epoch: i64) -> Result<Option<TimelineRow>> {
        let member: TimelineMember = match entry.member.parse() {
            Ok(member) => member,
            Err(err) => {
                warn!(error = %err, "Skipping unparseable timeline member");
                return Ok(None);
            }
        };

        if member.is_expired(now_epoch) {
            debug!(session_id = %member.session_id, "Skipping expired timeline member");
            return Ok(None);
        }

        let Some(fields) = self.cache.get_hash(&keys::session_meta(member.session_id)).await? else {
            debug!(session_id = %member.session_id, "Skipping timeline member without metadata");
            return Ok(None);
        };

        let row = build_row(&member, entry.score, fields);
        if row.is_none() {
            warn!(session_id = %member.session_id, "Skipping timeline member with incomplete metadata");
        }
        Ok(row)
    }
}

fn build_row(member: &TimelineMember, duration: i64, mut fields: HashMap<String, String>) -> Option<TimelineRow> {
    Some(TimelineRow {
        id: member.session_id.to_string(),
        clocked_in_at: fields.remove(meta::CLOCKED_IN_AT)?,
        clocked_out_at: fields.remove(meta::CLOCKED_OUT_AT)?,
        duration,
        humanized_duration: humanize_duration(duration),
        owner: Owner {
            id: fields.remove(meta::USER_ID)?,
            handle: fields.remove(meta::USERNAME)?,
        },
    })
}
