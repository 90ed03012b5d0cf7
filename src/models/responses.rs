//! Response DTOs for the sleep timeline API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use uuid::Uuid;

use crate::cache::CacheStats;
use crate::models::User;

/// Response body for `POST /api/v1/users`
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub handle: String,
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            handle: user.handle,
            name: user.name,
        }
    }
}

/// Response body for `POST /api/v1/sleep_records/clock_in`
#[derive(Debug, Clone, Serialize)]
pub struct ClockInResponse {
    pub message: String,
    pub sleep_record_id: Uuid,
}

impl ClockInResponse {
    pub fn new(sleep_record_id: Uuid) -> Self {
        Self {
            message: "Clock in successful".to_string(),
            sleep_record_id,
        }
    }
}

/// Response body for `POST /api/v1/sleep_records/clock_out`
#[derive(Debug, Clone, Serialize)]
pub struct ClockOutResponse {
    pub message: String,
    pub sleep_record_id: Uuid,
    /// Session length in seconds
    pub duration: i64,
}

impl ClockOutResponse {
    pub fn new(sleep_record_id: Uuid, duration: i64) -> Self {
        Self {
            message: "Clock out successful".to_string(),
            sleep_record_id,
            duration,
        }
    }
}

/// Generic acknowledgement, used by the follow/unfollow endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// == Timeline ==

/// Owner of a timeline row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Owner {
    pub id: String,
    pub handle: String,
}

/// One hydrated entry of a follower's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRow {
    /// Session id
    pub id: String,
    /// ISO-8601, as stored in the session metadata
    pub clocked_in_at: String,
    pub clocked_out_at: String,
    /// Seconds; the rank score
    pub duration: i64,
    pub humanized_duration: String,
    pub owner: Owner,
}

/// Cursor information echoed with each timeline page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub start_index: usize,
    pub per_page: usize,
    /// Rank position to pass back as the next `start_index`
    pub next_index: usize,
}

/// Response body for `GET /api/v1/sleep_records/timeline`
#[derive(Debug, Clone, Serialize)]
pub struct TimelineResponse {
    pub rows: Vec<TimelineRow>,
    pub pagination: Pagination,
}

/// Page information echoed with each followings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageNumber {
    pub page: usize,
    pub per_page: usize,
}

/// Response body for `GET /api/v1/sleep_records/followings`
#[derive(Debug, Clone, Serialize)]
pub struct FollowingsResponse {
    pub rows: Vec<TimelineRow>,
    pub pagination: PageNumber,
}

// == Service Endpoints ==

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
