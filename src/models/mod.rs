//! Domain records and request/response models
//!
//! `domain` holds the relational records; `requests` and `responses` define
//! the DTOs used for serializing/deserializing HTTP bodies.

pub mod domain;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use domain::{FollowRelation, SessionEvent, SessionState, SleepSession, User, VISIBILITY_WINDOW_SECS};
pub use requests::{CreateUserRequest, FollowingsQuery, TimelineQuery};
pub use responses::{
    ClockInResponse, ClockOutResponse, FollowingsResponse, HealthResponse, MessageResponse, Owner,
    PageNumber, Pagination, StatsResponse, TimelineResponse, TimelineRow, UserResponse,
};
