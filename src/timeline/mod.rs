//! Timeline Module
//!
//! Fan-out-on-write feeds: completed sessions are written into the owner's
//! leaderboard and into every follower's duration-ranked timeline, then read
//! back page by page.
//!
//! # Components
//! - [`SelfRecordWriter`]: owner leaderboard + `session-meta` hydration hash
//! - [`FanOutDispatcher`]: one push task per active follower
//! - [`TimelinePushWriter`]: idempotent write into one follower's timeline
//! - [`TimelineReader`]: cursor-paginated, expiry-aware reads
//! - [`FollowingsTimeline`]: page-numbered reads of last week straight from the store

mod fan_out;
mod followings;
mod humanize;
mod member;
mod push;
mod reader;
mod self_record;


pub use fan_out::{FanOutDispatcher, DEFAULT_FANOUT_BATCH_SIZE};
pub use followings::{FollowingsTimeline, FOLLOWINGS_LOOKBACK_DAYS};
pub use humanize::humanize_duration;
pub use member::{MalformedMember, TimelineMember};
pub use push::{PushOutcome, TimelinePushWriter, TIMELINE_TTL_SECS};
pub use reader::{TimelinePage, TimelineReader, DEFAULT_SCAN_LIMIT, DEFAULT_TIMELINE_BATCH_SIZE};
pub use self_record::{SelfRecordOutcome, SelfRecordWriter};
