//! Cache key namespace.
//!
//! Every key the service reads or writes is built here.

use std::fmt::Display;

/// Sorted set of an owner's own sessions, scored by duration.
pub fn leaderboard(owner_id: impl Display) -> String {
    format!("leaderboard:{}", owner_id)
}

/// Hash holding the hydration metadata of one session.
pub fn session_meta(session_id: impl Display) -> String {
    format!("session-meta:{}", session_id)
}

/// Sorted set of a follower's precomputed timeline, scored by duration.
pub fn timeline(follower_id: impl Display) -> String {
    format!("timeline:{}", follower_id)
}

/// Field names of the `session-meta:<sessionId>` hash.
pub mod meta {
    pub const USER_ID: &str = "userId";
    pub const USERNAME: &str = "username";
    pub const CLOCKED_IN_AT: &str = "clockedInAt";
    pub const CLOCKED_OUT_AT: &str = "clockedOutAt";
    pub const DURATION: &str = "duration";
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_key_formats() {
        let id = Uuid::parse_str("0195800a-7f00-7000-8000-000000000001").unwrap();

        assert_eq!(leaderboard(id), "leaderboard:0195800a-7f00-7000-8000-000000000001");
        assert_eq!(session_meta(id), "session-meta:0195800a-7f00-7000-8000-000000000001");
        assert_eq!(timeline(id), "timeline:0195800a-7f00-7000-8000-000000000001");
    }
}
