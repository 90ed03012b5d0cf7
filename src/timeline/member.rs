//! Tagged sorted-set members: `<sessionId>:<expiryEpoch>`.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::models::SleepSession;

// == Timeline Member ==
/// A session reference tagged with the Unix second at which it stops being
/// visible. The same session always yields the same member, which makes
/// repeated writes idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimelineMember {
    pub session_id: Uuid,
    pub expiry_epoch: i64,
}

impl TimelineMember {
    pub fn for_session(session: &SleepSession) -> Self {
        Self {
            session_id: session.id,
            expiry_epoch: session.visibility_deadline().timestamp(),
        }
    }

    /// True once `now_epoch` has reached the expiry.
    pub fn is_expired(&self, now_epoch: i64) -> bool {
        self.expiry_epoch <= now_epoch
    }
}

impl fmt::Display for TimelineMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.session_id, self.expiry_epoch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed timeline member: {0:?}")]
pub struct MalformedMember(pub String);

impl FromStr for TimelineMember {
    type Err = MalformedMember;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MalformedMember(s.to_string());
        let (id, epoch) = s.rsplit_once(':').ok_or_else(malformed)?;

        Ok(Self {
            session_id: Uuid::parse_str(id).map_err(|_| malformed())?,
            expiry_epoch: epoch.parse().map_err(|_| malformed())?,
        })
    }
}
