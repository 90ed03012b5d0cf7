//! Services Module
//!
//! Relational-side operations: user registration, the sleep session
//! lifecycle, and the follow relation toggle.

mod session;
mod social;
mod users;

pub use session::SessionService;
pub use social::FollowService;
pub use users::UserService;
