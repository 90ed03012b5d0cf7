//! Sleep Timeline - fan-out-on-write sleep session feeds
//!
//! Users clock in and out of sleep sessions. Each completed session is
//! written to its owner's leaderboard and pushed into the precomputed
//! timeline of every follower, where it stays visible for seven days from
//! clock-in, ranked by duration.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod tasks;
pub mod timeline;

#[cfg(test)]
mod testing;

pub use api::{create_router, AppState};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
