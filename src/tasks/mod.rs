//! Background Tasks Module
//!
//! Work that runs outside the request path.
//!
//! # Tasks
//! - Self record, fan-out and timeline push tasks, scheduled on clock-out
//! - TTL Cleanup: Removes expired cache keys at configured intervals

mod cleanup;
mod queue;
mod runner;
mod worker;

pub use cleanup::spawn_cleanup_task;
pub use queue::{ChannelQueue, Delivery, RecordingQueue, Task, TaskQueue};
pub use runner::TaskRunner;
pub use worker::spawn_worker;
