//! Task Queue
//!
//! Units of background work and the interface used to schedule them.

use std::future::Future;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::error::QueueError;

// == Task ==
/// A unit of work scheduled after a session completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Task {
    /// Mirror the session into the owner's leaderboard and metadata hash
    UpdateSelfRecord { session_id: Uuid },
    /// Schedule one `PushTimeline` per active follower
    FanOut { session_id: Uuid },
    /// Write the session into one follower's timeline
    PushTimeline { session_id: Uuid, follower_id: Uuid },
}

impl Task {
    pub fn kind(&self) -> &'static str {
        match self {
            Task::UpdateSelfRecord { .. } => "update_self_record",
            Task::FanOut { .. } => "fan_out",
            Task::PushTimeline { .. } => "push_timeline",
        }
    }
}

/// A task together with how many times it has been attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub task: Task,
    pub attempt: u32,
}

// == Task Queue Trait ==
/// Schedules tasks for asynchronous execution with at-least-once semantics.
pub trait TaskQueue: Send + Sync + 'static {
    fn enqueue(&self, task: Task) -> impl Future<Output = Result<(), QueueError>> + Send;
}

// == Channel Queue ==
/// Queue backed by a bounded tokio channel, drained by [`spawn_worker`].
///
/// [`spawn_worker`]: crate::tasks::spawn_worker
#[derive(Debug, Clone)]
pub struct ChannelQueue {
    sender: mpsc::Sender<Delivery>,
}

impl ChannelQueue {
    /// Creates the queue and the receiving half for a worker.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Delivery>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Puts a delivery back on the queue for another attempt.
    pub async fn redeliver(&self, delivery: Delivery) -> Result<(), QueueError> {
        self.sender.send(delivery).await.map_err(|_| QueueError::Closed)
    }
}

impl TaskQueue for ChannelQueue {
    async fn enqueue(&self, task: Task) -> Result<(), QueueError> {
        debug!(kind = task.kind(), "Enqueueing task");
        self.redeliver(Delivery { task, attempt: 1 }).await
    }
}

// == Recording Queue ==
/// Queue that only records what was scheduled, to be drained by hand.
#[derive(Debug, Clone, Default)]
pub struct RecordingQueue {
    tasks: Arc<Mutex<Vec<Task>>>,
}

impl RecordingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything scheduled so far, oldest first.
    pub fn drain(&self) -> Vec<Task> {
        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *tasks)
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TaskQueue for RecordingQueue {
    async fn enqueue(&self, task: Task) -> Result<(), QueueError> {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner()).push(task);
        Ok(())
    }
}
