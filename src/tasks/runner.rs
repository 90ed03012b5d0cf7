//! Task Runner
//!
//! Maps each [`Task`] to the timeline component that carries it out.

use std::sync::Arc;

use tracing::debug;

use crate::cache::CacheClient;
use crate::clock::Clock;
use crate::error::Result;
use crate::store::SleepStore;
use crate::tasks::{Task, TaskQueue};
use crate::timeline::{FanOutDispatcher, SelfRecordWriter, TimelinePushWriter};

pub struct TaskRunner<S, C, Q> {
    self_record: SelfRecordWriter<S, C>,
    fan_out: FanOutDispatcher<S, Q>,
    push: TimelinePushWriter<S, C>,
}

impl<S: SleepStore, C: CacheClient, Q: TaskQueue> TaskRunner<S, C, Q> {
    pub fn new(
        store: Arc<S>,
        cache: Arc<C>,
        queue: Arc<Q>,
        clock: Arc<dyn Clock>,
        fanout_batch_size: usize,
    ) -> Self {
        Self {
            self_record: SelfRecordWriter::new(store.clone(), cache.clone(), clock.clone()),
            fan_out: FanOutDispatcher::new(store.clone(), queue, clock.clone(), fanout_batch_size),
            push: TimelinePushWriter::new(store, cache, clock),
        }
    }

    /// Executes one task to completion. Safe to call again for the same
    /// task; every write it performs is idempotent.
    pub async fn run(&self, task: &Task) -> Result<()> {
        debug!(?task, "Running task");
        match *task {
            Task::UpdateSelfRecord { session_id } => {
                self.self_record.write(session_id).await?;
            }
            Task::FanOut { session_id } => {
                self.fan_out.dispatch(session_id).await?;
            }
            Task::PushTimeline {
                session_id,
                follower_id,
            } => {
                self.push.push(session_id, follower_id).await?;
            }
        }
        Ok(())
    }
}
