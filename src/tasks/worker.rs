//! Task Worker
//!
//! Drains a [`ChannelQueue`], running each delivery on its own tokio task.
//!
//! Domain errors (for example a follower who unfollowed before the push ran)
//! are final and dropped. Infrastructure errors are redelivered until
//! `max_attempts` is reached.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cache::CacheClient;
use crate::store::SleepStore;
use crate::tasks::{ChannelQueue, Delivery, TaskRunner};

/// Spawns the worker loop.
///
/// # Returns
/// A JoinHandle that can be aborted during graceful shutdown.
pub fn spawn_worker<S, C>(
    runner: Arc<TaskRunner<S, C, ChannelQueue>>,
    queue: ChannelQueue,
    mut receiver: mpsc::Receiver<Delivery>,
    max_attempts: u32,
) -> JoinHandle<()>
where
    S: SleepStore,
    C: CacheClient,
{
    tokio::spawn(async move {
        info!(max_attempts, "Starting task worker");

        while let Some(delivery) = receiver.recv().await {
            let runner = runner.clone();
            let queue = queue.clone();
            tokio::spawn(async move {
                execute(&runner, &queue, delivery, max_attempts).await;
            });
        }

        info!("Task queue closed, worker stopping");
    })
}

async fn execute<S, C>(
    runner: &TaskRunner<S, C, ChannelQueue>,
    queue: &ChannelQueue,
    delivery: Delivery,
    max_attempts: u32,
) where
    S: SleepStore,
    C: CacheClient,
{
    let kind = delivery.task.kind();
    let attempt = delivery.attempt;

    match runner.run(&delivery.task).await {
        Ok(()) => debug!(kind, attempt, "Task completed"),
        Err(err) if err.is_domain() => {
            info!(kind, code = err.code(), error = %err, "Task rejected, not retrying");
        }
        Err(err) if attempt < max_attempts => {
            warn!(kind, attempt, error = %err, "Task failed, redelivering");
            let retry = Delivery {
                task: delivery.task,
                attempt: attempt + 1,
            };
            if let Err(send_err) = queue.redeliver(retry).await {
                error!(kind, error = %send_err, "Could not redeliver task");
            }
        }
        Err(err) => {
            error!(kind, attempt, error = %err, "Task failed permanently");
        }
    }
}
