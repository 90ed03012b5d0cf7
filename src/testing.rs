//! Shared fixtures for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::cache::{CacheClient, CacheStore, ScoredMember, SharedCache};
use crate::clock::ManualClock;
use crate::error::CacheError;
use crate::models::{SessionState, SleepSession, User};
use crate::services::{FollowService, SessionService, UserService};
use crate::store::{MemoryStore, SleepStore};
use crate::tasks::{RecordingQueue, TaskRunner};
use crate::timeline::{
    FanOutDispatcher, FollowingsTimeline, SelfRecordWriter, TimelinePushWriter, TimelineReader,
};

/// In-memory backends wired to one manual clock.
pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub cache: Arc<SharedCache>,
    pub clock: Arc<ManualClock>,
    pub queue: Arc<RecordingQueue>,
}

impl Fixture {
    /// Starts the clock at 2025-03-11T06:00:00Z.
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 3, 11, 6, 0, 0).unwrap(),
        ));
        Self {
            store: Arc::new(MemoryStore::new()),
            cache: Arc::new(SharedCache::new(CacheStore::new(10_000, clock.clone()))),
            clock,
            queue: Arc::new(RecordingQueue::new()),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        use crate::clock::Clock;
        self.clock.now()
    }

    pub async fn user(&self, handle: &str) -> User {
        let user = User::new(handle, handle.to_uppercase(), self.now());
        assert!(self.store.insert_user(user.clone()).await.unwrap());
        user
    }

    pub async fn follow(&self, follower: &User, followed: &User) {
        self.store
            .upsert_follow(follower.id, followed.id, true, self.now())
            .await
            .unwrap();
    }

    pub async fn unfollow(&self, follower: &User, followed: &User) {
        self.store
            .upsert_follow(follower.id, followed.id, false, self.now())
            .await
            .unwrap();
    }

    pub async fn open_session(&self, owner: &User, clocked_in_at: DateTime<Utc>) -> SleepSession {
        let session = SleepSession::clock_in(owner.id, clocked_in_at);
        self.store.seed_session(session.clone()).await;
        session
    }

    /// Stores a completed session of `duration` seconds starting at `clocked_in_at`.
    pub async fn completed_session(&self, owner: &User, clocked_in_at: DateTime<Utc>, duration: i64) -> SleepSession {
        let session = SleepSession {
            clocked_out_at: Some(clocked_in_at + Duration::seconds(duration)),
            duration_seconds: duration,
            state: SessionState::Completed,
            ..SleepSession::clock_in(owner.id, clocked_in_at)
        };
        self.store.seed_session(session.clone()).await;
        session
    }

    pub fn self_writer(&self) -> SelfRecordWriter<MemoryStore, SharedCache> {
        SelfRecordWriter::new(self.store.clone(), self.cache.clone(), self.clock.clone())
    }

    pub fn push_writer(&self) -> TimelinePushWriter<MemoryStore, SharedCache> {
        TimelinePushWriter::new(self.store.clone(), self.cache.clone(), self.clock.clone())
    }

    pub fn dispatcher(&self, batch_size: usize) -> FanOutDispatcher<MemoryStore, RecordingQueue> {
        FanOutDispatcher::new(self.store.clone(), self.queue.clone(), self.clock.clone(), batch_size)
    }

    pub fn reader(&self, batch_size: usize, scan_limit: usize) -> TimelineReader<MemoryStore, SharedCache> {
        TimelineReader::new(
            self.store.clone(),
            self.cache.clone(),
            self.clock.clone(),
            batch_size,
            scan_limit,
        )
    }

    pub fn followings(&self) -> FollowingsTimeline<MemoryStore> {
        FollowingsTimeline::new(self.store.clone(), self.clock.clone())
    }

    pub fn runner(&self) -> TaskRunner<MemoryStore, SharedCache, RecordingQueue> {
        TaskRunner::new(
            self.store.clone(),
            self.cache.clone(),
            self.queue.clone(),
            self.clock.clone(),
            100,
        )
    }

    pub fn sessions(&self) -> SessionService<MemoryStore, RecordingQueue> {
        SessionService::new(self.store.clone(), self.queue.clone(), self.clock.clone())
    }

    pub fn social(&self) -> FollowService<MemoryStore> {
        FollowService::new(self.store.clone(), self.clock.clone())
    }

    pub fn users(&self) -> UserService<MemoryStore> {
        UserService::new(self.store.clone(), self.clock.clone())
    }

    /// Runs recorded tasks, including the ones they schedule, until none remain.
    pub async fn run_queued_tasks(&self) {
        let runner = self.runner();
        loop {
            let tasks = self.queue.drain();
            if tasks.is_empty() {
                break;
            }
            for task in tasks {
                let _ = runner.run(&task).await;
            }
        }
    }
}

/// Cache whose every call fails as if the backend were down.
#[derive(Debug, Default)]
pub struct UnavailableCache {
    pub calls: AtomicUsize,
}

impl UnavailableCache {
    fn fail<T>(&self) -> Result<T, CacheError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}

impl CacheClient for UnavailableCache {
    async fn get_hash(&self, _key: &str) -> Result<Option<HashMap<String, String>>, CacheError> {
        self.fail()
    }

    async fn set_hash(&self, _key: &str, _fields: HashMap<String, String>) -> Result<(), CacheError> {
        self.fail()
    }

    async fn add_scored(&self, _key: &str, _member: &str, _score: i64) -> Result<bool, CacheError> {
        self.fail()
    }

    async fn range_scored(&self, _key: &str, _start: usize, _stop: usize) -> Result<Vec<ScoredMember>, CacheError> {
        self.fail()
    }

    async fn expire(&self, _key: &str, _ttl_seconds: u64) -> Result<bool, CacheError> {
        self.fail()
    }

    async fn ttl(&self, _key: &str) -> Result<Option<u64>, CacheError> {
        self.fail()
    }
}
