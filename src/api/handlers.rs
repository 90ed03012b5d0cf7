//! API Handlers
//!
//! HTTP request handlers for each sleep timeline endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::api::{ApiQuery, CurrentUser};
use crate::cache::SharedCache;
use crate::clock::Clock;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    ClockInResponse, ClockOutResponse, CreateUserRequest, FollowingsQuery, FollowingsResponse,
    HealthResponse, MessageResponse, PageNumber, Pagination, StatsResponse, TimelineQuery,
    TimelineResponse, UserResponse,
};
use crate::services::{FollowService, SessionService, UserService};
use crate::store::MemoryStore;
use crate::tasks::ChannelQueue;
use crate::timeline::{FollowingsTimeline, TimelineReader};

/// Application state shared across all handlers.
///
/// Services are built once over the shared backends and cloned cheaply per
/// request.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService<MemoryStore>>,
    pub sessions: Arc<SessionService<MemoryStore, ChannelQueue>>,
    pub social: Arc<FollowService<MemoryStore>>,
    pub timeline: Arc<TimelineReader<MemoryStore, SharedCache>>,
    pub followings: Arc<FollowingsTimeline<MemoryStore>>,
    /// Timeline cache, exposed for the stats endpoint
    pub cache: SharedCache,
}

impl AppState {
    /// Wires the services over the given backends.
    pub fn new(
        config: &Config,
        store: Arc<MemoryStore>,
        cache: SharedCache,
        queue: Arc<ChannelQueue>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users: Arc::new(UserService::new(store.clone(), clock.clone())),
            sessions: Arc::new(SessionService::new(store.clone(), queue, clock.clone())),
            social: Arc::new(FollowService::new(store.clone(), clock.clone())),
            followings: Arc::new(FollowingsTimeline::new(store.clone(), clock.clone())),
            timeline: Arc::new(TimelineReader::new(
                store,
                Arc::new(cache.clone()),
                clock,
                config.timeline_batch_size,
                config.timeline_scan_limit,
            )),
            cache,
        }
    }
}

// == Users ==

/// Handler for POST /api/v1/users
pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let user = state.users.register(&req.handle, &req.name).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Handler for GET /api/v1/users/:handle
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<UserResponse>> {
    let user = state.users.find_by_handle(&handle).await?;
    Ok(Json(user.into()))
}

// == Sleep Records ==

/// Handler for POST /api/v1/sleep_records/clock_in
pub async fn clock_in_handler(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<(StatusCode, Json<ClockInResponse>)> {
    let session = state.sessions.clock_in(user_id).await?;
    Ok((StatusCode::CREATED, Json(ClockInResponse::new(session.id))))
}

/// Handler for POST /api/v1/sleep_records/clock_out
pub async fn clock_out_handler(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ClockOutResponse>> {
    let session = state.sessions.clock_out(user_id).await?;
    Ok(Json(ClockOutResponse::new(session.id, session.duration_seconds)))
}

/// Handler for GET /api/v1/sleep_records/timeline
///
/// Pass the returned `nextIndex` back as `start_index` for the next page.
pub async fn timeline_handler(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    ApiQuery(query): ApiQuery<TimelineQuery>,
) -> Result<Json<TimelineResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let per_page = query.per_page();
    let page = state.timeline.read(user_id, query.start_index, per_page).await?;

    Ok(Json(TimelineResponse {
        rows: page.rows,
        pagination: Pagination {
            start_index: query.start_index,
            per_page,
            next_index: page.next_index,
        },
    }))
}

/// Handler for GET /api/v1/sleep_records/followings
///
/// Reads last week's sessions of followed users from the store, `page`
/// counting from 1.
pub async fn followings_handler(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    ApiQuery(query): ApiQuery<FollowingsQuery>,
) -> Result<Json<FollowingsResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let (page, per_page) = (query.page(), query.per_page());
    let rows = state.followings.read(user_id, page, per_page).await?;

    Ok(Json(FollowingsResponse {
        rows,
        pagination: PageNumber { page, per_page },
    }))
}

// == Socials ==

/// Handler for POST /api/v1/socials/follow/:user_id
pub async fn follow_handler(
    State(state): State<AppState>,
    CurrentUser(follower_id): CurrentUser,
    Path(target_id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    state.social.follow(follower_id, target_id).await?;
    Ok(Json(MessageResponse::new("Follow successful")))
}

/// Handler for POST /api/v1/socials/unfollow/:user_id
pub async fn unfollow_handler(
    State(state): State<AppState>,
    CurrentUser(follower_id): CurrentUser,
    Path(target_id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    state.social.unfollow(follower_id, target_id).await?;
    Ok(Json(MessageResponse::new("Unfollow successful")))
}

// == Service ==

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().await.into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use crate::clock::ManualClock;
    use chrono::{Duration, TimeZone, Utc};

    fn test_state() -> (AppState, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 10, 22, 0, 0).unwrap()));
        let cache = SharedCache::new(CacheStore::new(100, clock.clone()));
        // Receiver dropped: post clock-out tasks fail to schedule and are only logged
        let (queue, _receiver) = ChannelQueue::new(16);
        let state = AppState::new(
            &Config::default(),
            Arc::new(MemoryStore::new()),
            cache,
            Arc::new(queue),
            clock.clone(),
        );
        (state, clock)
    }

    async fn register(state: &AppState, handle: &str) -> Uuid {
        let req = CreateUserRequest {
            handle: handle.to_string(),
            name: handle.to_string(),
        };
        let (status, Json(user)) = create_user_handler(State(state.clone()), Json(req)).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        user.id
    }

    #[tokio::test]
    async fn test_clock_in_and_out_handlers() {
        let (state, clock) = test_state();
        let bob = register(&state, "bob").await;

        let (status, Json(clock_in)) = clock_in_handler(State(state.clone()), CurrentUser(bob)).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);

        clock.advance(Duration::hours(8));
        let Json(clock_out) = clock_out_handler(State(state.clone()), CurrentUser(bob)).await.unwrap();
        assert_eq!(clock_out.sleep_record_id, clock_in.sleep_record_id);
        assert_eq!(clock_out.duration, 28_800);
    }

    #[tokio::test]
    async fn test_get_user_by_handle() {
        let (state, _) = test_state();
        let bob = register(&state, "bob").await;

        let Json(found) = get_user_handler(State(state.clone()), Path("bob".to_string())).await.unwrap();
        assert_eq!(found.id, bob);

        let missing = get_user_handler(State(state), Path("nobody".to_string())).await;
        assert!(matches!(missing, Err(AppError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_create_user_validation() {
        let (state, _) = test_state();
        let req = CreateUserRequest {
            handle: "   ".to_string(),
            name: "Nobody".to_string(),
        };

        let result = create_user_handler(State(state), Json(req)).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_timeline_handler_rejects_oversized_page() {
        let (state, _) = test_state();
        let alice = register(&state, "alice").await;
        let query = TimelineQuery {
            start_index: 0,
            per_page: Some(101),
        };

        let result = timeline_handler(State(state), CurrentUser(alice), ApiQuery(query)).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_empty_timeline() {
        let (state, _) = test_state();
        let alice = register(&state, "alice").await;

        let Json(page) = timeline_handler(State(state), CurrentUser(alice), ApiQuery(TimelineQuery::default()))
            .await
            .unwrap();
        assert!(page.rows.is_empty());
        assert_eq!(page.pagination.per_page, 10);
        assert_eq!(page.pagination.next_index, 0);
    }

    #[tokio::test]
    async fn test_followings_handler() {
        let (state, clock) = test_state();
        let alice = register(&state, "alice").await;
        let bob = register(&state, "bob").await;
        follow_handler(State(state.clone()), CurrentUser(alice), Path(bob)).await.unwrap();

        clock_in_handler(State(state.clone()), CurrentUser(bob)).await.unwrap();
        clock.advance(Duration::hours(7));
        clock_out_handler(State(state.clone()), CurrentUser(bob)).await.unwrap();

        let Json(page) = followings_handler(State(state.clone()), CurrentUser(alice), ApiQuery(FollowingsQuery::default()))
            .await
            .unwrap();
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].owner.handle, "bob");
        assert_eq!(page.rows[0].duration, 25_200);
        assert_eq!(page.pagination, PageNumber { page: 1, per_page: 10 });

        let zero = FollowingsQuery { page: Some(0), per_page: None };
        let result = followings_handler(State(state), CurrentUser(alice), ApiQuery(zero)).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_follow_handlers() {
        let (state, _) = test_state();
        let alice = register(&state, "alice").await;
        let bob = register(&state, "bob").await;

        follow_handler(State(state.clone()), CurrentUser(alice), Path(bob)).await.unwrap();
        let again = follow_handler(State(state.clone()), CurrentUser(alice), Path(bob)).await;
        assert!(matches!(again, Err(AppError::AlreadyFollowed)));

        unfollow_handler(State(state.clone()), CurrentUser(alice), Path(bob)).await.unwrap();
        let again = unfollow_handler(State(state), CurrentUser(alice), Path(bob)).await;
        assert!(matches!(again, Err(AppError::AlreadyUnfollowed)));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let (state, _) = test_state();
        let Json(stats) = stats_handler(State(state)).await;
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.hits, 0);
    }
}
