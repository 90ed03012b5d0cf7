//! API Routes
//!
//! Configures the Axum router with all sleep timeline endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clock_in_handler, clock_out_handler, create_user_handler, follow_handler, followings_handler,
    get_user_handler, health_handler, stats_handler, timeline_handler, unfollow_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/users", post(create_user_handler))
        .route("/users/:handle", get(get_user_handler))
        .route("/sleep_records/clock_in", post(clock_in_handler))
        .route("/sleep_records/clock_out", post(clock_out_handler))
        .route("/sleep_records/timeline", get(timeline_handler))
        .route("/sleep_records/followings", get(followings_handler))
        .route("/socials/follow/:user_id", post(follow_handler))
        .route("/socials/unfollow/:user_id", post(unfollow_handler));

    Router::new()
        .nest("/api/v1", api)
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
