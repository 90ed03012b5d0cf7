//! API Module
//!
//! HTTP handlers and routing for the sleep timeline REST API.
//!
//! # Endpoints
//! - `POST /api/v1/users` - Register a user
//! - `GET /api/v1/users/:handle` - Look up a user by handle
//! - `POST /api/v1/sleep_records/clock_in` - Start a sleep session
//! - `POST /api/v1/sleep_records/clock_out` - Finish the open session
//! - `GET /api/v1/sleep_records/timeline` - Page through followed sessions
//! - `GET /api/v1/sleep_records/followings` - Last week of followed sessions, from the store
//! - `POST /api/v1/socials/follow/:user_id` - Follow a user
//! - `POST /api/v1/socials/unfollow/:user_id` - Unfollow a user
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod extract;
pub mod handlers;
pub mod routes;

pub use extract::{ApiQuery, CurrentUser, USER_ID_HEADER};
pub use handlers::*;
pub use routes::create_router;
