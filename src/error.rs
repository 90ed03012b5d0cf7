//! Error types for the sleep timeline service
//!
//! Infrastructure layers (cache, relational store, task queue) each have their
//! own error enum. `AppError` carries the user-facing domain taxonomy and wraps
//! infrastructure failures so they propagate without being masked.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::models::{SessionEvent, SessionState};

// == Cache Error Enum ==
/// Errors raised by the key-value cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key holds a different structure than the operation expects
    #[error("Key {key} holds a {actual}")]
    WrongType { key: String, actual: &'static str },

    /// Invalid key or argument
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Backend cannot be reached
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

// == Store Error Enum ==
/// Errors raised by the relational store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backend cannot be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A constraint the schema guarantees was violated
    #[error("Integrity violation: {0}")]
    Integrity(String),
}

// == Queue Error Enum ==
/// Errors raised when scheduling background work.
#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Task queue is closed")]
    Closed,
}

// == Application Error Enum ==
/// Unified error type for domain operations.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("You are already clocked in, must clock out first")]
    AlreadyClockedIn,

    #[error("You are not clocked in, must clock in first")]
    NotClockedIn,

    #[error("Sleep record {0} is not clocked out")]
    NotClockedOut(Uuid),

    #[error("User is not found")]
    UserNotFound,

    #[error("You have already followed the user")]
    AlreadyFollowed,

    #[error("You have already unfollowed the user")]
    AlreadyUnfollowed,

    #[error("You cannot follow yourself")]
    CannotFollowSelf,

    #[error("Cannot {event} a sleep record that is {state}")]
    InvalidTransition {
        state: SessionState,
        event: SessionEvent,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Queue(#[from] QueueError),
}

impl AppError {
    // == Code ==
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::AlreadyClockedIn => "already_clocked_in",
            AppError::NotClockedIn => "not_clocked_in",
            AppError::NotClockedOut(_) => "not_clocked_out",
            AppError::UserNotFound => "user_not_found",
            AppError::AlreadyFollowed => "already_followed",
            AppError::AlreadyUnfollowed => "already_unfollowed",
            AppError::CannotFollowSelf => "cannot_follow_self",
            AppError::InvalidTransition { .. } => "invalid_transition",
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::Cache(_) => "cache_failure",
            AppError::Store(_) => "store_failure",
            AppError::Queue(_) => "queue_failure",
        }
    }

    // == Is Domain ==
    /// True for recoverable, user-facing errors; false for infrastructure
    /// failures that a task queue should retry.
    pub fn is_domain(&self) -> bool {
        !matches!(
            self,
            AppError::Cache(_) | AppError::Store(_) | AppError::Queue(_)
        )
    }

    /// HTTP status used when the error reaches the API boundary.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::AlreadyClockedIn | AppError::NotClockedIn | AppError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotClockedOut(_) | AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::AlreadyFollowed | AppError::AlreadyUnfollowed | AppError::CannotFollowSelf => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Cache(CacheError::Unavailable(_))
            | AppError::Store(StoreError::Unavailable(_))
            | AppError::Queue(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Cache(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if self.is_domain() {
            self.to_string()
        } else {
            error!(error = %self, "Infrastructure failure while handling request");
            "Internal server error".to_string()
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type defaulting to `AppError`.
pub type Result<T, E = AppError> = std::result::Result<T, E>;
