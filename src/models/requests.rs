//! Request DTOs for the sleep timeline API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::models::domain::MAX_HANDLE_LENGTH;

/// Default page size for timeline reads.
pub const DEFAULT_PER_PAGE: usize = 10;

/// Largest page size a caller may request.
pub const MAX_PER_PAGE: usize = 100;

/// Request body for `POST /api/v1/users`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    /// Unique public handle
    pub handle: String,
    /// Display name
    pub name: String,
}

impl CreateUserRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.handle.trim().is_empty() {
            return Some("Handle cannot be empty".to_string());
        }
        if self.handle.chars().count() > MAX_HANDLE_LENGTH {
            return Some(format!(
                "Handle exceeds maximum length of {} characters",
                MAX_HANDLE_LENGTH
            ));
        }
        if self.name.trim().is_empty() {
            return Some("Name cannot be empty".to_string());
        }
        None
    }
}

/// Query string for `GET /api/v1/sleep_records/timeline`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimelineQuery {
    /// Cursor returned as `nextIndex` by the previous page
    #[serde(default)]
    pub start_index: usize,
    #[serde(default)]
    pub per_page: Option<usize>,
}

impl TimelineQuery {
    /// Page size with the default applied.
    pub fn per_page(&self) -> usize {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE)
    }

    pub fn validate(&self) -> Option<String> {
        let per_page = self.per_page();
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Some(format!("per_page must be between 1 and {}", MAX_PER_PAGE));
        }
        None
    }
}

/// Query string for `GET /api/v1/sleep_records/followings`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FollowingsQuery {
    /// 1-based page number
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub per_page: Option<usize>,
}

impl FollowingsQuery {
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1)
    }

    pub fn per_page(&self) -> usize {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE)
    }

    pub fn validate(&self) -> Option<String> {
        if self.page() == 0 {
            return Some("page must be at least 1".to_string());
        }
        let per_page = self.per_page();
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Some(format!("per_page must be between 1 and {}", MAX_PER_PAGE));
        }
        None
    }
}
