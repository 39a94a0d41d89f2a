//! Task repository backends.
//!
//! Persistence is owned by the external data store (PostgREST). This module
//! defines the [`TaskStore`] seam plus two backends:
//! - [`SupabaseTaskStore`]: the hosted PostgREST table API
//! - [`InMemoryTaskStore`]: non-persistent, for dev mode and testing
//!
//! Every operation takes a mandatory [`Owner`] handle, so an unscoped query
//! cannot be written.

mod memory;
mod supabase;

pub use memory::InMemoryTaskStore;
pub use supabase::SupabaseTaskStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Owner;

/// A single to-do item owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique, immutable, assigned by the store at creation
    pub id: i64,
    pub user_id: Uuid,
    pub title: String,
    pub completed: bool,
    /// Assigned by the store at creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Error from data store collaborator calls.
#[derive(Debug, Clone)]
pub struct StoreError {
    /// HTTP status code, if the collaborator answered at all
    pub status: Option<u16>,
    /// Human-readable message
    pub message: String,
}

impl StoreError {
    /// Build an error from a non-success collaborator response.
    ///
    /// PostgREST error bodies carry a `message` field; fall back to the raw
    /// body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    "Data store request failed".to_string()
                } else {
                    trimmed.to_string()
                }
            });
        Self {
            status: Some(status),
            message,
        }
    }

    /// Create a network error (connection failed, timeout).
    pub fn network(err: impl std::fmt::Display) -> Self {
        Self {
            status: None,
            message: format!("Could not reach the data store: {}", err),
        }
    }

    /// Create a response parse error.
    pub fn parse(err: impl std::fmt::Display) -> Self {
        Self {
            status: None,
            message: format!("Unexpected response from the data store: {}", err),
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(code) => write!(f, "HTTP {}: {}", code, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for StoreError {}

/// Task store trait - implemented by all repository backends.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All of the owner's tasks, most recently created first (descending id).
    async fn list(&self, owner: &Owner) -> Result<Vec<Task>, StoreError>;

    /// Insert a task. The store assigns `id` and `created_at`; `completed`
    /// starts false. Title validation happens at the call site.
    async fn create(&self, owner: &Owner, title: &str) -> Result<(), StoreError>;

    /// Set a task's completed flag by primary key, scoped to the owner.
    /// Matching zero rows is a store-side no-op, not an error.
    async fn set_completed(&self, owner: &Owner, id: i64, completed: bool)
        -> Result<(), StoreError>;

    /// Delete a task by primary key, scoped to the owner. Matching zero rows
    /// is a store-side no-op, not an error.
    async fn remove(&self, owner: &Owner, id: i64) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_prefers_message_field() {
        let err = StoreError::from_response(
            400,
            r#"{"code":"22P02","message":"invalid input syntax for type bigint"}"#,
        );
        assert_eq!(err.message, "invalid input syntax for type bigint");
        assert_eq!(err.to_string(), "HTTP 400: invalid input syntax for type bigint");
    }

    #[test]
    fn test_store_error_raw_body_fallback() {
        let err = StoreError::from_response(502, "bad gateway");
        assert_eq!(err.message, "bad gateway");
    }

    #[test]
    fn test_store_error_empty_body_fallback() {
        let err = StoreError::from_response(500, "");
        assert_eq!(err.message, "Data store request failed");
    }
}
