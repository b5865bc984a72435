//! Storage Trait
//!
//! This module defines the `Storage` trait, the single gateway handlers use to
//! reach the todo collection.
//!
//! Implementors of this trait are responsible for:
//! - Assigning identifiers to new todos
//! - Returning the whole collection in the backend's native order
//! - Updating titles and deleting todos by identifier
//!
//! Operations addressing an identifier that matches nothing succeed and report
//! zero affected records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error_handling::types::StorageError;
use crate::storage::types::{Todo, TodoId};

/// The `Storage` trait defines the interface for todo storage backends.
///
/// A single instance is shared by every in-flight request, so implementors must
/// be safe for concurrent use.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persists a new todo and returns the identifier generated for it.
    async fn insert_todo(
        &self,
        title: &str,
        created_at: DateTime<Utc>,
    ) -> Result<TodoId, StorageError>;

    /// Retrieves every stored todo. No sort is applied.
    async fn find_all_todos(&self) -> Result<Vec<Todo>, StorageError>;

    /// Overwrites the title of the todo with `id`, returning how many records matched.
    async fn update_title(&self, id: &TodoId, title: &str) -> Result<u64, StorageError>;

    /// Removes the todo with `id`, returning how many records were deleted.
    async fn delete_by_id(&self, id: &TodoId) -> Result<u64, StorageError>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), StorageError>;
}
