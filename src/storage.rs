//! Storage subsystem
//!
//! This module provides the abstraction over the todo document collection and
//! its backends.
//!
//! Components:
//! - `storage_trait`: the Storage trait defining the gateway operations.
//! - `types`: the `Todo` record and its `TodoId` identifier.
//! - `database_storage`: ORM-based SQLite implementation using SeaORM.
//! - `memory_storage`: process-local implementation for tests and throwaway runs.
//! - `db_entities`: SeaORM entity model for the database backend.

pub mod database_storage;
pub mod db_entities;
pub mod memory_storage;
pub mod storage_trait;
pub mod types;

use std::sync::Arc;

use log::info;

use crate::error_handling::types::StorageError;
use database_storage::DatabaseStorage;
use memory_storage::MemoryStorage;
pub use storage_trait::Storage;
pub use types::{Todo, TodoId};

/// URL selecting the in-memory backend instead of a database.
pub const MEMORY_URL: &str = "memory:";

/// Open the backend named by `url` and verify it answers before returning it.
pub async fn open_storage(url: &str) -> Result<Arc<dyn Storage>, StorageError> {
    let storage: Arc<dyn Storage> = if url == MEMORY_URL {
        info!("Using in-memory storage, data will not survive a restart");
        Arc::new(MemoryStorage::new())
    } else {
        Arc::new(DatabaseStorage::connect(url).await?)
    };
    storage.ping().await?;
    Ok(storage)
}
