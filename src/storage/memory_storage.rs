use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, error};

use crate::error_handling::types::StorageError;
use crate::storage::storage_trait::Storage;
use crate::storage::types::{Todo, TodoId};

/// Process-local storage keeping todos in insertion order.
#[derive(Default)]
pub struct MemoryStorage {
    todos: Mutex<Vec<Todo>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Todo>>, StorageError> {
        self.todos.lock().map_err(|e| {
            error!("Memory storage lock poisoned: {}", e);
            StorageError::ConnectionFailed("memory storage poisoned".to_string())
        })
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn insert_todo(
        &self,
        title: &str,
        created_at: DateTime<Utc>,
    ) -> Result<TodoId, StorageError> {
        let id = TodoId::new();
        self.lock()?.push(Todo {
            id,
            title: title.to_string(),
            created_at,
        });
        debug!("Inserted todo {}", id);
        Ok(id)
    }

    async fn find_all_todos(&self) -> Result<Vec<Todo>, StorageError> {
        Ok(self.lock()?.clone())
    }

    async fn update_title(&self, id: &TodoId, title: &str) -> Result<u64, StorageError> {
        let mut todos = self.lock()?;
        let matched = match todos.iter_mut().find(|t| t.id == *id) {
            Some(todo) => {
                todo.title = title.to_string();
                1
            }
            None => 0,
        };
        debug!("Updated todo {}, {} matched", id, matched);
        Ok(matched)
    }

    async fn delete_by_id(&self, id: &TodoId) -> Result<u64, StorageError> {
        let mut todos = self.lock()?;
        let before = todos.len();
        todos.retain(|t| t.id != *id);
        let removed = (before - todos.len()) as u64;
        debug!("Deleted todo {}, {} removed", id, removed);
        Ok(removed)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.lock().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_keeps_insertion_order() {
        let storage = MemoryStorage::new();
        for title in ["c", "a", "b"] {
            storage.insert_todo(title, Utc::now()).await.unwrap();
        }
        let titles: Vec<String> = storage
            .find_all_todos()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_memory_update_and_delete() {
        let storage = MemoryStorage::new();
        let id = storage.insert_todo("", Utc::now()).await.unwrap();
        assert_eq!(storage.update_title(&id, "filled").await.unwrap(), 1);
        assert_eq!(storage.find_all_todos().await.unwrap()[0].title, "filled");
        assert_eq!(storage.delete_by_id(&id).await.unwrap(), 1);
        assert_eq!(storage.delete_by_id(&id).await.unwrap(), 0);
        assert!(storage.find_all_todos().await.unwrap().is_empty());
    }
}
