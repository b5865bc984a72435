use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, error, info};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Schema,
    Set,
};

use crate::error_handling::types::StorageError;
use crate::storage::db_entities as todo;
use crate::storage::storage_trait::Storage;
use crate::storage::types::{Todo, TodoId};

impl todo::Model {
    fn into_todo(self) -> Result<Todo, StorageError> {
        let id = TodoId::parse(&self.id).map_err(|e| {
            error!("Stored todo has an unreadable id: {}", e);
            StorageError::ReadFailed(format!("invalid _id {:?}", self.id))
        })?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| {
                error!("Stored todo {} has an unreadable createdAt: {}", id, e);
                StorageError::ReadFailed(format!("invalid createdAt for {}", id))
            })?
            .with_timezone(&Utc);
        Ok(Todo {
            id,
            title: self.title,
            created_at,
        })
    }
}

/// SeaORM-backed storage, SQLite by default.
pub struct DatabaseStorage {
    db: DatabaseConnection,
}

impl DatabaseStorage {
    /// Open a connection pool to `url`, check it answers and make sure the
    /// `todo` table exists.
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        info!("Connecting to database at {}", url);
        let db = Database::connect(url).await.map_err(|e| {
            error!("Failed to connect to {}: {}", url, e);
            StorageError::ConnectionFailed(e.to_string())
        })?;
        let storage = Self { db };
        storage.ping().await?;
        storage.create_schema().await?;
        info!("Database ready");
        Ok(storage)
    }

    async fn create_schema(&self) -> Result<(), StorageError> {
        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);
        let mut stmt = schema.create_table_from_entity(todo::Entity);
        stmt.if_not_exists();
        self.db.execute(backend.build(&stmt)).await.map_err(|e| {
            error!("Failed to create todo table: {}", e);
            StorageError::WriteFailed(e.to_string())
        })?;
        Ok(())
    }
}

#[async_trait]
impl Storage for DatabaseStorage {
    async fn insert_todo(
        &self,
        title: &str,
        created_at: DateTime<Utc>,
    ) -> Result<TodoId, StorageError> {
        let id = TodoId::new();
        let row = todo::ActiveModel {
            id: Set(id.to_string()),
            title: Set(title.to_string()),
            created_at: Set(created_at.to_rfc3339()),
        };
        todo::Entity::insert(row)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to insert todo: {}", e);
                StorageError::WriteFailed(e.to_string())
            })?;
        debug!("Inserted todo {}", id);
        Ok(id)
    }

    async fn find_all_todos(&self) -> Result<Vec<Todo>, StorageError> {
        let rows = todo::Entity::find().all(&self.db).await.map_err(|e| {
            error!("Failed to load todos: {}", e);
            StorageError::ReadFailed(e.to_string())
        })?;
        rows.into_iter().map(todo::Model::into_todo).collect()
    }

    async fn update_title(&self, id: &TodoId, title: &str) -> Result<u64, StorageError> {
        let res = todo::Entity::update_many()
            .col_expr(todo::Column::Title, Expr::value(title))
            .filter(todo::Column::Id.eq(id.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to update todo {}: {}", id, e);
                StorageError::WriteFailed(e.to_string())
            })?;
        debug!("Updated todo {}, {} matched", id, res.rows_affected);
        Ok(res.rows_affected)
    }

    async fn delete_by_id(&self, id: &TodoId) -> Result<u64, StorageError> {
        let res = todo::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to delete todo {}: {}", id, e);
                StorageError::WriteFailed(e.to_string())
            })?;
        debug!("Deleted todo {}, {} removed", id, res.rows_affected);
        Ok(res.rows_affected)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.db.ping().await.map_err(|e| {
            error!("Database ping failed: {}", e);
            StorageError::ConnectionFailed(e.to_string())
        })
    }
}
