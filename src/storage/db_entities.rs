//! SeaORM entity model used by the database storage backend.
//!
//! Maps to the `todo` table created by `database_storage`. Column names keep
//! the document field names (`_id`, `title`, `createdAt`).

use sea_orm::entity::prelude::*;

/// Todo table entity model.
///
/// Identifiers and timestamps are stored as strings for portability.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "todo")]
pub struct Model {
    /// Hex identifier primary key
    #[sea_orm(primary_key, auto_increment = false, column_name = "_id")]
    pub id: String,
    /// Free-form title, never validated
    pub title: String,
    /// RFC3339 creation timestamp
    #[sea_orm(column_name = "createdAt")]
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
