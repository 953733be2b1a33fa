//! Database error types for aula-db.

use aula_core::enums::EntityType;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// The target entity does not exist (update/delete on an absent id).
    #[error("Not found: {entity_type} {id}")]
    NotFound { entity_type: EntityType, id: String },

    /// A uniqueness constraint was violated (e.g., duplicate email).
    #[error("Already exists: {0}")]
    Conflict(String),

    /// Invalid state encountered (e.g., deleting a subject with enrollments).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    /// Shorthand for the not-found case.
    #[must_use]
    pub fn not_found(entity_type: EntityType, id: &str) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }
}
