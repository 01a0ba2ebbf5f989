//! Database error types

use thiserror::Error;

/// Errors from the database layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid row data: {0}")]
    InvalidRow(String),
}

impl DatabaseError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates an InvalidRow error
    pub fn invalid_row(message: impl Into<String>) -> Self {
        DatabaseError::InvalidRow(message.into())
    }
}
