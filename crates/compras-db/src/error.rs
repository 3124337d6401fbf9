//! Database error types

use thiserror::Error;

/// Database operation errors
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Query error: {0}")]
    Query(sqlx::Error),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DbError::Duplicate(db.message().to_string())
            }
            sqlx::Error::Database(db) if db.is_check_violation() => {
                DbError::Constraint(db.message().to_string())
            }
            _ => DbError::Query(e),
        }
    }
}

impl DbError {
    /// Name of the column behind a unique violation, when SQLite reports one
    /// (`UNIQUE constraint failed: orden_compras.idx`).
    pub fn duplicate_column(&self) -> Option<&str> {
        match self {
            DbError::Duplicate(msg) => msg
                .rsplit_once('.')
                .map(|(_, column)| column.trim()),
            _ => None,
        }
    }
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;
