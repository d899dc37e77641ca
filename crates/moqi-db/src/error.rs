//! Database error types for moqi-db.

use moqi_core::errors::StoreError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned unparseable data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// The (swiper, startup) pair already has an interaction row.
    #[error("Interaction already exists for swiper {swiper_id} and startup {startup_id}")]
    Conflict {
        swiper_id: String,
        startup_id: String,
    },

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}

/// Detect a `UNIQUE` constraint violation.
///
/// libSQL surfaces these as a generic `SqliteFailure`; the message is the only
/// stable signal.
pub fn is_unique_violation(e: &libsql::Error) -> bool {
    e.to_string().contains("UNIQUE constraint failed")
}

/// Detect a `FOREIGN KEY`, `CHECK` or `NOT NULL` violation. Retrying the
/// same statement cannot succeed.
pub fn is_constraint_violation(e: &libsql::Error) -> bool {
    let msg = e.to_string();
    ["FOREIGN KEY constraint failed", "CHECK constraint failed", "NOT NULL constraint failed"]
        .iter()
        .any(|needle| msg.contains(needle))
}

impl From<DatabaseError> for StoreError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Conflict {
                swiper_id,
                startup_id,
            } => Self::Conflict {
                swiper_id,
                startup_id,
            },
            DatabaseError::Query(msg) | DatabaseError::InvalidState(msg) => Self::Invalid(msg),
            DatabaseError::NoResult => Self::Invalid("no result returned".into()),
            DatabaseError::Migration(msg) => Self::Network(msg),
            DatabaseError::LibSql(e) if is_constraint_violation(&e) => Self::Invalid(e.to_string()),
            DatabaseError::LibSql(e) => Self::Network(e.to_string()),
        }
    }
}
