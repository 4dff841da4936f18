//! # Database Error Types
//!
//! Error taxonomy for ledger operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← categorization: NotFound / Conflict /         │
//! │       │                   Validation / Integrity / infrastructure      │
//! │       ▼                                                                 │
//! │  API layer maps the category onto an HTTP status                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A unique-constraint violation maps onto `Conflict` because the only
//! unique indexes in this schema guard lifecycle invariants (one OPEN
//! register per salon, one component row per kit/component pair).

use thiserror::Error;

use ledger_core::ValidationError;

/// Ledger operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found, or belongs to another salon.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Operation conflicts with the current lifecycle state:
    /// opening a second register, mutating a CLOSED register,
    /// transferring between identical locations.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Caller input failed a business rule (BadRequest-class).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Ledger vs. materialized-counter mismatch. Must not occur under the
    /// transactional contract; surfaced by the reconciliation check.
    #[error("Integrity violation: {0}")]
    Integrity(String),

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Conflict error.
    pub fn conflict(reason: impl Into<String>) -> Self {
        DbError::Conflict(reason.into())
    }

    /// Whether this error is a unique-constraint conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, DbError::Conflict(_))
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// UNIQUE constraint failed    → DbError::Conflict
/// FOREIGN KEY constraint      → DbError::ForeignKeyViolation
/// Other                       → DbError::QueryFailed / Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                if msg.contains("UNIQUE constraint failed") {
                    DbError::Conflict(msg.to_string())
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => {
                DbError::ConnectionFailed("Connection pool exhausted".to_string())
            }

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
