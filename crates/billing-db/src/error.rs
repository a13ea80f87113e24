//! # Database Error Types
//!
//! Error types for database operations and for the billing service.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ServiceError ← DbError or CoreError (BillNotFound / UserNotFound)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller maps not-found to its own response                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use billing_core::{CoreError, ValidationError};
use thiserror::Error;

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Seeding two users or bills with the same id
    /// - Two items with the same line number on a bill
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a bill whose user doesn't exist
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored row holds a value the domain rejects (e.g. negative price).
    #[error("Invalid stored {entity} {id}: {reason}")]
    InvalidRow {
        entity: String,
        id: String,
        reason: String,
    },

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates an InvalidRow error.
    pub fn invalid_row(
        entity: impl Into<String>,
        id: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        DbError::InvalidRow {
            entity: entity.into(),
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // UNIQUE: "UNIQUE constraint failed: <table>.<column>"
                // FK:     "FOREIGN KEY constraint failed"
                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::duplicate(field, "unknown")
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

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

// =============================================================================
// Service Error
// =============================================================================

/// Errors returned by [`crate::service::BillingService`].
///
/// Keeps domain failures (missing bill, missing user, bad ids) apart from
/// storage failures so callers can report each precisely.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Domain error from billing-core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Storage error.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl ServiceError {
    /// Returns true when a bill or user was missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Core(err) if err.is_not_found())
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::Db(err.into())
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Seed Error
// =============================================================================

/// Errors raised while loading or applying seed data.
#[derive(Debug, Error)]
pub enum SeedError {
    /// A seed file could not be read.
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A seed document is not valid JSON for its shape.
    #[error("Invalid seed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A seed record holds a value the domain rejects.
    #[error("Invalid seed record: {0}")]
    Validation(#[from] ValidationError),

    /// Writing the seed data failed.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<sqlx::Error> for SeedError {
    fn from(err: sqlx::Error) -> Self {
        SeedError::Db(err.into())
    }
}

/// Result type for seeding.
pub type SeedResult<T> = Result<T, SeedError>;

// =============================================================================
// Config Error
// =============================================================================

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for [`crate::config::BillingConfig`].
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting holds an unusable value.
    #[error("Invalid config value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

impl ConfigError {
    /// Creates an InvalidValue error.
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DbError::duplicate("users.id", "1");
        assert_eq!(err.to_string(), "Duplicate users.id: '1' already exists");

        let err = DbError::invalid_row("bill item", 3, "negative price");
        assert_eq!(err.to_string(), "Invalid stored bill item 3: negative price");
    }

    #[test]
    fn test_service_error_not_found() {
        let err: ServiceError = CoreError::UserNotFound { user_id: 2 }.into();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "User not found: 2");

        let err: ServiceError = DbError::PoolExhausted.into();
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_seed_and_config_messages() {
        let err: SeedError = ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        }
        .into();
        assert!(err.to_string().starts_with("Invalid seed record: "));

        let err = ConfigError::invalid("database.max_connections", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid config value for database.max_connections: must be at least 1"
        );
    }

    #[test]
    fn test_pool_errors_map() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::PoolExhausted
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::ConnectionFailed(_)
        ));
    }
}
