//! # Error Types
//!
//! Domain-specific error types for billing-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  billing-core errors (this file)                                       │
//! │  ├── CoreError        - Lookup failures, wrapped validation errors     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  billing-db errors (separate crate)                                    │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── ServiceError     - CoreError | DbError, what callers see          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → Caller             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the identifiers in error messages
//! 3. A missing bill and a missing user are separate variants

use thiserror::Error;

use crate::types::{BillId, UserId};

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while resolving and pricing a bill.
///
/// Lookup failures short-circuit the calculation: once a required entity
/// is missing no discount is computed.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No bill with this id is owned by this user.
    ///
    /// ## When This Occurs
    /// - Bill id doesn't exist
    /// - Bill exists but belongs to another user
    #[error("Bill {bill_id} not found for user {user_id}")]
    BillNotFound { bill_id: BillId, user_id: UserId },

    /// The bill's owner could not be resolved.
    #[error("User not found: {user_id}")]
    UserNotFound { user_id: UserId },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns true for either not-found variant.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::BillNotFound { .. } | CoreError::UserNotFound { .. }
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when identifiers or externally loaded data don't
/// meet requirements. Used for early validation before business logic runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., malformed decimal amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., two users with the same id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
