//! # Validation Module
//!
//! Input validation for identifiers and externally loaded bill data.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (CLI / seed loader)                                   │
//! │  ├── Type validation (deserialization, Money parsing)                  │
//! │  └── THIS MODULE: identifier and price rules                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                            │
//! │  ├── CHECK (price_cents >= 0)                                          │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Bill, BillId, UserId};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates that an identifier is a positive integer.
///
/// ## Example
/// ```rust
/// use billing_core::validation::validate_id;
///
/// assert!(validate_id("bill_id", 1).is_ok());
/// assert!(validate_id("bill_id", 0).is_err());
/// ```
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates the identifier pair of a net payable query.
pub fn validate_query(bill_id: BillId, user_id: UserId) -> ValidationResult<()> {
    validate_id("bill_id", bill_id)?;
    validate_id("user_id", user_id)
}

/// Validates an item price (zero is allowed, negative is not).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Validates a bill loaded from outside the engine.
///
/// ## Rules
/// - Bill and owner ids are positive
/// - Every item price is non-negative
pub fn validate_bill(bill: &Bill) -> ValidationResult<()> {
    validate_id("bill_id", bill.id)?;
    validate_id("user_id", bill.user_id)?;
    for item in &bill.items {
        validate_price(item.price)?;
    }
    Ok(())
}

/// Checks that no id appears twice.
pub fn validate_unique_ids<I>(field: &str, ids: I) -> ValidationResult<()>
where
    I: IntoIterator<Item = i64>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ValidationError::Duplicate {
                field: field.to_string(),
                value: id.to_string(),
            });
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
