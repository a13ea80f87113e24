//! # billing-core: Pure Discount Logic for Storefront Billing
//!
//! This crate computes the net payable amount of a bill. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Storefront Billing Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               Caller (net-payable CLI, services)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ billing-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ calculator │  │  policy   │  │   │
//! │  │   │ Bill/User │  │   Money   │  │ BillTotals │  │  rates by │  │   │
//! │  │   │   Item    │  │  (cents)  │  │ BillSummary│  │  category │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │ BillDirectory                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    billing-db (Database Layer)                  │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Bill, Item, User, categories, summaries)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`policy`] - Percentage discount by category and tenure
//! - [`calculator`] - Bill totals, volume discount, net payable
//! - [`directory`] - Bill/user lookups consumed by the calculator
//! - [`validation`] - Identifier and price validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: the evaluation instant is always a parameter
//! 2. **Integer Money**: all monetary values are in cents (i64)
//! 3. **Closed Enums**: user and item categories are matched exhaustively
//! 4. **Explicit Errors**: a missing bill and a missing user are distinct
//!
//! ## Example Usage
//!
//! ```rust
//! use billing_core::{calculator, Item, ItemCategory, Money, User, UserCategory};
//! use chrono::Utc;
//!
//! let now = Utc::now();
//! let user = User {
//!     id: 6,
//!     username: "new-customer".to_string(),
//!     category: UserCategory::Customer,
//!     created_at: now,
//! };
//! let items = vec![Item::new(1, Money::from_dollars(200), ItemCategory::Grocery)];
//!
//! let summary = calculator::summarize(&items, &user, now);
//! assert_eq!(summary.net_payable, Money::from_dollars(190));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod directory;
pub mod error;
pub mod money;
pub mod policy;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calculator::{calculate_net_payable, summarize};
pub use directory::{BillDirectory, InMemoryDirectory};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
