//! # Domain Types
//!
//! Core domain types used throughout Storefront Billing.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │      Bill       │   │      Item       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │◄──│  user_id (FK)   │   │  id (i64)       │       │
//! │  │  username       │   │  id (i64)       │──►│  price (Money)  │       │
//! │  │  category       │   │  items          │   │  category       │       │
//! │  │  created_at     │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  DiscountRate   │   │  UserCategory   │   │  ItemCategory   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Employee       │   │  Grocery        │       │
//! │  │  3000 = 30%     │   │  Affiliate      │   │  Other          │       │
//! │  └─────────────────┘   │  Customer       │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both category enums are closed: every `match` over them is exhaustive,
//! so adding a variant forces a review of the discount policy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;

/// Bill identifier.
pub type BillId = i64;

/// User identifier.
pub type UserId = i64;

/// Item identifier.
pub type ItemId = i64;

// =============================================================================
// Discount Rate
// =============================================================================

/// Discount rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 3000 bps = 30%, 500 bps = 5%
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Creates a discount rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Creates a discount rate from whole percent.
    #[inline]
    pub const fn from_percent(percent: u32) -> Self {
        DiscountRate(percent * 100)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero discount rate.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

impl fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Item Category
// =============================================================================

/// Category of a purchased item.
///
/// Grocery items are exempt from percentage discounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Groceries.
    Grocery,
    /// Everything else.
    Other,
}

impl ItemCategory {
    /// Returns the lowercase name used in storage and seed files.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::Grocery => "grocery",
            ItemCategory::Other => "other",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grocery" => Ok(ItemCategory::Grocery),
            "other" => Ok(ItemCategory::Other),
            _ => Err(ValidationError::InvalidFormat {
                field: "item category".to_string(),
                reason: format!("unknown category '{}'", s),
            }),
        }
    }
}

// =============================================================================
// User Category
// =============================================================================

/// Category of the purchasing user, the first key of the discount policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum UserCategory {
    /// Store employee.
    Employee,
    /// Affiliate of the store.
    Affiliate,
    /// Regular customer.
    Customer,
}

impl UserCategory {
    /// Returns the lowercase name used in storage and seed files.
    pub const fn as_str(&self) -> &'static str {
        match self {
            UserCategory::Employee => "employee",
            UserCategory::Affiliate => "affiliate",
            UserCategory::Customer => "customer",
        }
    }
}

impl fmt::Display for UserCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "employee" => Ok(UserCategory::Employee),
            "affiliate" => Ok(UserCategory::Affiliate),
            "customer" => Ok(UserCategory::Customer),
            _ => Err(ValidationError::InvalidFormat {
                field: "user category".to_string(),
                reason: format!("unknown category '{}'", s),
            }),
        }
    }
}

// =============================================================================
// Item
// =============================================================================

/// A line item on a bill. Immutable once loaded for a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Item identifier.
    pub id: ItemId,

    /// Price in cents, never negative.
    pub price: Money,

    /// Grocery or other.
    pub category: ItemCategory,
}

impl Item {
    /// Creates a new item.
    pub fn new(id: ItemId, price: Money, category: ItemCategory) -> Self {
        Item {
            id,
            price,
            category,
        }
    }

    /// Checks if the item is a grocery item.
    #[inline]
    pub fn is_grocery(&self) -> bool {
        self.category == ItemCategory::Grocery
    }
}

// =============================================================================
// User
// =============================================================================

/// The purchasing user. Read-only input to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: UserId,

    /// Login name.
    pub username: String,

    /// Employee, affiliate or customer.
    pub category: UserCategory,

    /// Account creation time, the start of the user's tenure.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Bill
// =============================================================================

/// A collection of purchased items owned by exactly one user.
///
/// Item order does not affect the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    /// Bill identifier.
    pub id: BillId,

    /// Owning user.
    pub user_id: UserId,

    /// Line items.
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Bill {
    /// Creates a new bill.
    pub fn new(id: BillId, user_id: UserId, items: Vec<Item>) -> Self {
        Bill { id, user_id, items }
    }

    /// Checks if the bill has no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Bill Summary
// =============================================================================

/// Breakdown of a net payable calculation.
///
/// `net_payable = total - percentage_discount - additional_discount`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BillSummary {
    /// Sum of all item prices.
    pub total: Money,

    /// Sum of grocery item prices.
    pub grocery: Money,

    /// `total - grocery`, the only base for percentage discounts.
    pub non_grocery: Money,

    /// Rate applied to the non-grocery amount.
    pub discount_rate: DiscountRate,

    /// Category/tenure discount on the non-grocery amount.
    pub percentage_discount: Money,

    /// $5 per complete $100 of the total.
    pub additional_discount: Money,

    /// Amount the user pays.
    pub net_payable: Money,
}

// =============================================================================
// Payable Response
// =============================================================================

/// The caller-facing result of a net payable query.
///
/// Serialized as `{"netPayableAmount": "610.00"}`. The amount is an exact
/// decimal string so no binary floating point is involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayableResponse {
    /// Net payable amount with two fraction digits.
    pub net_payable_amount: String,
}

impl From<&BillSummary> for PayableResponse {
    fn from(summary: &BillSummary) -> Self {
        PayableResponse {
            net_payable_amount: summary.net_payable.to_decimal_string(),
        }
    }
}

impl From<BillSummary> for PayableResponse {
    fn from(summary: BillSummary) -> Self {
        PayableResponse::from(&summary)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
