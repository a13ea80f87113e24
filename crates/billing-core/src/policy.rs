//! # Discount Policy
//!
//! Percentage discount by user category and loyalty tenure.
//!
//! ## Policy Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Category    │ Rule                                      │ Rate         │
//! │──────────────┼───────────────────────────────────────────┼──────────────│
//! │  Employee    │ always                                    │ 30%          │
//! │  Affiliate   │ always                                    │ 10%          │
//! │  Customer    │ created_at strictly before now − 2 years  │ 5%           │
//! │  Customer    │ otherwise                                 │ 0%           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The rate applies to the non-grocery amount only. `now` is always passed
//! in, never read from the system clock.

use chrono::{DateTime, Months, Utc};

use crate::money::Money;
use crate::types::{DiscountRate, UserCategory};

/// Employee rate: 30%.
pub const EMPLOYEE_RATE: DiscountRate = DiscountRate::from_percent(30);

/// Affiliate rate: 10%.
pub const AFFILIATE_RATE: DiscountRate = DiscountRate::from_percent(10);

/// Loyal customer rate: 5%.
pub const LOYAL_CUSTOMER_RATE: DiscountRate = DiscountRate::from_percent(5);

/// Tenure a customer needs before the loyalty rate applies.
pub const LOYALTY_TENURE_YEARS: u32 = 2;

/// Returns true when `tenure_start` lies strictly before `now` minus
/// [`LOYALTY_TENURE_YEARS`].
///
/// Years are subtracted as calendar months, so Feb 29 maps to Feb 28.
pub fn has_loyalty_tenure(tenure_start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.checked_sub_months(Months::new(LOYALTY_TENURE_YEARS * 12))
        .is_some_and(|cutoff| tenure_start < cutoff)
}

/// Returns the percentage rate for a user category and tenure.
///
/// ## Example
/// ```rust
/// use billing_core::policy::discount_rate;
/// use billing_core::types::{DiscountRate, UserCategory};
/// use chrono::{TimeZone, Utc};
///
/// let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
/// let joined = Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap();
///
/// assert_eq!(
///     discount_rate(UserCategory::Customer, joined, now),
///     DiscountRate::from_percent(5)
/// );
/// assert!(discount_rate(UserCategory::Customer, now, now).is_zero());
/// ```
pub fn discount_rate(
    category: UserCategory,
    tenure_start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> DiscountRate {
    match category {
        UserCategory::Employee => EMPLOYEE_RATE,
        UserCategory::Affiliate => AFFILIATE_RATE,
        UserCategory::Customer if has_loyalty_tenure(tenure_start, now) => LOYAL_CUSTOMER_RATE,
        UserCategory::Customer => DiscountRate::zero(),
    }
}

/// Returns the percentage discount amount on `non_grocery`.
///
/// ## Example
/// ```rust
/// use billing_core::money::Money;
/// use billing_core::policy::percentage_discount;
/// use billing_core::types::UserCategory;
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let discount = percentage_discount(UserCategory::Employee, now, now, Money::from_dollars(500));
/// assert_eq!(discount, Money::from_dollars(150));
/// ```
pub fn percentage_discount(
    category: UserCategory,
    tenure_start: DateTime<Utc>,
    now: DateTime<Utc>,
    non_grocery: Money,
) -> Money {
    non_grocery.percentage(discount_rate(category, tenure_start, now))
}

// =============================================================================
// Unit Tests
// =============================================================================
