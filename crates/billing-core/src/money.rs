//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With binary floating point:                                            │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  The volume discount floors total / $100. A total that should be       │
//! │  exactly $100.00 but lands on 99.99999999 floors to 0 instead of 1.   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    10000 cents / 10000 = 1 complete hundred, always                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use billing_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(15000); // $150.00
//!
//! // Or parse an exact decimal string
//! let parsed: Money = "150.00".parse().unwrap();
//! assert_eq!(price, parsed);
//!
//! // Arithmetic operations
//! let total = price + Money::from_cents(5000); // $200.00
//! assert_eq!(total.whole_hundreds(), 2);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::DiscountRate;

/// Cents in one dollar.
const CENTS_PER_DOLLAR: i64 = 100;

/// Cents in one hundred dollars (the volume discount band).
const CENTS_PER_HUNDRED_DOLLARS: i64 = 100 * CENTS_PER_DOLLAR;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Discounts are subtracted freely; a negative net
///   amount stays representable so it can be detected instead of clamped
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: serde serializes the raw cent count
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  Item.price ──► BillTotals.total / grocery / non_grocery               │
/// │                          │                                              │
/// │                          ├──► percentage discount (policy)             │
/// │                          └──► additional discount ($5 per $100)        │
/// │                                       │                                 │
/// │                                       ▼                                 │
/// │                               BillSummary.net_payable                  │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use billing_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole dollars.
    ///
    /// ## Example
    /// ```rust
    /// use billing_core::money::Money;
    ///
    /// assert_eq!(Money::from_dollars(5).cents(), 500);
    /// ```
    #[inline]
    pub const fn from_dollars(dollars: i64) -> Self {
        Money(dollars * CENTS_PER_DOLLAR)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -$5.50, not -$4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * CENTS_PER_DOLLAR - minor)
        } else {
            Money(major * CENTS_PER_DOLLAR + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / CENTS_PER_DOLLAR
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % CENTS_PER_DOLLAR).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Number of complete $100 bands in this amount, floored.
    ///
    /// ## Example
    /// ```rust
    /// use billing_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(9_999).whole_hundreds(), 0);
    /// assert_eq!(Money::from_cents(10_000).whole_hundreds(), 1);
    /// assert_eq!(Money::from_cents(19_999).whole_hundreds(), 1);
    /// assert_eq!(Money::from_cents(20_000).whole_hundreds(), 2);
    /// ```
    #[inline]
    pub const fn whole_hundreds(&self) -> i64 {
        self.0.div_euclid(CENTS_PER_HUNDRED_DOLLARS)
    }

    /// Returns `rate` of this amount, rounded half-up to the nearest cent.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. The +5000 provides
    /// rounding (5000/10000 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use billing_core::money::Money;
    /// use billing_core::types::DiscountRate;
    ///
    /// let non_grocery = Money::from_dollars(500);
    /// let discount = non_grocery.percentage(DiscountRate::from_bps(3000)); // 30%
    /// assert_eq!(discount, Money::from_dollars(150));
    ///
    /// // 5% of $0.50 = 2.5 cents → 3 cents
    /// let small = Money::from_cents(50).percentage(DiscountRate::from_bps(500));
    /// assert_eq!(small.cents(), 3);
    /// ```
    pub fn percentage(&self, rate: DiscountRate) -> Money {
        // i128 prevents overflow on large amounts
        let cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }

    /// Formats the amount as a plain decimal string with two fraction digits.
    ///
    /// ## Example
    /// ```rust
    /// use billing_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(61000).to_decimal_string(), "610.00");
    /// assert_eq!(Money::from_cents(-550).to_decimal_string(), "-5.50");
    /// ```
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a non-negative decimal amount such as `"150"`, `"150.5"` or
/// `"150.50"` into exact cents.
///
/// More than two fraction digits is rejected rather than rounded.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "amount".to_string(),
            });
        }

        let (whole, fraction) = match s.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (s, ""),
        };

        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected digits before the decimal point"));
        }
        if s.contains('.') && fraction.is_empty() {
            return Err(invalid("expected digits after the decimal point"));
        }
        if fraction.len() > 2 {
            return Err(invalid("at most two fraction digits are allowed"));
        }
        if !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("fraction must contain only digits"));
        }

        let dollars: i64 = whole.parse().map_err(|_| invalid("amount is too large"))?;
        let minor: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid("bad fraction"))? * 10,
            _ => fraction.parse::<i64>().map_err(|_| invalid("bad fraction"))?,
        };

        dollars
            .checked_mul(CENTS_PER_DOLLAR)
            .and_then(|cents| cents.checked_add(minor))
            .map(Money::from_cents)
            .ok_or_else(|| invalid("amount is too large"))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. Callers that need a machine-readable
/// value use [`Money::to_decimal_string`].
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64 (e.g. $5 × number of complete hundreds).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, factor: i64) -> Self {
        Money(self.0 * factor)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
