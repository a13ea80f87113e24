//! # Bill Calculator
//!
//! Turns a bill and its owner into a net payable amount.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  fetch_bill_owned_by_user(bill_id, user_id) ── None ──► BillNotFound   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  fetch_user(bill.user_id) ──────────────────── None ──► UserNotFound   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BillTotals { total, grocery, non_grocery }                            │
//! │       │                                                                 │
//! │       ├──► percentage_discount(category, created_at, now, non_grocery) │
//! │       └──► additional_discount(total) = floor(total / $100) × $5       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  net_payable = total − percentage − additional                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The additional discount applies to the full total, groceries included.
//! No clamping is performed on the result.

use chrono::{DateTime, Utc};

use crate::directory::BillDirectory;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::policy;
use crate::types::{BillId, BillSummary, Item, User, UserId};
use crate::validation::validate_query;

/// Flat discount granted per complete $100 of the total.
pub const ADDITIONAL_DISCOUNT_PER_HUNDRED: Money = Money::from_dollars(5);

// =============================================================================
// Totals
// =============================================================================

/// Item prices partitioned by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BillTotals {
    /// Sum of all item prices.
    pub total: Money,
    /// Sum of grocery item prices.
    pub grocery: Money,
}

impl BillTotals {
    /// Sums a set of items. Each item lands in exactly one partition.
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a Item>) -> Self {
        items.into_iter().fold(BillTotals::default(), |mut totals, item| {
            totals.total += item.price;
            if item.is_grocery() {
                totals.grocery += item.price;
            }
            totals
        })
    }

    /// `total - grocery`.
    #[inline]
    pub fn non_grocery(&self) -> Money {
        self.total - self.grocery
    }
}

// =============================================================================
// Discounts
// =============================================================================

/// $5 for every complete $100 of `total`.
///
/// ## Example
/// ```rust
/// use billing_core::calculator::additional_discount;
/// use billing_core::money::Money;
///
/// assert_eq!(additional_discount(Money::from_cents(9_999)), Money::zero());
/// assert_eq!(additional_discount(Money::from_cents(19_999)), Money::from_dollars(5));
/// assert_eq!(additional_discount(Money::from_dollars(200)), Money::from_dollars(10));
/// ```
pub fn additional_discount(total: Money) -> Money {
    ADDITIONAL_DISCOUNT_PER_HUNDRED * total.whole_hundreds()
}

/// Prices a bill's items for `user` at the instant `now`.
///
/// Pure: the caller supplies both entities and the evaluation instant.
pub fn summarize<'a>(
    items: impl IntoIterator<Item = &'a Item>,
    user: &User,
    now: DateTime<Utc>,
) -> BillSummary {
    let totals = BillTotals::from_items(items);
    let non_grocery = totals.non_grocery();

    let discount_rate = policy::discount_rate(user.category, user.created_at, now);
    let percentage_discount = non_grocery.percentage(discount_rate);
    let additional_discount = additional_discount(totals.total);

    BillSummary {
        total: totals.total,
        grocery: totals.grocery,
        non_grocery,
        discount_rate,
        percentage_discount,
        additional_discount,
        net_payable: totals.total - percentage_discount - additional_discount,
    }
}

/// Resolves a bill through `directory` and returns its priced summary.
///
/// ## Errors
/// - `Validation` if either id is not positive
/// - `BillNotFound` if no bill `bill_id` is owned by `user_id`
/// - `UserNotFound` if the bill's owner cannot be resolved
///
/// ## Example
/// ```rust
/// use billing_core::calculator::calculate_net_payable;
/// use billing_core::directory::InMemoryDirectory;
/// use billing_core::money::Money;
/// use billing_core::types::{Bill, Item, ItemCategory, User, UserCategory};
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let directory = InMemoryDirectory::from_records(
///     [User { id: 1, username: "sam".into(), category: UserCategory::Employee, created_at: now }],
///     [Bill::new(1, 1, vec![Item::new(1, Money::from_dollars(100), ItemCategory::Other)])],
/// );
///
/// let summary = calculate_net_payable(&directory, 1, 1, now).unwrap();
/// assert_eq!(summary.net_payable, Money::from_dollars(65)); // 100 - 30 - 5
/// ```
pub fn calculate_net_payable<D>(
    directory: &D,
    bill_id: BillId,
    user_id: UserId,
    now: DateTime<Utc>,
) -> CoreResult<BillSummary>
where
    D: BillDirectory + ?Sized,
{
    validate_query(bill_id, user_id)?;

    let bill = directory
        .fetch_bill_owned_by_user(bill_id, user_id)
        .ok_or(CoreError::BillNotFound { bill_id, user_id })?;

    let user = directory
        .fetch_user(bill.user_id)
        .ok_or(CoreError::UserNotFound {
            user_id: bill.user_id,
        })?;

    Ok(summarize(&bill.items, &user, now))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::InMemoryDirectory;
    use crate::types::{Bill, ItemCategory, UserCategory};
    use chrono::{Months, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap()
    }

    fn three_years_ago() -> DateTime<Utc> {
        now().checked_sub_months(Months::new(36)).unwrap()
    }

    fn user(id: UserId, category: UserCategory, created_at: DateTime<Utc>) -> User {
        User {
            id,
            username: format!("user{id}"),
            category,
            created_at,
        }
    }

    fn grocery(id: i64, dollars: i64) -> Item {
        Item::new(id, Money::from_dollars(dollars), ItemCategory::Grocery)
    }

    fn other(id: i64, dollars: i64) -> Item {
        Item::new(id, Money::from_dollars(dollars), ItemCategory::Other)
    }

    /// G $200, G $100, O $150, O $50, O $300
    fn mixed_items() -> Vec<Item> {
        vec![
            grocery(1, 200),
            grocery(2, 100),
            other(3, 150),
            other(4, 50),
            other(5, 300),
        ]
    }

    fn net_for(user: User, items: Vec<Item>) -> Money {
        let bill = Bill::new(user.id, user.id, items);
        let directory = InMemoryDirectory::from_records([user], [bill.clone()]);
        calculate_net_payable(&directory, bill.id, bill.user_id, now())
            .unwrap()
            .net_payable
    }

    #[test]
    fn test_employee_scenario() {
        let employee = user(1, UserCategory::Employee, three_years_ago());
        assert_eq!(net_for(employee, mixed_items()), Money::from_dollars(610));
    }

    #[test]
    fn test_affiliate_scenario() {
        let affiliate = user(2, UserCategory::Affiliate, three_years_ago());
        assert_eq!(net_for(affiliate, mixed_items()), Money::from_dollars(710));
    }

    #[test]
    fn test_new_customer_scenario() {
        let customer = user(3, UserCategory::Customer, now());
        assert_eq!(net_for(customer, mixed_items()), Money::from_dollars(760));
    }

    #[test]
    fn test_loyal_customer_scenario() {
        let customer = user(4, UserCategory::Customer, three_years_ago());
        assert_eq!(net_for(customer, mixed_items()), Money::from_dollars(735));
    }

    #[test]
    fn test_empty_bill_scenario() {
        let customer = user(5, UserCategory::Customer, three_years_ago());
        assert_eq!(net_for(customer, Vec::new()), Money::zero());
    }

    #[test]
    fn test_single_grocery_item_scenario() {
        let customer = user(6, UserCategory::Customer, now());
        assert_eq!(net_for(customer, vec![grocery(1, 200)]), Money::from_dollars(190));
    }

    #[test]
    fn test_summary_breakdown() {
        let employee = user(1, UserCategory::Employee, now());
        let summary = summarize(&mixed_items(), &employee, now());

        assert_eq!(summary.total, Money::from_dollars(800));
        assert_eq!(summary.grocery, Money::from_dollars(300));
        assert_eq!(summary.non_grocery, Money::from_dollars(500));
        assert_eq!(summary.discount_rate, policy::EMPLOYEE_RATE);
        assert_eq!(summary.percentage_discount, Money::from_dollars(150));
        assert_eq!(summary.additional_discount, Money::from_dollars(40));
        assert_eq!(summary.net_payable, Money::from_dollars(610));
    }

    #[test]
    fn test_empty_bill_is_zero_for_every_user() {
        for category in [
            UserCategory::Employee,
            UserCategory::Affiliate,
            UserCategory::Customer,
        ] {
            let summary = summarize(&Vec::<Item>::new(), &user(1, category, three_years_ago()), now());
            assert_eq!(summary, BillSummary {
                discount_rate: summary.discount_rate,
                ..BillSummary::default()
            });
        }
    }

    #[test]
    fn test_all_grocery_bill_gets_no_percentage_discount() {
        let employee = user(1, UserCategory::Employee, three_years_ago());
        let items = vec![grocery(1, 120), grocery(2, 95)];
        let summary = summarize(&items, &employee, now());

        assert!(summary.non_grocery.is_zero());
        assert!(summary.percentage_discount.is_zero());
        assert_eq!(summary.additional_discount, Money::from_dollars(10));
        assert_eq!(summary.net_payable, Money::from_dollars(205));
    }

    #[test]
    fn test_additional_discount_step_function() {
        assert_eq!(additional_discount(Money::zero()), Money::zero());
        assert_eq!(additional_discount(Money::from_cents(9_999)), Money::zero());
        assert_eq!(additional_discount(Money::from_cents(10_000)), Money::from_dollars(5));
        assert_eq!(additional_discount(Money::from_cents(19_999)), Money::from_dollars(5));
        assert_eq!(additional_discount(Money::from_cents(20_000)), Money::from_dollars(10));
    }

    #[test]
    fn test_additional_discount_band_boundary_from_cents() {
        // Three prices that sum to exactly $100.00
        let items = vec![
            Item::new(1, Money::from_cents(3_333), ItemCategory::Other),
            Item::new(2, Money::from_cents(3_333), ItemCategory::Other),
            Item::new(3, Money::from_cents(3_334), ItemCategory::Other),
        ];
        let totals = BillTotals::from_items(&items);
        assert_eq!(totals.total, Money::from_dollars(100));
        assert_eq!(additional_discount(totals.total), Money::from_dollars(5));
    }

    #[test]
    fn test_adding_items_never_lowers_total_or_additional_discount() {
        let mut items = Vec::new();
        let mut last = BillTotals::default();
        for (id, cents) in [4_999, 5_001, 1, 9_999, 10_000, 250].into_iter().enumerate() {
            items.push(Item::new(id as i64, Money::from_cents(cents), ItemCategory::Grocery));
            let totals = BillTotals::from_items(&items);
            assert!(totals.total >= last.total);
            assert!(additional_discount(totals.total) >= additional_discount(last.total));
            last = totals;
        }
    }

    #[test]
    fn test_item_order_does_not_matter() {
        let customer = user(1, UserCategory::Affiliate, now());
        let mut reversed = mixed_items();
        reversed.reverse();
        assert_eq!(
            summarize(&mixed_items(), &customer, now()),
            summarize(&reversed, &customer, now())
        );
    }

    #[test]
    fn test_percentage_discount_rounds_to_cents() {
        // 5% of $0.50 = 2.5 cents → 3 cents
        let customer = user(1, UserCategory::Customer, three_years_ago());
        let items = vec![Item::new(1, Money::from_cents(50), ItemCategory::Other)];
        let summary = summarize(&items, &customer, now());
        assert_eq!(summary.percentage_discount, Money::from_cents(3));
        assert_eq!(summary.net_payable, Money::from_cents(47));
    }

    #[test]
    fn test_missing_bill_is_reported_before_user() {
        let directory = InMemoryDirectory::new();
        let err = calculate_net_payable(&directory, 1, 1, now()).unwrap_err();
        assert!(matches!(err, CoreError::BillNotFound { bill_id: 1, user_id: 1 }));
    }

    #[test]
    fn test_bill_owned_by_someone_else_is_not_found() {
        let owner = user(1, UserCategory::Customer, now());
        let directory =
            InMemoryDirectory::from_records([owner], [Bill::new(9, 1, mixed_items())]);
        let err = calculate_net_payable(&directory, 9, 2, now()).unwrap_err();
        assert!(matches!(err, CoreError::BillNotFound { bill_id: 9, user_id: 2 }));
    }

    #[test]
    fn test_missing_owner_is_user_not_found() {
        let directory =
            InMemoryDirectory::from_records(Vec::<User>::new(), [Bill::new(9, 4, mixed_items())]);
        let err = calculate_net_payable(&directory, 9, 4, now()).unwrap_err();
        assert!(matches!(err, CoreError::UserNotFound { user_id: 4 }));
    }

    #[test]
    fn test_non_positive_ids_are_rejected() {
        let directory = InMemoryDirectory::new();
        let err = calculate_net_payable(&directory, 0, 1, now()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
