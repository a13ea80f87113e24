//! # Seeding
//!
//! Loads users and bills from two JSON documents and replaces the stored
//! data with them.
//!
//! ## Document Shapes
//! ```text
//! users.json                               bills.json
//! [                                        [
//!   {                                        {
//!     "id": 1,                                 "id": 1,
//!     "username": "emma",                      "userId": 1,
//!     "category": "EMPLOYEE",                  "items": [
//!     "createdAt": "2024-05-01T09:00:00Z"        { "id": 1, "price": "200.00",
//!   }                                              "category": "GROCERY" }
//! ]                                            ]
//!                                            }
//!                                          ]
//! ```
//!
//! Categories are case-insensitive. Prices are decimal strings (JSON
//! numbers are accepted too) with at most two fraction digits.
//!
//! ## Seeding Process
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SeedData::from_files(users.json, bills.json)                          │
//! │       │  parse JSON, parse categories and prices, validate ids         │
//! │       ▼                                                                 │
//! │  seed_database(&db, &data)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │    DELETE bill_items, bills, users                                     │
//! │    INSERT users, bills, bill_items                                     │
//! │  COMMIT   (any failure rolls everything back)                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use billing_core::validation::{validate_bill, validate_id, validate_unique_ids};
use billing_core::{
    Bill, BillId, InMemoryDirectory, Item, ItemCategory, ItemId, Money, User, UserCategory,
    UserId, ValidationError,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use crate::config::SeedSettings;
use crate::error::{SeedError, SeedResult};
use crate::pool::Database;
use crate::repository::bill::{delete_all_bills, insert_bill};
use crate::repository::user::{delete_all_users, insert_user};

// =============================================================================
// Document Records
// =============================================================================

/// One entry of `users.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    id: UserId,
    username: String,
    category: String,
    created_at: DateTime<Utc>,
}

/// One entry of `bills.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BillRecord {
    id: BillId,
    user_id: UserId,
    #[serde(default)]
    items: Vec<ItemRecord>,
}

/// One item of a bill entry.
#[derive(Debug, Clone, Deserialize)]
struct ItemRecord {
    id: ItemId,
    price: PriceRecord,
    category: String,
}

/// A price written either as `"150.50"` or as `150.5`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PriceRecord {
    Text(String),
    Number(serde_json::Number),
}

impl PriceRecord {
    fn to_money(&self) -> Result<Money, ValidationError> {
        match self {
            PriceRecord::Text(text) => text.parse(),
            PriceRecord::Number(number) => number.to_string().parse(),
        }
    }
}

impl TryFrom<UserRecord> for User {
    type Error = ValidationError;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        validate_id("user_id", record.id)?;
        if record.username.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "username".to_string(),
            });
        }

        Ok(User {
            id: record.id,
            username: record.username,
            category: record.category.parse::<UserCategory>()?,
            created_at: record.created_at,
        })
    }
}

impl TryFrom<BillRecord> for Bill {
    type Error = ValidationError;

    fn try_from(record: BillRecord) -> Result<Self, Self::Error> {
        let items = record
            .items
            .into_iter()
            .map(|item| {
                Ok(Item::new(
                    item.id,
                    item.price.to_money()?,
                    item.category.parse::<ItemCategory>()?,
                ))
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        let bill = Bill::new(record.id, record.user_id, items);
        validate_bill(&bill)?;
        Ok(bill)
    }
}

// =============================================================================
// Seed Data
// =============================================================================

/// Validated users and bills ready to be stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedData {
    pub users: Vec<User>,
    pub bills: Vec<Bill>,
}

/// Counts written by [`seed_database`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub bills: usize,
    pub items: usize,
}

impl SeedData {
    /// Parses and validates the two JSON documents.
    ///
    /// ## Rules
    /// - User and bill ids are positive and unique within their document
    /// - Every bill belongs to a user of `users_json`
    /// - Prices are non-negative with at most two fraction digits
    pub fn from_json_str(users_json: &str, bills_json: &str) -> SeedResult<Self> {
        let user_records: Vec<UserRecord> = serde_json::from_str(users_json)?;
        let bill_records: Vec<BillRecord> = serde_json::from_str(bills_json)?;

        let users = user_records
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let bills = bill_records
            .into_iter()
            .map(Bill::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        validate_unique_ids("user id", users.iter().map(|u| u.id))?;
        validate_unique_ids("bill id", bills.iter().map(|b| b.id))?;

        let known: HashSet<UserId> = users.iter().map(|u| u.id).collect();
        if let Some(orphan) = bills.iter().find(|b| !known.contains(&b.user_id)) {
            return Err(ValidationError::InvalidFormat {
                field: "userId".to_string(),
                reason: format!("bill {} refers to unknown user {}", orphan.id, orphan.user_id),
            }
            .into());
        }

        debug!(users = users.len(), bills = bills.len(), "Seed documents parsed");
        Ok(SeedData { users, bills })
    }

    /// Reads and parses the two JSON files.
    pub fn from_files(users_path: &Path, bills_path: &Path) -> SeedResult<Self> {
        let users_json = read_seed_file(users_path)?;
        let bills_json = read_seed_file(bills_path)?;
        Self::from_json_str(&users_json, &bills_json)
    }

    /// Reads the files named by the seed settings.
    pub fn from_settings(settings: &SeedSettings) -> SeedResult<Self> {
        Self::from_files(&settings.users_path(), &settings.bills_path())
    }

    /// Total number of items across all bills.
    pub fn item_count(&self) -> usize {
        self.bills.iter().map(|b| b.items.len()).sum()
    }

    /// Builds an in-memory directory holding the same records.
    pub fn into_directory(self) -> InMemoryDirectory {
        InMemoryDirectory::from_records(self.users, self.bills)
    }
}

fn read_seed_file(path: &Path) -> SeedResult<String> {
    debug!(path = %path.display(), "Reading seed file");
    std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Replaces all stored users and bills with `data` in one transaction.
pub async fn seed_database(db: &Database, data: &SeedData) -> SeedResult<SeedReport> {
    info!(
        users = data.users.len(),
        bills = data.bills.len(),
        "Seeding database"
    );

    let mut tx = db.pool().begin().await?;

    let removed_bills = delete_all_bills(&mut *tx).await?;
    let removed_users = delete_all_users(&mut *tx).await?;
    debug!(removed_bills, removed_users, "Cleared existing data");

    for user in &data.users {
        insert_user(&mut *tx, user).await?;
    }
    for bill in &data.bills {
        insert_bill(&mut *tx, bill).await?;
    }

    tx.commit().await?;

    let report = SeedReport {
        users: data.users.len(),
        bills: data.bills.len(),
        items: data.item_count(),
    };
    info!(
        users = report.users,
        bills = report.bills,
        items = report.items,
        "Seeding complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use crate::service::BillingService;
    use billing_core::{calculate_net_payable, CoreError};
    use chrono::TimeZone;

    const USERS: &str = include_str!("../../../data/users.json");
    const BILLS: &str = include_str!("../../../data/bills.json");

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    const EXPECTED: [(BillId, UserId, i64); 6] =
        [(1, 1, 610), (2, 2, 710), (3, 3, 760), (4, 4, 735), (5, 5, 0), (6, 5, 190)];

    #[test]
    fn test_sample_documents_parse() {
        let data = SeedData::from_json_str(USERS, BILLS).unwrap();
        assert_eq!(data.users.len(), 5);
        assert_eq!(data.bills.len(), 6);
        assert_eq!(data.item_count(), 21);
        assert_eq!(data.users[0].category, UserCategory::Employee);
    }

    #[test]
    fn test_sample_documents_in_memory() {
        let directory = SeedData::from_json_str(USERS, BILLS).unwrap().into_directory();

        for (bill_id, user_id, expected) in EXPECTED {
            let summary = calculate_net_payable(&directory, bill_id, user_id, now()).unwrap();
            assert_eq!(summary.net_payable, Money::from_dollars(expected), "bill {bill_id}");
        }
    }

    #[tokio::test]
    async fn test_seed_then_query() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let data = SeedData::from_json_str(USERS, BILLS).unwrap();

        let report = seed_database(&db, &data).await.unwrap();
        assert_eq!(report, SeedReport { users: 5, bills: 6, items: 21 });

        let service = BillingService::new(db);
        for (bill_id, user_id, expected) in EXPECTED {
            let summary = service.net_payable_at(bill_id, user_id, now()).await.unwrap();
            assert_eq!(summary.net_payable, Money::from_dollars(expected), "bill {bill_id}");
        }
    }

    #[tokio::test]
    async fn test_reseeding_replaces_data() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_database(&db, &SeedData::from_json_str(USERS, BILLS).unwrap())
            .await
            .unwrap();

        let smaller = SeedData::from_json_str(
            r#"[{"id": 9, "username": "solo", "category": "customer", "createdAt": "2020-01-01T00:00:00Z"}]"#,
            r#"[{"id": 1, "userId": 9, "items": [{"id": 1, "price": 120, "category": "other"}]}]"#,
        )
        .unwrap();
        seed_database(&db, &smaller).await.unwrap();

        assert_eq!(db.users().count().await.unwrap(), 1);
        assert_eq!(db.bills().count().await.unwrap(), 1);

        let service = BillingService::new(db);
        let err = service.net_payable_at(1, 1, now()).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::ServiceError::Core(CoreError::BillNotFound { .. })
        ));

        // 120 - 6 (5%) - 5
        let summary = service.net_payable_at(1, 9, now()).await.unwrap();
        assert_eq!(summary.net_payable, Money::from_dollars(109));
    }

    #[test]
    fn test_prices_are_exact() {
        let data = SeedData::from_json_str(
            r#"[{"id": 1, "username": "a", "category": "affiliate", "createdAt": "2020-01-01T00:00:00Z"}]"#,
            r#"[{"id": 1, "userId": 1, "items": [
                {"id": 1, "price": "0.10", "category": "grocery"},
                {"id": 2, "price": 150.5, "category": "OTHER"}
            ]}]"#,
        )
        .unwrap();

        let items = &data.bills[0].items;
        assert_eq!(items[0].price, Money::from_cents(10));
        assert_eq!(items[1].price, Money::from_cents(15_050));
    }

    #[test]
    fn test_bill_without_items_key() {
        let data = SeedData::from_json_str(
            r#"[{"id": 1, "username": "a", "category": "customer", "createdAt": "2020-01-01T00:00:00Z"}]"#,
            r#"[{"id": 3, "userId": 1}]"#,
        )
        .unwrap();
        assert!(data.bills[0].is_empty());
    }

    #[test]
    fn test_rejects_bad_records() {
        let user = r#"[{"id": 1, "username": "a", "category": "customer", "createdAt": "2020-01-01T00:00:00Z"}]"#;

        let bad_price = r#"[{"id": 1, "userId": 1, "items": [{"id": 1, "price": "1.234", "category": "other"}]}]"#;
        assert!(matches!(
            SeedData::from_json_str(user, bad_price),
            Err(SeedError::Validation(ValidationError::InvalidFormat { .. }))
        ));

        let negative = r#"[{"id": 1, "userId": 1, "items": [{"id": 1, "price": "-5.00", "category": "other"}]}]"#;
        assert!(matches!(
            SeedData::from_json_str(user, negative),
            Err(SeedError::Validation(_))
        ));

        let bad_category = r#"[{"id": 1, "userId": 1, "items": [{"id": 1, "price": "5.00", "category": "toys"}]}]"#;
        assert!(matches!(
            SeedData::from_json_str(user, bad_category),
            Err(SeedError::Validation(ValidationError::InvalidFormat { .. }))
        ));

        let orphan = r#"[{"id": 1, "userId": 2}]"#;
        assert!(matches!(
            SeedData::from_json_str(user, orphan),
            Err(SeedError::Validation(ValidationError::InvalidFormat { .. }))
        ));

        let duplicate = r#"[{"id": 1, "userId": 1}, {"id": 1, "userId": 1}]"#;
        assert!(matches!(
            SeedData::from_json_str(user, duplicate),
            Err(SeedError::Validation(ValidationError::Duplicate { .. }))
        ));

        let zero_id = r#"[{"id": 0, "userId": 1}]"#;
        assert!(matches!(
            SeedData::from_json_str(user, zero_id),
            Err(SeedError::Validation(ValidationError::MustBePositive { .. }))
        ));

        assert!(matches!(
            SeedData::from_json_str("{not json", "[]"),
            Err(SeedError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = std::env::temp_dir().join("billing-seed-missing-dir");
        let err = SeedData::from_files(&dir.join("users.json"), &dir.join("bills.json")).unwrap_err();
        assert!(matches!(err, SeedError::Io { .. }));
    }

    #[tokio::test]
    async fn test_failed_seed_keeps_previous_data() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_database(&db, &SeedData::from_json_str(USERS, BILLS).unwrap())
            .await
            .unwrap();

        // Bypasses document validation: the bill's owner does not exist.
        let broken = SeedData {
            users: vec![],
            bills: vec![Bill::new(1, 42, vec![])],
        };
        assert!(seed_database(&db, &broken).await.is_err());

        assert_eq!(db.users().count().await.unwrap(), 5);
        assert_eq!(db.bills().count().await.unwrap(), 6);
    }
}
