//! # Bill Repository
//!
//! Database operations for bills and their items.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  bills                        bill_items                               │
//! │  ┌──────┬─────────┐           ┌─────────┬─────────┬─────────┬───────┐  │
//! │  │ id   │ user_id │ ◄──────── │ bill_id │ line_no │ item_id │ price │  │
//! │  └──────┴─────────┘           └─────────┴─────────┴─────────┴───────┘  │
//! │                                                                         │
//! │  find_by_id_and_user_id(7, 3)                                          │
//! │    1. SELECT bill WHERE id = 7 AND user_id = 3  (owner-scoped)         │
//! │    2. SELECT items WHERE bill_id = 7 ORDER BY line_no                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use billing_core::validation::validate_price;
use billing_core::{Bill, BillId, Item, ItemCategory, Money, UserId};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Row shape of the `bills` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct BillRow {
    id: i64,
    user_id: i64,
}

/// Row shape of the `bill_items` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct BillItemRow {
    item_id: i64,
    price_cents: i64,
    category: ItemCategory,
}

impl TryFrom<BillItemRow> for Item {
    type Error = DbError;

    fn try_from(row: BillItemRow) -> Result<Self, Self::Error> {
        let price = Money::from_cents(row.price_cents);
        validate_price(price)
            .map_err(|e| DbError::invalid_row("bill item", row.item_id, e.to_string()))?;
        Ok(Item::new(row.item_id, price, row.category))
    }
}

/// Repository for bill database operations.
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: SqlitePool,
}

impl BillRepository {
    /// Creates a new BillRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BillRepository { pool }
    }

    /// Gets a bill by ID, only if it is owned by `user_id`.
    ///
    /// Both queries run on one pooled connection.
    pub async fn find_by_id_and_user_id(
        &self,
        bill_id: BillId,
        user_id: UserId,
    ) -> DbResult<Option<Bill>> {
        debug!(bill_id, user_id, "Fetching bill");

        let mut conn = self.pool.acquire().await?;

        let bill = sqlx::query_as::<_, BillRow>(
            r#"
            SELECT id, user_id
            FROM bills
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(bill_id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(bill) = bill else {
            debug!(bill_id, user_id, "No bill for this owner");
            return Ok(None);
        };

        let items = sqlx::query_as::<_, BillItemRow>(
            r#"
            SELECT item_id, price_cents, category
            FROM bill_items
            WHERE bill_id = ?1
            ORDER BY line_no
            "#,
        )
        .bind(bill.id)
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(Item::try_from)
        .collect::<DbResult<Vec<_>>>()?;

        debug!(bill_id, item_count = items.len(), "Bill loaded");
        Ok(Some(Bill::new(bill.id, bill.user_id, items)))
    }

    /// Inserts a bill and its items atomically.
    pub async fn insert(&self, bill: &Bill) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        insert_bill(&mut *tx, bill).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Counts bills.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bills")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Inserts a bill and its items on an existing connection.
///
/// Items get `line_no` 0..n in their given order.
pub(crate) async fn insert_bill(conn: &mut SqliteConnection, bill: &Bill) -> DbResult<()> {
    debug!(bill_id = bill.id, user_id = bill.user_id, items = bill.items.len(), "Inserting bill");

    sqlx::query("INSERT INTO bills (id, user_id) VALUES (?1, ?2)")
        .bind(bill.id)
        .bind(bill.user_id)
        .execute(&mut *conn)
        .await?;

    for (line_no, item) in bill.items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO bill_items (bill_id, line_no, item_id, price_cents, category)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(bill.id)
        .bind(line_no as i64)
        .bind(item.id)
        .bind(item.price.cents())
        .bind(item.category)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Removes every bill and item.
pub(crate) async fn delete_all_bills(conn: &mut SqliteConnection) -> DbResult<u64> {
    sqlx::query("DELETE FROM bill_items").execute(&mut *conn).await?;
    let result = sqlx::query("DELETE FROM bills").execute(&mut *conn).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use billing_core::{User, UserCategory};
    use chrono::Utc;

    async fn db_with_user(user_id: UserId) -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.users()
            .insert(&User {
                id: user_id,
                username: format!("user{user_id}"),
                category: UserCategory::Customer,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        db
    }

    fn sample_bill() -> Bill {
        Bill::new(
            7,
            3,
            vec![
                Item::new(1, Money::from_cents(20_000), ItemCategory::Grocery),
                Item::new(3, Money::from_cents(15_050), ItemCategory::Other),
                Item::new(1, Money::from_cents(20_000), ItemCategory::Grocery),
            ],
        )
    }

    #[tokio::test]
    async fn test_insert_and_find_round_trip_keeps_items() {
        let db = db_with_user(3).await;
        db.bills().insert(&sample_bill()).await.unwrap();

        let found = db.bills().find_by_id_and_user_id(7, 3).await.unwrap();
        assert_eq!(found, Some(sample_bill()));
        assert_eq!(db.bills().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_lookup_is_scoped_to_owner() {
        let db = db_with_user(3).await;
        db.bills().insert(&sample_bill()).await.unwrap();

        assert!(db.bills().find_by_id_and_user_id(7, 4).await.unwrap().is_none());
        assert!(db.bills().find_by_id_and_user_id(8, 3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_bill() {
        let db = db_with_user(3).await;
        db.bills().insert(&Bill::new(9, 3, vec![])).await.unwrap();

        let found = db.bills().find_by_id_and_user_id(9, 3).await.unwrap().unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_bill_for_unknown_user_is_rejected_atomically() {
        let db = db_with_user(3).await;

        let err = db.bills().insert(&Bill::new(9, 99, vec![])).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert_eq!(db.bills().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_negative_price_is_rejected_by_schema() {
        let db = db_with_user(3).await;
        let bill = Bill::new(
            9,
            3,
            vec![Item::new(1, Money::from_cents(-1), ItemCategory::Other)],
        );

        assert!(db.bills().insert(&bill).await.is_err());
        assert_eq!(db.bills().count().await.unwrap(), 0);
    }
}
