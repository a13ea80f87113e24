//! # Billing Service
//!
//! Async entry point that resolves a bill and its owner from SQLite and
//! hands them to the pure calculator in billing-core.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  net_payable(bill_id, user_id)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_query ──────────────── non-positive id ──► Validation error  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  bills.find_by_id_and_user_id ── None ──────────────► BillNotFound     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  users.find_by_id(bill.user_id) ── None ────────────► UserNotFound     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  billing_core::summarize(items, user, now) ─────────► BillSummary      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use billing_core::validation::validate_query;
use billing_core::{summarize, BillId, BillSummary, CoreError, UserId};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::ServiceResult;
use crate::pool::Database;

/// Computes net payable amounts for stored bills.
///
/// Cloning is cheap: clones share the same pool.
#[derive(Debug, Clone)]
pub struct BillingService {
    db: Database,
}

impl BillingService {
    /// Creates a service over an open database.
    pub fn new(db: Database) -> Self {
        BillingService { db }
    }

    /// Returns the underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Net payable summary of `bill_id` for `user_id`, evaluated now.
    pub async fn net_payable(&self, bill_id: BillId, user_id: UserId) -> ServiceResult<BillSummary> {
        self.net_payable_at(bill_id, user_id, Utc::now()).await
    }

    /// Net payable summary of `bill_id` for `user_id`, evaluated at `now`.
    ///
    /// ## Errors
    /// - `CoreError::Validation` when either id is not positive
    /// - `CoreError::BillNotFound` when no bill has this id and owner
    /// - `CoreError::UserNotFound` when the bill's owner is missing
    /// - `DbError` on storage failures
    pub async fn net_payable_at(
        &self,
        bill_id: BillId,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> ServiceResult<BillSummary> {
        debug!(bill_id, user_id, %now, "Computing net payable");

        validate_query(bill_id, user_id).map_err(CoreError::from)?;

        let bill = self
            .db
            .bills()
            .find_by_id_and_user_id(bill_id, user_id)
            .await?
            .ok_or(CoreError::BillNotFound { bill_id, user_id })?;

        let user = self
            .db
            .users()
            .find_by_id(bill.user_id)
            .await?
            .ok_or(CoreError::UserNotFound {
                user_id: bill.user_id,
            })?;

        let summary = summarize(&bill.items, &user, now);

        if summary.net_payable.is_negative() {
            warn!(
                bill_id,
                user_id,
                total = %summary.total,
                net_payable = %summary.net_payable,
                "Discounts exceed bill total"
            );
        }

        info!(
            bill_id,
            user_id,
            category = %user.category,
            rate = %summary.discount_rate,
            total = %summary.total,
            net_payable = %summary.net_payable,
            "Net payable computed"
        );

        Ok(summary)
    }
}
