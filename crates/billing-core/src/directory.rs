//! # Bill Directory
//!
//! The two lookups the engine consumes, and an in-memory implementation.
//!
//! ```text
//! calculate_net_payable(directory, bill_id, user_id, now)
//!      │
//!      ├── directory.fetch_bill_owned_by_user(bill_id, user_id)
//!      └── directory.fetch_user(bill.user_id)
//! ```
//!
//! Lookups are synchronous and return `None` for not-found. Any blocking
//! happens inside the implementation, never in the engine.

use std::collections::HashMap;

use crate::types::{Bill, BillId, User, UserId};

/// Read-only source of bills and users.
pub trait BillDirectory {
    /// Returns the bill with `bill_id` if it is owned by `user_id`.
    fn fetch_bill_owned_by_user(&self, bill_id: BillId, user_id: UserId) -> Option<Bill>;

    /// Returns the user with `user_id`.
    fn fetch_user(&self, user_id: UserId) -> Option<User>;
}

impl<D: BillDirectory + ?Sized> BillDirectory for &D {
    fn fetch_bill_owned_by_user(&self, bill_id: BillId, user_id: UserId) -> Option<Bill> {
        (**self).fetch_bill_owned_by_user(bill_id, user_id)
    }

    fn fetch_user(&self, user_id: UserId) -> Option<User> {
        (**self).fetch_user(user_id)
    }
}

/// A [`BillDirectory`] backed by hash maps.
///
/// ## Usage
/// ```rust
/// use billing_core::directory::{BillDirectory, InMemoryDirectory};
/// use billing_core::types::{Bill, User, UserCategory};
/// use chrono::Utc;
///
/// let mut directory = InMemoryDirectory::new();
/// directory.insert_user(User {
///     id: 1,
///     username: "ada".to_string(),
///     category: UserCategory::Customer,
///     created_at: Utc::now(),
/// });
/// directory.insert_bill(Bill::new(10, 1, vec![]));
///
/// assert!(directory.fetch_bill_owned_by_user(10, 1).is_some());
/// assert!(directory.fetch_bill_owned_by_user(10, 2).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    users: HashMap<UserId, User>,
    bills: HashMap<BillId, Bill>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory from users and bills. Later duplicates replace
    /// earlier ones.
    pub fn from_records(
        users: impl IntoIterator<Item = User>,
        bills: impl IntoIterator<Item = Bill>,
    ) -> Self {
        let mut directory = Self::new();
        for user in users {
            directory.insert_user(user);
        }
        for bill in bills {
            directory.insert_bill(bill);
        }
        directory
    }

    /// Inserts or replaces a user.
    pub fn insert_user(&mut self, user: User) -> Option<User> {
        self.users.insert(user.id, user)
    }

    /// Inserts or replaces a bill.
    pub fn insert_bill(&mut self, bill: Bill) -> Option<Bill> {
        self.bills.insert(bill.id, bill)
    }

    /// Number of users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Number of bills.
    pub fn bill_count(&self) -> usize {
        self.bills.len()
    }
}

impl BillDirectory for InMemoryDirectory {
    fn fetch_bill_owned_by_user(&self, bill_id: BillId, user_id: UserId) -> Option<Bill> {
        self.bills
            .get(&bill_id)
            .filter(|bill| bill.user_id == user_id)
            .cloned()
    }

    fn fetch_user(&self, user_id: UserId) -> Option<User> {
        self.users.get(&user_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserCategory;
    use chrono::Utc;

    fn user(id: UserId) -> User {
        User {
            id,
            username: format!("user{id}"),
            category: UserCategory::Customer,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_bill_lookup_is_scoped_to_owner() {
        let directory =
            InMemoryDirectory::from_records([user(1), user(2)], [Bill::new(5, 1, vec![])]);

        assert_eq!(directory.fetch_bill_owned_by_user(5, 1).map(|b| b.id), Some(5));
        assert!(directory.fetch_bill_owned_by_user(5, 2).is_none());
        assert!(directory.fetch_bill_owned_by_user(6, 1).is_none());
    }

    #[test]
    fn test_user_lookup() {
        let directory = InMemoryDirectory::from_records([user(1)], Vec::<Bill>::new());
        assert_eq!(directory.fetch_user(1).map(|u| u.id), Some(1));
        assert!(directory.fetch_user(9).is_none());
        assert_eq!(directory.user_count(), 1);
        assert_eq!(directory.bill_count(), 0);
    }

    #[test]
    fn test_insert_replaces() {
        let mut directory = InMemoryDirectory::new();
        assert!(directory.insert_user(user(1)).is_none());
        assert!(directory.insert_user(user(1)).is_some());
        assert_eq!(directory.user_count(), 1);
    }
}
