//! # Repository Module
//!
//! Database repository implementations for Storefront Billing.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  BillingService                                                        │
//! │       │                                                                 │
//! │       │  db.bills().find_by_id_and_user_id(7, 3)                       │
//! │       │  db.users().find_by_id(3)                                      │
//! │       ▼                                                                 │
//! │  BillRepository                     UserRepository                     │
//! │  ├── find_by_id_and_user_id         ├── find_by_id                     │
//! │  ├── insert                         ├── insert                         │
//! │  └── count                          └── count                          │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Seeding writes through the crate-internal connection-level helpers
//! (`insert_user`, `insert_bill`, `delete_all_*`) so a whole reload runs in
//! one transaction.
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - User lookup and insert
//! - [`BillRepository`](bill::BillRepository) - Owner-scoped bill lookup with items

pub mod bill;
pub mod user;
