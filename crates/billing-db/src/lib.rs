//! # billing-db: Database Layer for Storefront Billing
//!
//! This crate stores users and bills in SQLite (via sqlx) and feeds them to
//! the pure calculator in billing-core.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Storefront Billing Data Flow                        │
//! │                                                                         │
//! │  net-payable --bill-id 1 --user-id 1          seed --data ./data       │
//! │       │                                            │                    │
//! │       ▼                                            ▼                    │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   billing-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ BillingService│    │  Repositories │    │   SeedData   │  │   │
//! │  │   │ (service.rs)  │───►│ UserRepository│◄───│  (seed.rs)   │  │   │
//! │  │   │               │    │ BillRepository│    │              │  │   │
//! │  │   └───────┬───────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │           │                    │                               │   │
//! │  │           │            ┌───────▼───────┐    ┌──────────────┐  │   │
//! │  │           │            │   Database    │    │  Migrations  │  │   │
//! │  │           │            │   (pool.rs)   │───►│  (embedded)  │  │   │
//! │  │           │            └───────────────┘    └──────────────┘  │   │
//! │  └───────────┼─────────────────────────────────────────────────────┘   │
//! │              ▼                                                          │
//! │  billing_core::summarize → BillSummary → PayableResponse               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - User and bill repositories
//! - [`service`] - Net payable computation over stored data
//! - [`seed`] - JSON seed loading and bulk replace
//! - [`config`] - TOML + environment configuration
//! - [`logging`] - Tracing subscriber setup
//! - [`error`] - Error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use billing_db::{BillingService, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./billing.db")).await?;
//! let service = BillingService::new(db);
//!
//! let summary = service.net_payable(1, 1).await?;
//! println!("{}", summary.net_payable);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod logging;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::BillingConfig;
pub use error::{ConfigError, DbError, DbResult, SeedError, ServiceError, ServiceResult};
pub use pool::{Database, DbConfig};
pub use seed::{seed_database, SeedData, SeedReport};
pub use service::BillingService;

// Repository re-exports for convenience
pub use repository::bill::BillRepository;
pub use repository::user::UserRepository;
