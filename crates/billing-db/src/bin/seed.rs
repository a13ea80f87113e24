//! # Seed Loader
//!
//! Replaces the stored users and bills with the JSON seed documents.
//!
//! ## Usage
//! ```bash
//! # Load ./data/users.json and ./data/bills.json into ./billing.db
//! cargo run -p billing-db --bin seed
//!
//! # Custom locations
//! cargo run -p billing-db --bin seed -- --db ./data/dev.db --data ./fixtures
//!
//! # Explicit config file
//! cargo run -p billing-db --bin seed -- --config ./billing.toml
//! ```

use clap::Parser;
use std::path::PathBuf;

use billing_db::config::BillingConfig;
use billing_db::logging::init_tracing;
use billing_db::{seed_database, Database, DbConfig, SeedData};

/// Load users and bills from JSON into the billing database.
#[derive(Debug, Parser)]
#[command(name = "seed", about = "Load users and bills from JSON seed files", long_about = None)]
struct Args {
    /// Config file (defaults to billing.toml in the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database file path (overrides config)
    #[arg(short, long)]
    db: Option<PathBuf>,

    /// Directory holding users.json and bills.json (overrides config)
    #[arg(long)]
    data: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = BillingConfig::load(args.config)?;
    if let Some(db) = args.db {
        config.database.path = db;
    }
    if let Some(data) = args.data {
        config.seed.data_dir = data;
    }

    init_tracing(&config.logging.filter);

    println!("Storefront Billing Seed Loader");
    println!("==============================");
    println!("Database: {}", config.database.path.display());
    println!("Users:    {}", config.seed.users_path().display());
    println!("Bills:    {}", config.seed.bills_path().display());
    println!();

    let data = SeedData::from_settings(&config.seed)?;
    println!(
        "✓ Parsed {} users and {} bills",
        data.users.len(),
        data.bills.len()
    );

    let db = Database::new(DbConfig::from(&config.database)).await?;
    println!("✓ Connected to database");

    let report = seed_database(&db, &data).await?;
    println!(
        "✓ Stored {} users, {} bills, {} items",
        report.users, report.bills, report.items
    );

    db.close().await;
    Ok(())
}
