//! # Net Payable Lookup
//!
//! Prints the net payable amount of one bill as JSON.
//!
//! ## Usage
//! ```bash
//! cargo run -p billing-db --bin net-payable -- --bill-id 1 --user-id 1
//! # {"netPayableAmount":"610.00"}
//!
//! # Full breakdown (amounts in cents)
//! cargo run -p billing-db --bin net-payable -- --bill-id 1 --user-id 1 --summary
//! ```
//!
//! ## Exit Codes
//! - `0` - amount printed
//! - `1` - bill or user not found, or an id is invalid
//! - `2` - configuration or storage failure

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use billing_core::{BillId, PayableResponse, UserId};
use billing_db::config::BillingConfig;
use billing_db::logging::init_tracing;
use billing_db::{BillingService, Database, DbConfig, ServiceError};

/// Compute the net payable amount of a bill for its owner.
#[derive(Debug, Parser)]
#[command(name = "net-payable", about = "Compute the net payable amount of a bill", long_about = None)]
struct Args {
    /// Bill identifier
    #[arg(short, long)]
    bill_id: BillId,

    /// Identifier of the user who owns the bill
    #[arg(short, long)]
    user_id: UserId,

    /// Print the full discount breakdown instead of the amount only
    #[arg(short, long)]
    summary: bool,

    /// Config file (defaults to billing.toml in the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database file path (overrides config)
    #[arg(short, long)]
    db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(RunError::Lookup(err)) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
        Err(RunError::Other(err)) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

enum RunError {
    Lookup(ServiceError),
    Other(Box<dyn std::error::Error>),
}

impl<E: std::error::Error + 'static> From<E> for RunError {
    fn from(err: E) -> Self {
        RunError::Other(Box::new(err))
    }
}

async fn run(args: Args) -> Result<(), RunError> {
    let mut config = BillingConfig::load(args.config)?;
    if let Some(db) = args.db {
        config.database.path = db;
    }

    init_tracing(&config.logging.filter);

    let db = Database::new(DbConfig::from(&config.database)).await?;
    let service = BillingService::new(db.clone());

    let result = service.net_payable(args.bill_id, args.user_id).await;
    db.close().await;

    let summary = match result {
        Ok(summary) => summary,
        Err(err @ ServiceError::Core(_)) => return Err(RunError::Lookup(err)),
        Err(err) => return Err(err.into()),
    };

    let output = if args.summary {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&PayableResponse::from(summary))?
    };
    println!("{output}");

    Ok(())
}
