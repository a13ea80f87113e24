//! # Logging
//!
//! Tracing subscriber setup for the binaries.
//!
//! ## Log Levels
//! - `RUST_LOG=debug` - Show debug messages everywhere
//! - `RUST_LOG=billing_db=trace` - Trace the database layer only
//! - Otherwise: `logging.filter` from [`crate::config::LoggingSettings`]

use tracing_subscriber::EnvFilter;

/// Builds the filter: `RUST_LOG` when set and valid, else `fallback`.
///
/// An unparsable `fallback` degrades to `info`.
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initializes the global tracing subscriber.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(fallback: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(fallback))
        .with_target(true)
        .try_init();
}
