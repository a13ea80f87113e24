//! # Billing Configuration
//!
//! Settings shared by the `seed` and `net-payable` binaries.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line flags (highest priority, applied by the binaries)     │
//! │     --db ./billing.db   --data ./data                                  │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     BILLING_DB_PATH=/var/lib/billing/billing.db                        │
//! │     BILLING_SEED_DIR=/srv/billing/seed                                 │
//! │     BILLING_LOG=debug                                                  │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/billing/billing.toml (Linux)                             │
//! │     ~/Library/Application Support/com.storefront.billing/billing.toml  │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "./billing.db"
//! max_connections = 5
//! connect_timeout_secs = 30
//! run_migrations = true
//!
//! [seed]
//! data_dir = "./data"
//! users_file = "users.json"
//! bills_file = "bills.json"
//!
//! [logging]
//! filter = "info,billing=debug,sqlx=warn"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};

/// Environment variable overriding `database.path`.
pub const ENV_DB_PATH: &str = "BILLING_DB_PATH";

/// Environment variable overriding `seed.data_dir`.
pub const ENV_SEED_DIR: &str = "BILLING_SEED_DIR";

/// Environment variable overriding `logging.filter`.
pub const ENV_LOG: &str = "BILLING_LOG";

// =============================================================================
// Database Settings
// =============================================================================

/// Where the SQLite database lives and how the pool is sized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite database file. Created on first use.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    /// Maximum pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Pool acquire timeout (seconds).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Apply embedded migrations on connect.
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./billing.db")
}

fn default_max_connections() -> u32 {
    5
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout(),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Seed Settings
// =============================================================================

/// Location of the JSON seed documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSettings {
    /// Directory holding the seed files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Users document, relative to `data_dir`.
    #[serde(default = "default_users_file")]
    pub users_file: String,

    /// Bills document, relative to `data_dir`.
    #[serde(default = "default_bills_file")]
    pub bills_file: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_users_file() -> String {
    "users.json".to_string()
}

fn default_bills_file() -> String {
    "bills.json".to_string()
}

impl Default for SeedSettings {
    fn default() -> Self {
        SeedSettings {
            data_dir: default_data_dir(),
            users_file: default_users_file(),
            bills_file: default_bills_file(),
        }
    }
}

impl SeedSettings {
    /// Full path of the users document.
    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(&self.users_file)
    }

    /// Full path of the bills document.
    pub fn bills_path(&self) -> PathBuf {
        self.data_dir.join(&self.bills_file)
    }
}

// =============================================================================
// Logging Settings
// =============================================================================

/// Tracing filter used when `RUST_LOG` is unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_filter")]
    pub filter: String,
}

/// Default tracing filter directive.
pub const DEFAULT_LOG_FILTER: &str = "info,billing=debug,sqlx=warn";

fn default_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_filter(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete billing configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub seed: SeedSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl BillingConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, or `billing.toml` in the platform config dir)
    /// 3. Environment variables
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading billing config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document. Missing sections and keys take defaults.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::invalid("database.path", "must not be empty"));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::invalid(
                "database.max_connections",
                "must be at least 1",
            ));
        }

        if self.seed.users_file.is_empty() {
            return Err(ConfigError::invalid("seed.users_file", "must not be empty"));
        }

        if self.seed.bills_file.is_empty() {
            return Err(ConfigError::invalid("seed.bills_file", "must not be empty"));
        }

        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::invalid("logging.filter", "must not be empty"));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(ENV_DB_PATH) {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(dir) = lookup(ENV_SEED_DIR) {
            debug!(dir = %dir, "Overriding seed directory from environment");
            self.seed.data_dir = PathBuf::from(dir);
        }

        if let Some(filter) = lookup(ENV_LOG) {
            self.logging.filter = filter;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "billing")
            .map(|dirs| dirs.config_dir().join("billing.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = BillingConfig::default();
        assert_eq!(config.database.path, PathBuf::from("./billing.db"));
        assert_eq!(config.database.max_connections, 5);
        assert!(config.database.run_migrations);
        assert_eq!(config.seed.users_path(), PathBuf::from("./data/users.json"));
        assert_eq!(config.seed.bills_path(), PathBuf::from("./data/bills.json"));
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BillingConfig::from_toml_str(
            r#"
            [database]
            path = "/var/lib/billing/billing.db"

            [seed]
            bills_file = "march.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.path, PathBuf::from("/var/lib/billing/billing.db"));
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.seed.users_file, "users.json");
        assert_eq!(config.seed.bills_file, "march.json");
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = BillingConfig::from_toml_str("[database\npath = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = BillingConfig::from_toml_str("[database]\nmax_connections = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_DB_PATH, "/tmp/other.db"),
            (ENV_SEED_DIR, "/tmp/seed"),
            (ENV_LOG, "warn"),
        ]
        .into_iter()
        .collect();

        let mut config = BillingConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.database.path, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.seed.users_path(), PathBuf::from("/tmp/seed/users.json"));
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_no_overrides_leaves_config_untouched() {
        let mut config = BillingConfig::default();
        config.apply_overrides(|_| None);
        assert_eq!(config, BillingConfig::default());
    }

    #[test]
    fn test_validation() {
        let mut config = BillingConfig::default();
        config.database.max_connections = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "database.max_connections"
        ));

        let mut config = BillingConfig::default();
        config.database.path = PathBuf::new();
        assert!(config.validate().is_err());

        let mut config = BillingConfig::default();
        config.logging.filter = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_explicit_file_uses_defaults() {
        let path = std::env::temp_dir().join("billing-config-that-does-not-exist.toml");
        let config = BillingConfig::load(Some(path)).unwrap();
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&BillingConfig::default()).unwrap();
        assert!(toml_str.contains("[database]"));
        assert!(toml_str.contains("[seed]"));
        assert!(toml_str.contains("[logging]"));
    }
}
