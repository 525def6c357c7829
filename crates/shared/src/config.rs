//! Application configuration management.
//!
//! Configuration is loaded once at startup and is read-only for the rest of
//! the session.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Invoicing defaults and legal mentions.
    #[serde(default)]
    pub billing: BillingConfig,
    /// Document numbering configuration.
    #[serde(default)]
    pub numbering: NumberingConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_database_url() -> String {
    "sqlite://facturation.db?mode=rwc".to_string()
}

// Single writer: SQLite serializes writes anyway.
fn default_max_connections() -> u32 {
    1
}

fn default_min_connections() -> u32 {
    1
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

/// Invoicing defaults (micro-entrepreneur regime).
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// VAT exemption mention printed on documents.
    #[serde(default = "default_vat_mention")]
    pub vat_mention: String,
    /// Default payment delay in days (0 = due on receipt).
    #[serde(default)]
    pub payment_terms_days: u32,
    /// Late penalty rate, as a multiple of the legal interest rate.
    #[serde(default = "default_late_penalty_multiplier")]
    pub late_penalty_multiplier: Decimal,
    /// Fixed recovery fee in euros.
    #[serde(default = "default_recovery_fee")]
    pub recovery_fee: Decimal,
    /// Yearly revenue ceiling in euros.
    #[serde(default = "default_revenue_ceiling")]
    pub revenue_ceiling: Decimal,
    /// Default quote validity in days.
    #[serde(default = "default_quote_validity_days")]
    pub quote_validity_days: u32,
}

fn default_vat_mention() -> String {
    "TVA non applicable, art. 293 B du CGI".to_string()
}

fn default_late_penalty_multiplier() -> Decimal {
    Decimal::from(3)
}

fn default_recovery_fee() -> Decimal {
    Decimal::from(40)
}

fn default_revenue_ceiling() -> Decimal {
    Decimal::from(77_700)
}

fn default_quote_validity_days() -> u32 {
    90 // 3 months
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            vat_mention: default_vat_mention(),
            payment_terms_days: 0,
            late_penalty_multiplier: default_late_penalty_multiplier(),
            recovery_fee: default_recovery_fee(),
            revenue_ceiling: default_revenue_ceiling(),
            quote_validity_days: default_quote_validity_days(),
        }
    }
}

/// Document numbering configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NumberingConfig {
    /// Zero-padding width of the sequence part (`FACT-2025-001`).
    #[serde(default = "default_min_digits")]
    pub min_digits: usize,
}

fn default_min_digits() -> usize {
    3
}

impl Default for NumberingConfig {
    fn default() -> Self {
        Self {
            min_digits: default_min_digits(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Fallback `EnvFilter` directive when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "facturo=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Every key has a default, so a bare environment yields a usable
    /// configuration pointing at `facturation.db` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if a present source cannot be parsed.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FACTURO").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Loads `.env` (if any) and then the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a present source cannot be parsed.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        Self::load()
    }
}
