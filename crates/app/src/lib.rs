//! Record controllers for the invoicing back office.
//!
//! This crate provides:
//! - One controller per record kind (clients, catalog, quotes, invoices, settings)
//! - The dashboard figures
//! - [`Outcome`], the only shape mutations return to the presentation layer
//!
//! Controllers never return errors: repository failures are classified into
//! [`AppError`](facturo_shared::AppError), logged, and turned into a failed
//! outcome or an empty read.

pub mod controllers;
pub mod errors;
pub mod outcome;

pub use controllers::{
    ClientController, DashboardController, InvoiceController, PrestationController,
    QuoteController, SettingsController,
};
pub use outcome::Outcome;

use chrono::{Local, NaiveDate};
use facturo_db::repositories::DocumentNumbering;
use facturo_shared::AppConfig;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Session state shared by every controller.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Storage handle opened at startup.
    pub db: Arc<DatabaseConnection>,
    /// Configuration, read-only for the session.
    pub config: Arc<AppConfig>,
    fixed_today: Option<NaiveDate>,
}

impl AppState {
    /// Creates the state from an open storage handle and the loaded configuration.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
            fixed_today: None,
        }
    }

    /// Pins the date used for overdue and expiry derivation.
    #[must_use]
    pub const fn with_fixed_date(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    /// Today's date in local time, unless pinned.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.fixed_today
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Number formatting from the configuration.
    #[must_use]
    pub fn numbering(&self) -> DocumentNumbering {
        DocumentNumbering::new(self.config.numbering.min_digits)
    }

    /// Clone of the storage handle for a repository.
    #[must_use]
    pub fn connection(&self) -> DatabaseConnection {
        (*self.db).clone()
    }
}
