//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//! - Demo data for a fresh store

pub mod entities;
pub mod migration;
pub mod repositories;
pub mod seed;

pub use repositories::{
    ClientRepository, InvoiceRepository, ParameterRepository, PrestationRepository,
    QuoteRepository, StatisticsRepository,
};

use facturo_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Opens the storage handle described by the configuration.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);

    tracing::debug!(url = %config.url, "Opening database");
    Database::connect(options).await
}
