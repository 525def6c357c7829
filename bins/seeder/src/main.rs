//! Demo data seeder for Facturo development.
//!
//! Applies pending migrations, then inserts demo clients, catalog items and
//! settings into whichever of those tables are empty.
//!
//! Usage: cargo run --bin seeder

use facturo_db::migration::Migrator;
use facturo_shared::AppConfig;
use sea_orm_migration::MigratorTrait;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "facturo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(url = %config.database.url, "Connecting to database");
    let db = facturo_db::connect(&config.database).await?;
    Migrator::up(&db, None).await?;

    let report = facturo_db::seed::seed_demo(&db).await?;
    if report.is_empty() {
        info!("Store already populated, nothing to seed");
    } else {
        info!(
            clients = report.clients,
            prestations = report.prestations,
            settings = report.settings,
            "Seeding complete"
        );
    }

    Ok(())
}
