//! Facturo entry point.
//!
//! Loads the configuration, opens and migrates the store, optionally seeds
//! demo data, then builds the controllers the presentation layer drives.

use facturo_app::{
    AppState, ClientController, DashboardController, InvoiceController, PrestationController,
    QuoteController, SettingsController,
};
use facturo_db::migration::Migrator;
use facturo_shared::AppConfig;
use sea_orm_migration::MigratorTrait;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Controllers handed to the presentation layer.
// Driven by the presentation layer.
#[allow(dead_code)]
struct Controllers {
    clients: ClientController,
    prestations: PrestationController,
    quotes: QuoteController,
    invoices: InvoiceController,
    settings: SettingsController,
    dashboard: DashboardController,
}

impl Controllers {
    fn new(state: &AppState) -> Self {
        Self {
            clients: ClientController::new(state),
            prestations: PrestationController::new(state),
            quotes: QuoteController::new(state),
            invoices: InvoiceController::new(state),
            settings: SettingsController::new(state),
            dashboard: DashboardController::new(state),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Also loads .env
    let config = AppConfig::from_env()?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.filter.as_str().into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = facturo_db::connect(&config.database).await?;
    info!(url = %config.database.url, "Connected to database");

    Migrator::up(&db, None).await?;
    info!("Migrations applied");

    if std::env::args().any(|arg| arg == "--seed") {
        let report = facturo_db::seed::seed_demo(&db).await?;
        info!(
            clients = report.clients,
            prestations = report.prestations,
            "Demo data checked"
        );
    }

    let state = AppState::new(db, config);
    let controllers = Controllers::new(&state);

    let summary = controllers.dashboard.summary().await;
    info!(
        invoices = summary.statistics.invoice_count,
        quotes = summary.statistics.quote_count,
        revenue = %summary.current_year.revenue,
        ceiling_ratio = %summary.current_year.ceiling_ratio,
        today = %state.today(),
        "Facturo ready"
    );

    Ok(())
}
