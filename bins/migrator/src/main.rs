//! Schema migration runner for the Facturo database.
//!
//! Usage:
//!   migrator up      - Apply pending migrations
//!   migrator down    - Roll back the last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop every table and migrate again
//!
//! The target is read from `DATABASE_URL`, e.g. `sqlite://facturation.db?mode=rwc`.

use facturo_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    cli::run_cli(Migrator).await;
}
