//! Shared fixtures for repository tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use facturo_core::billing::LineInput;
use facturo_core::client::{ClientKind, ClientProfile};
use facturo_db::entities::clients;
use facturo_db::migration::Migrator;
use facturo_db::repositories::{ClientRepository, InvoiceInput};
use facturo_shared::types::ClientId;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

/// Fresh in-memory store with the schema applied.
///
/// One pooled connection: every in-memory connection would otherwise see
/// its own empty database.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("in-memory database should open");
    Migrator::up(&db, None)
        .await
        .expect("migrations should apply");
    db
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn individual(last_name: &str) -> ClientProfile {
    ClientProfile {
        kind: ClientKind::Individual,
        last_name: last_name.to_string(),
        first_name: "Marie".to_string(),
        address: "15 Rue de la République".to_string(),
        postal_code: "75001".to_string(),
        city: "Paris".to_string(),
        email: "marie.dupont@email.fr".to_string(),
        phone: "0612345678".to_string(),
        ..ClientProfile::default()
    }
}

pub async fn create_client(db: &DatabaseConnection, last_name: &str) -> clients::Model {
    ClientRepository::new(db.clone())
        .create(&individual(last_name))
        .await
        .expect("client should be created")
}

/// One line of `quantity` x `unit_price`.
pub fn line(label: &str, quantity: Decimal, unit_price: Decimal) -> LineInput {
    LineInput::new(label, quantity, unit_price)
}

/// Draft invoice form issued and due on `issue_date`.
pub fn invoice_input(client_id: i32, issue_date: NaiveDate, lines: Vec<LineInput>) -> InvoiceInput {
    InvoiceInput {
        client_id: ClientId::new(client_id),
        issue_date,
        due_date: issue_date,
        period_start: None,
        period_end: None,
        payment_method: None,
        payment_terms: None,
        notes: None,
        lines,
    }
}
