//! Document numbering against a migrated store.

mod common;

use chrono::Utc;
use common::{create_client, date, invoice_input, line, setup_db};
use facturo_core::billing::MAX_LINE_AMOUNT;
use facturo_core::numbering::{DocumentKind, NumberingError};
use facturo_db::entities::{
    factures, parametres,
    sea_orm_active_enums::{InvoiceStatus as DbInvoiceStatus, ValueType},
};
use facturo_db::repositories::{
    DocumentNumbering, InvoiceError, InvoiceRepository, NumberCollision, ParameterRepository,
    ParameterValue, QuoteInput, QuoteRepository,
};
use facturo_shared::types::{ClientId, InvoiceId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Set};

// Re-inserts every 2025 invoice number just before the real insert, so the
// insert always hits the unique index.
const SHADOW_INSERT_SQL: &str = r"
CREATE TRIGGER shadow_invoice_number BEFORE INSERT ON factures
WHEN NEW.number LIKE 'FACT-2025-%'
BEGIN
    INSERT INTO factures (number, client_id, issue_date, due_date)
    VALUES (NEW.number, NEW.client_id, NEW.issue_date, NEW.due_date);
END;
";

async fn insert_invoice_row(
    db: &DatabaseConnection,
    client_id: i32,
    number: &str,
    total: Decimal,
) -> Result<factures::Model, sea_orm::DbErr> {
    let now = Utc::now();
    factures::ActiveModel {
        number: Set(number.to_string()),
        client_id: Set(client_id),
        issue_date: Set(date(2025, 6, 1)),
        due_date: Set(date(2025, 6, 1)),
        status: Set(DbInvoiceStatus::Draft),
        total: Set(total),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

#[tokio::test]
async fn test_invoice_numbers_increase_within_year() {
    let db = setup_db().await;
    let client = create_client(&db, "Dupont").await;
    let repo = InvoiceRepository::new(db.clone());

    let mut numbers = Vec::new();
    for day in 1..=3 {
        let invoice = repo
            .create_draft(&invoice_input(client.id, date(2025, 1, day), Vec::new()))
            .await
            .unwrap();
        numbers.push(invoice.number);
    }

    assert_eq!(numbers, vec!["FACT-2025-001", "FACT-2025-002", "FACT-2025-003"]);
}

#[tokio::test]
async fn test_year_scoping_follows_issue_date() {
    let db = setup_db().await;
    let client = create_client(&db, "Dupont").await;
    let repo = InvoiceRepository::new(db.clone());

    repo.create_draft(&invoice_input(client.id, date(2025, 12, 30), Vec::new()))
        .await
        .unwrap();
    repo.create_draft(&invoice_input(client.id, date(2025, 12, 31), Vec::new()))
        .await
        .unwrap();
    let new_year = repo
        .create_draft(&invoice_input(client.id, date(2026, 1, 2), Vec::new()))
        .await
        .unwrap();

    assert_eq!(new_year.number, "FACT-2026-001");
}

#[tokio::test]
async fn test_deleted_highest_number_not_reused() {
    let db = setup_db().await;
    let client = create_client(&db, "Dupont").await;
    let repo = InvoiceRepository::new(db.clone());

    repo.create_draft(&invoice_input(client.id, date(2025, 2, 1), Vec::new()))
        .await
        .unwrap();
    let second = repo
        .create_draft(&invoice_input(client.id, date(2025, 2, 2), Vec::new()))
        .await
        .unwrap();
    assert_eq!(second.number, "FACT-2025-002");

    repo.delete(InvoiceId::new(second.id)).await.unwrap();

    let third = repo
        .create_draft(&invoice_input(client.id, date(2025, 2, 3), Vec::new()))
        .await
        .unwrap();
    assert_eq!(third.number, "FACT-2025-003");

    let mark = ParameterRepository::new(db.clone())
        .get("numbering.FACT.2025")
        .await
        .unwrap();
    assert_eq!(mark, Some(ParameterValue::Integer(3)));
}

#[tokio::test]
async fn test_kinds_have_independent_sequences() {
    let db = setup_db().await;
    let client = create_client(&db, "Dupont").await;

    let quote = QuoteRepository::new(db.clone())
        .create(&QuoteInput {
            client_id: ClientId::new(client.id),
            issue_date: date(2025, 1, 10),
            validity_date: date(2025, 4, 10),
            terms: None,
            lines: vec![line("Programme", dec!(1), dec!(300))],
        })
        .await
        .unwrap();
    let invoice = InvoiceRepository::new(db.clone())
        .create_draft(&invoice_input(client.id, date(2025, 1, 10), Vec::new()))
        .await
        .unwrap();

    assert_eq!(quote.quote.number, "DEV-2025-001");
    assert_eq!(invoice.number, "FACT-2025-001");
}

#[tokio::test]
async fn test_configured_width() {
    let db = setup_db().await;
    let client = create_client(&db, "Dupont").await;
    let repo = InvoiceRepository::new(db.clone()).with_numbering(DocumentNumbering::new(4));

    let invoice = repo
        .create_draft(&invoice_input(client.id, date(2025, 5, 1), Vec::new()))
        .await
        .unwrap();
    assert_eq!(invoice.number, "FACT-2025-0001");

    // the sequence is parsed back regardless of width
    let next = InvoiceRepository::new(db.clone())
        .create_draft(&invoice_input(client.id, date(2025, 5, 2), Vec::new()))
        .await
        .unwrap();
    assert_eq!(next.number, "FACT-2025-002");
}

#[tokio::test]
async fn test_concurrent_drafts_get_distinct_numbers() {
    let db = setup_db().await;
    let client = create_client(&db, "Dupont").await;
    let repo = InvoiceRepository::new(db.clone());

    let forms: Vec<_> = (1..=5)
        .map(|day| invoice_input(client.id, date(2025, 3, day), Vec::new()))
        .collect();
    let results = futures::future::join_all(forms.iter().map(|form| repo.create_draft(form))).await;

    let mut numbers: Vec<String> = results
        .into_iter()
        .map(|r| r.unwrap().number)
        .collect();
    numbers.sort();
    numbers.dedup();
    assert_eq!(numbers.len(), 5);
    assert_eq!(numbers.last().map(String::as_str), Some("FACT-2025-005"));
}

#[tokio::test]
async fn test_duplicate_number_is_a_collision() {
    let db = setup_db().await;
    let client = create_client(&db, "Dupont").await;

    insert_invoice_row(&db, client.id, "FACT-2025-001", dec!(10))
        .await
        .unwrap();
    let err = insert_invoice_row(&db, client.id, "FACT-2025-001", dec!(10))
        .await
        .unwrap_err();

    assert!(InvoiceError::from(err).is_number_collision());
    let locked = sea_orm::DbErr::Custom("locked".to_string());
    assert!(!InvoiceError::from(locked).is_number_collision());
}

#[tokio::test]
async fn test_repeated_collisions_exhaust_assignment() {
    let db = setup_db().await;
    let client = create_client(&db, "Dupont").await;
    let repo = InvoiceRepository::new(db.clone());
    db.execute_unprepared(SHADOW_INSERT_SQL).await.unwrap();

    let err = repo
        .create_draft(&invoice_input(client.id, date(2025, 7, 1), Vec::new()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InvoiceError::Numbering(NumberingError::Exhausted {
            kind: DocumentKind::Invoice,
            attempts: 2
        })
    ));
    assert!(factures::Entity::find().all(&db).await.unwrap().is_empty());

    // other years are unaffected, and nothing was reserved for 2025
    let other_year = repo
        .create_draft(&invoice_input(client.id, date(2026, 1, 5), Vec::new()))
        .await
        .unwrap();
    assert_eq!(other_year.number, "FACT-2026-001");

    db.execute_unprepared("DROP TRIGGER shadow_invoice_number;")
        .await
        .unwrap();
    let invoice = repo
        .create_draft(&invoice_input(client.id, date(2025, 7, 1), Vec::new()))
        .await
        .unwrap();
    assert_eq!(invoice.number, "FACT-2025-001");
}

#[tokio::test]
async fn test_unreadable_mark_blocks_assignment() {
    let db = setup_db().await;
    let client = create_client(&db, "Dupont").await;
    let repo = InvoiceRepository::new(db.clone());

    parametres::ActiveModel {
        key: Set("numbering.FACT.2025".to_string()),
        value: Set(Some("douze".to_string())),
        value_type: Set(ValueType::Integer),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let err = repo
        .create_draft(&invoice_input(client.id, date(2025, 8, 1), Vec::new()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InvoiceError::Numbering(NumberingError::UnreadableMark { ref key })
            if key == "numbering.FACT.2025"
    ));
    assert!(factures::Entity::find().all(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_amounts_keep_their_value_through_storage() {
    let db = setup_db().await;
    let client = create_client(&db, "Dupont").await;

    let amounts = [dec!(0.01), dec!(100.00), dec!(1234.56), dec!(0.1), MAX_LINE_AMOUNT];
    for (i, amount) in amounts.into_iter().enumerate() {
        let row = insert_invoice_row(&db, client.id, &format!("FACT-2025-{:03}", i + 1), amount)
            .await
            .unwrap();
        let stored = factures::Entity::find_by_id(row.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.total, amount);
    }
}
