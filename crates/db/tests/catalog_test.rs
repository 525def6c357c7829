//! Catalog items and settings against a migrated store.

mod common;

use common::{create_client, date, invoice_input, setup_db};
use facturo_core::billing::LineInput;
use facturo_db::repositories::{
    InvoiceRepository, ParameterError, ParameterRepository, ParameterValue, PrestationError,
    PrestationInput, PrestationRepository,
};
use facturo_shared::types::{InvoiceId, PrestationId};
use rust_decimal_macros::dec;

fn session() -> PrestationInput {
    PrestationInput {
        label: "Séance individuelle".to_string(),
        description: Some("Coaching personnalisé d'une heure".to_string()),
        unit_price: dec!(50),
        unit: "séance".to_string(),
        category: Some("Coaching".to_string()),
        active: true,
    }
}

#[tokio::test]
async fn test_prestation_validation() {
    let db = setup_db().await;
    let repo = PrestationRepository::new(db.clone());

    let negative = PrestationInput {
        unit_price: dec!(-1),
        ..session()
    };
    assert!(matches!(
        repo.create(&negative).await,
        Err(PrestationError::NegativePrice)
    ));

    let unlabelled = PrestationInput {
        label: "  ".to_string(),
        ..session()
    };
    assert!(matches!(
        repo.create(&unlabelled).await,
        Err(PrestationError::EmptyLabel)
    ));

    let free = PrestationInput {
        unit_price: dec!(0),
        ..session()
    };
    assert!(repo.create(&free).await.is_ok());
}

#[tokio::test]
async fn test_prestation_search_and_toggle() {
    let db = setup_db().await;
    let repo = PrestationRepository::new(db.clone());

    let item = repo.create(&session()).await.unwrap();
    repo.create(&PrestationInput {
        label: "Atelier collectif".to_string(),
        description: None,
        category: Some("Groupe".to_string()),
        ..session()
    })
    .await
    .unwrap();

    assert_eq!(repo.search(Some("PERSONNALISÉ"), None).await.unwrap().len(), 1);
    assert_eq!(repo.search(None, Some("Groupe")).await.unwrap().len(), 1);
    assert_eq!(repo.search(Some("  "), None).await.unwrap().len(), 2);

    repo.toggle_active(PrestationId::new(item.id)).await.unwrap();
    assert_eq!(repo.list(true).await.unwrap().len(), 1);
    assert_eq!(repo.list(false).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_prestation_in_use_cannot_be_deleted() {
    let db = setup_db().await;
    let repo = PrestationRepository::new(db.clone());
    let item = repo.create(&session()).await.unwrap();
    let client = create_client(&db, "Dupont").await;

    let invoices = InvoiceRepository::new(db.clone());
    let invoice = invoices
        .create_draft(&invoice_input(
            client.id,
            date(2025, 1, 15),
            vec![LineInput {
                prestation_id: Some(PrestationId::new(item.id)),
                ..LineInput::new("Séance individuelle", dec!(2), item.unit_price)
            }],
        ))
        .await
        .unwrap();

    let err = repo.delete(PrestationId::new(item.id)).await.unwrap_err();
    assert!(matches!(err, PrestationError::InUse(1)));

    // lines keep their frozen copy when the catalog changes
    repo.update(
        PrestationId::new(item.id),
        &PrestationInput {
            unit_price: dec!(65),
            ..session()
        },
    )
    .await
    .unwrap();
    let details = invoices
        .get(InvoiceId::new(invoice.id), date(2025, 1, 15))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(details.lines[0].unit_price, dec!(50));

    invoices.delete(InvoiceId::new(invoice.id)).await.unwrap();
    repo.delete(PrestationId::new(item.id)).await.unwrap();
}

#[tokio::test]
async fn test_typed_settings() {
    let db = setup_db().await;
    let repo = ParameterRepository::new(db.clone());

    repo.set("company.name", &ParameterValue::Text("Coach Sport".to_string()))
        .await
        .unwrap();
    repo.set("billing.payment_terms_days", &ParameterValue::Integer(30))
        .await
        .unwrap();
    repo.set("billing.recovery_fee", &ParameterValue::Decimal(dec!(40.00)))
        .await
        .unwrap();
    repo.set("invoice.show_logo", &ParameterValue::Boolean(true))
        .await
        .unwrap();

    assert_eq!(
        repo.get("billing.payment_terms_days").await.unwrap(),
        Some(ParameterValue::Integer(30))
    );
    assert_eq!(
        repo.get("billing.recovery_fee").await.unwrap(),
        Some(ParameterValue::Decimal(dec!(40)))
    );
    assert_eq!(
        repo.get("invoice.show_logo").await.unwrap(),
        Some(ParameterValue::Boolean(true))
    );
    assert_eq!(repo.get("missing").await.unwrap(), None);

    // overwriting changes the declared type with the value
    repo.set("billing.payment_terms_days", &ParameterValue::Text("30 jours".to_string()))
        .await
        .unwrap();
    assert_eq!(
        repo.get("billing.payment_terms_days").await.unwrap(),
        Some(ParameterValue::Text("30 jours".to_string()))
    );
    assert_eq!(repo.list().await.unwrap().len(), 4);

    assert!(matches!(
        repo.set(" ", &ParameterValue::Integer(1)).await,
        Err(ParameterError::EmptyKey)
    ));
    assert!(repo.delete("invoice.show_logo").await.unwrap());
    assert!(!repo.delete("invoice.show_logo").await.unwrap());
}

#[tokio::test]
async fn test_numbering_marks_are_reserved() {
    let db = setup_db().await;
    let client = create_client(&db, "Dupont").await;
    InvoiceRepository::new(db.clone())
        .create_draft(&invoice_input(client.id, date(2025, 4, 1), Vec::new()))
        .await
        .unwrap();
    let repo = ParameterRepository::new(db.clone());
    repo.set("company.name", &ParameterValue::Text("Coach Sport".to_string()))
        .await
        .unwrap();

    assert!(matches!(
        repo.set("numbering.FACT.2025", &ParameterValue::Integer(0)).await,
        Err(ParameterError::ReservedKey(key)) if key == "numbering.FACT.2025"
    ));
    assert!(matches!(
        repo.delete(" numbering.FACT.2025").await,
        Err(ParameterError::ReservedKey(_))
    ));

    let keys: Vec<String> = repo.list().await.unwrap().into_iter().map(|p| p.key).collect();
    assert_eq!(keys, vec!["company.name"]);
    assert_eq!(
        repo.get("numbering.FACT.2025").await.unwrap(),
        Some(ParameterValue::Integer(1))
    );
}
