//! Client repository against a migrated store.

mod common;

use common::{create_client, date, individual, invoice_input, setup_db};
use facturo_core::client::{ClientKind, ClientProfile};
use facturo_db::repositories::{
    ClientError, ClientFilter, ClientRepository, InvoiceRepository, QuoteInput, QuoteRepository,
    StatisticsRepository,
};
use facturo_shared::types::{ClientId, InvoiceId};
use rust_decimal_macros::dec;

fn organization() -> ClientProfile {
    ClientProfile {
        kind: ClientKind::Organization,
        legal_name: "FitnessPro Lyon".to_string(),
        tax_id: "123 456 789 01234".to_string(),
        address: "45 Boulevard Jean Jaurès".to_string(),
        postal_code: "69003".to_string(),
        city: "Lyon".to_string(),
        email: "contact@fitnesspro-lyon.fr".to_string(),
        ..ClientProfile::default()
    }
}

#[tokio::test]
async fn test_create_normalizes_and_validates() {
    let db = setup_db().await;
    let repo = ClientRepository::new(db.clone());

    let client = repo.create(&organization()).await.unwrap();
    assert_eq!(client.tax_id.as_deref(), Some("12345678901234"));
    assert_eq!(client.last_name, None);

    let invalid = ClientProfile {
        email: "not-an-email".to_string(),
        ..individual("Martin")
    };
    let err = repo.create(&invalid).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(ref e) if e.field == "email"));
    assert_eq!(repo.list(false).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_search_filters() {
    let db = setup_db().await;
    let repo = ClientRepository::new(db.clone());

    repo.create(&individual("Dupont")).await.unwrap();
    repo.create(&ClientProfile {
        email: "etienne@email.fr".to_string(),
        ..individual("Étienne")
    })
    .await
    .unwrap();
    let org = repo.create(&organization()).await.unwrap();
    repo.toggle_active(ClientId::new(org.id)).await.unwrap();

    let by_name = repo
        .search(&ClientFilter {
            query: Some("DUP".to_string()),
            ..ClientFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(by_name.len(), 1);

    let accented = repo
        .search(&ClientFilter {
            query: Some("étien".to_string()),
            ..ClientFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(accented.len(), 1);

    let by_tax_id = repo
        .search(&ClientFilter {
            query: Some("5678901".to_string()),
            ..ClientFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(by_tax_id.len(), 1);

    let inactive_orgs = repo
        .search(&ClientFilter {
            query: None,
            kind: Some(ClientKind::Organization),
            active: Some(false),
        })
        .await
        .unwrap();
    assert_eq!(inactive_orgs.len(), 1);

    let everyone = repo.search(&ClientFilter::default()).await.unwrap();
    assert_eq!(everyone.len(), 3);
    assert_eq!(repo.list(true).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_refused_with_exact_count() {
    let db = setup_db().await;
    let client = create_client(&db, "Dupont").await;
    let clients = ClientRepository::new(db.clone());
    let invoices = InvoiceRepository::new(db.clone());

    let invoice = invoices
        .create_draft(&invoice_input(client.id, date(2025, 1, 15), Vec::new()))
        .await
        .unwrap();

    let err = clients.delete(ClientId::new(client.id)).await.unwrap_err();
    assert!(matches!(err, ClientError::HasInvoices(1)));
    assert_eq!(err.to_string(), "Cannot delete: the client has 1 invoice(s)");

    invoices.delete(InvoiceId::new(invoice.id)).await.unwrap();
    clients.delete(ClientId::new(client.id)).await.unwrap();
    assert!(clients
        .find_by_id(ClientId::new(client.id))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_delete_reports_invoices_before_quotes() {
    let db = setup_db().await;
    let client = create_client(&db, "Dupont").await;
    let clients = ClientRepository::new(db.clone());

    QuoteRepository::new(db.clone())
        .create(&QuoteInput {
            client_id: ClientId::new(client.id),
            issue_date: date(2025, 1, 10),
            validity_date: date(2025, 4, 10),
            terms: None,
            lines: vec![common::line("Programme", dec!(1), dec!(300))],
        })
        .await
        .unwrap();

    let err = clients.delete(ClientId::new(client.id)).await.unwrap_err();
    assert!(matches!(err, ClientError::HasQuotes(1)));

    InvoiceRepository::new(db.clone())
        .create_draft(&invoice_input(client.id, date(2025, 1, 15), Vec::new()))
        .await
        .unwrap();
    let err = clients.delete(ClientId::new(client.id)).await.unwrap_err();
    assert!(matches!(err, ClientError::HasInvoices(1)));
    assert_eq!(
        clients.dependents(ClientId::new(client.id)).await.unwrap(),
        (1, 1)
    );
}

#[tokio::test]
async fn test_client_statistics() {
    let db = setup_db().await;
    let client = create_client(&db, "Dupont").await;
    let invoices = InvoiceRepository::new(db.clone());

    let mut paid_input = invoice_input(
        client.id,
        date(2025, 1, 15),
        vec![common::line("Séance", dec!(2), dec!(50))],
    );
    paid_input.due_date = date(2025, 1, 31);
    let paid = invoices.create_draft(&paid_input).await.unwrap();
    let paid_id = InvoiceId::new(paid.id);
    invoices.issue(paid_id).await.unwrap();
    invoices
        .record_payment(
            paid_id,
            &facturo_db::repositories::PaymentInput {
                payment_date: date(2025, 1, 20),
                amount: dec!(100),
                method: facturo_core::billing::PaymentMethod::Cash,
                reference: None,
                notes: None,
            },
        )
        .await
        .unwrap();

    let open = invoices
        .create_draft(&invoice_input(
            client.id,
            date(2025, 2, 1),
            vec![common::line("Séance", dec!(1), dec!(60))],
        ))
        .await
        .unwrap();
    invoices.issue(InvoiceId::new(open.id)).await.unwrap();

    let stats = StatisticsRepository::new(db.clone())
        .for_client(ClientId::new(client.id))
        .await
        .unwrap();
    assert_eq!(stats.invoice_count, 2);
    assert_eq!(stats.quote_count, 0);
    assert_eq!(stats.total_revenue, dec!(100));

    let yearly = StatisticsRepository::new(db.clone())
        .yearly_revenue(2025, dec!(77700))
        .await
        .unwrap();
    assert_eq!(yearly.revenue, dec!(100));
    assert_eq!(yearly.ceiling_ratio, dec!(0.13));
}
