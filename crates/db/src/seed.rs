//! Demo data for a fresh store: a handful of clients, the coaching catalog
//! and the billing terms.
//!
//! Clients and catalog items are only inserted when their table is empty,
//! settings only when their key is missing, so seeding twice is harmless.

use facturo_core::client::{ClientKind, ClientProfile};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait};
use thiserror::Error;

use crate::entities::{clients, prestations};
use crate::repositories::{
    ClientError, ClientRepository, PAYMENT_TERMS_DAYS, ParameterError, ParameterRepository,
    ParameterValue, PrestationError, PrestationInput, PrestationRepository, QUOTE_VALIDITY_DAYS,
};

/// Error raised while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// A demo client was rejected.
    #[error("Client seed failed: {0}")]
    Client(#[from] ClientError),
    /// A demo catalog item was rejected.
    #[error("Prestation seed failed: {0}")]
    Prestation(#[from] PrestationError),
    /// A demo setting was rejected.
    #[error("Setting seed failed: {0}")]
    Parameter(#[from] ParameterError),
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Rows inserted per group. Zero means the group already had data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Clients inserted.
    pub clients: usize,
    /// Catalog items inserted.
    pub prestations: usize,
    /// Settings inserted.
    pub settings: usize,
}

impl SeedReport {
    /// True when nothing was inserted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.clients == 0 && self.prestations == 0 && self.settings == 0
    }
}

// kind, last/legal name, first name, siret, address, postal code, city, email, phone, notes, active
type ClientRow = (
    ClientKind,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    bool,
);

const CLIENTS: &[ClientRow] = &[
    (
        ClientKind::Individual,
        "Dupont",
        "Marie",
        "",
        "15 Rue de la République",
        "75001",
        "Paris",
        "marie.dupont@email.fr",
        "0612345678",
        "Prefers morning sessions",
        true,
    ),
    (
        ClientKind::Individual,
        "Martin",
        "Pierre",
        "",
        "28 Avenue des Champs",
        "69001",
        "Lyon",
        "pierre.martin@gmail.com",
        "0623456789",
        "Goal: weight loss",
        true,
    ),
    (
        ClientKind::Organization,
        "FitnessPro Lyon",
        "",
        "12345678901234",
        "45 Boulevard Jean Jaurès",
        "69003",
        "Lyon",
        "contact@fitnesspro-lyon.fr",
        "0478123456",
        "Partner gym, group classes",
        true,
    ),
    (
        ClientKind::Individual,
        "Bernard",
        "Sophie",
        "",
        "12 Rue Victor Hugo",
        "33000",
        "Bordeaux",
        "sophie.bernard@outlook.fr",
        "0634567890",
        "Nutrition and training",
        true,
    ),
    (
        ClientKind::Organization,
        "Wellness Center Paris",
        "",
        "98765432109876",
        "78 Rue de Rivoli",
        "75004",
        "Paris",
        "admin@wellness-paris.com",
        "0142567890",
        "Yearly contract",
        true,
    ),
    (
        ClientKind::Individual,
        "Petit",
        "Jean",
        "",
        "5 Place du Marché",
        "31000",
        "Toulouse",
        "jean.petit@wanadoo.fr",
        "0645678901",
        "Marathon preparation",
        true,
    ),
    (
        ClientKind::Individual,
        "Dubois",
        "Isabelle",
        "",
        "33 Rue Nationale",
        "59000",
        "Lille",
        "isabelle.dubois@free.fr",
        "0656789012",
        "Home sessions only",
        false,
    ),
];

// label, description, unit price, unit, category
const PRESTATIONS: &[(&str, &str, i64, &str, &str)] = &[
    (
        "Séance coaching individuel",
        "Personal coaching session (1h)",
        50,
        "séance",
        "Coaching individuel",
    ),
    (
        "Forfait 10 séances",
        "Ten personal coaching sessions",
        450,
        "forfait",
        "Coaching individuel",
    ),
    (
        "Cours collectif",
        "Group fitness class (1h)",
        20,
        "séance",
        "Cours collectif",
    ),
    (
        "Bilan nutritionnel",
        "Consultation and personal nutrition plan",
        80,
        "consultation",
        "Suivi nutritionnel",
    ),
    (
        "Suivi nutritionnel mensuel",
        "Monthly follow-up with plan adjustments",
        60,
        "mois",
        "Suivi nutritionnel",
    ),
    (
        "Préparation physique",
        "Competition or marathon conditioning",
        70,
        "séance",
        "Préparation physique",
    ),
    (
        "Coaching à domicile",
        "Session at the client's home, travel included",
        65,
        "séance",
        "Coaching individuel",
    ),
];

// Stored terms take precedence over the configured ones.
const SETTINGS: &[(&str, i64)] = &[(PAYMENT_TERMS_DAYS, 15), (QUOTE_VALIDITY_DAYS, 30)];

fn profile(row: &ClientRow) -> ClientProfile {
    let (kind, name, first_name, tax_id, address, postal_code, city, email, phone, notes, active) =
        *row;
    let (last_name, legal_name) = match kind {
        ClientKind::Individual => (name, ""),
        ClientKind::Organization => ("", name),
    };
    ClientProfile {
        kind,
        last_name: last_name.to_string(),
        first_name: first_name.to_string(),
        legal_name: legal_name.to_string(),
        tax_id: tax_id.to_string(),
        address: address.to_string(),
        postal_code: postal_code.to_string(),
        city: city.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        notes: notes.to_string(),
        active,
    }
}

/// Inserts the demo data into every empty group.
///
/// # Errors
///
/// Returns an error if a count or an insert fails.
pub async fn seed_demo(db: &DatabaseConnection) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    if clients::Entity::find().count(db).await? == 0 {
        let repo = ClientRepository::new(db.clone());
        for row in CLIENTS {
            repo.create(&profile(row)).await?;
        }
        report.clients = CLIENTS.len();
    } else {
        tracing::info!("Clients already present, skipping");
    }

    if prestations::Entity::find().count(db).await? == 0 {
        let repo = PrestationRepository::new(db.clone());
        for &(label, description, price, unit, category) in PRESTATIONS {
            repo.create(&PrestationInput {
                label: label.to_string(),
                description: Some(description.to_string()),
                unit_price: Decimal::from(price),
                unit: unit.to_string(),
                category: Some(category.to_string()),
                active: true,
            })
            .await?;
        }
        report.prestations = PRESTATIONS.len();
    } else {
        tracing::info!("Catalog already present, skipping");
    }

    let repo = ParameterRepository::new(db.clone());
    for &(key, days) in SETTINGS {
        if repo.find(key).await?.is_some() {
            tracing::info!(key, "Setting already present, skipping");
            continue;
        }
        repo.set(key, &ParameterValue::Integer(days)).await?;
        report.settings += 1;
    }

    tracing::info!(
        clients = report.clients,
        prestations = report.prestations,
        settings = report.settings,
        "Demo data seeded"
    );
    Ok(report)
}
