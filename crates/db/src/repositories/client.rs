//! Client repository for database operations.

use chrono::Utc;
use facturo_core::client::{ClientKind, ClientProfile, ClientValidationError};
use facturo_shared::types::ClientId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::entities::{
    clients, devis, factures, sea_orm_active_enums::ClientKind as DbClientKind,
};

/// Error types for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Client not found.
    #[error("Client not found: {0}")]
    NotFound(ClientId),

    /// Form validation failed.
    #[error(transparent)]
    Validation(#[from] ClientValidationError),

    /// Delete blocked by invoices.
    #[error("Cannot delete: the client has {0} invoice(s)")]
    HasInvoices(u64),

    /// Delete blocked by quotes.
    #[error("Cannot delete: the client has {0} quote(s)")]
    HasQuotes(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Search criteria. `None` means no constraint.
#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    /// Case-insensitive substring over names, email and tax id.
    pub query: Option<String>,
    /// Exact kind.
    pub kind: Option<ClientKind>,
    /// Exact active flag.
    pub active: Option<bool>,
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Rebuilds the form view of a stored client.
#[must_use]
pub fn profile_of(model: &clients::Model) -> ClientProfile {
    ClientProfile {
        kind: model.kind.into(),
        last_name: model.last_name.clone().unwrap_or_default(),
        first_name: model.first_name.clone().unwrap_or_default(),
        legal_name: model.legal_name.clone().unwrap_or_default(),
        tax_id: model.tax_id.clone().unwrap_or_default(),
        address: model.address.clone(),
        postal_code: model.postal_code.clone(),
        city: model.city.clone(),
        email: model.email.clone(),
        phone: model.phone.clone().unwrap_or_default(),
        notes: model.notes.clone().unwrap_or_default(),
        active: model.active,
    }
}

/// Name shown in lists and on documents.
#[must_use]
pub fn display_name_of(model: &clients::Model) -> String {
    profile_of(model).display_name()
}

fn matches_query(model: &clients::Model, needle: &str) -> bool {
    [
        model.last_name.as_deref(),
        model.first_name.as_deref(),
        model.legal_name.as_deref(),
        Some(model.email.as_str()),
        model.tax_id.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}

fn apply_profile(active: &mut clients::ActiveModel, profile: &ClientProfile) {
    active.kind = Set(profile.kind.into());
    active.last_name = Set(non_empty(&profile.last_name));
    active.first_name = Set(non_empty(&profile.first_name));
    active.legal_name = Set(non_empty(&profile.legal_name));
    active.tax_id = Set(non_empty(&profile.tax_id));
    active.address = Set(profile.address.clone());
    active.postal_code = Set(profile.postal_code.clone());
    active.city = Set(profile.city.clone());
    active.email = Set(profile.email.clone());
    active.phone = Set(non_empty(&profile.phone));
    active.notes = Set(non_empty(&profile.notes));
    active.active = Set(profile.active);
}

/// Client repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    db: DatabaseConnection,
}

impl ClientRepository {
    /// Creates a new client repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists clients ordered by last name then first name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, active_only: bool) -> Result<Vec<clients::Model>, DbErr> {
        let mut query = clients::Entity::find();
        if active_only {
            query = query.filter(clients::Column::Active.eq(true));
        }
        query
            .order_by_asc(clients::Column::LastName)
            .order_by_asc(clients::Column::FirstName)
            .all(&self.db)
            .await
    }

    /// Finds a client by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: ClientId) -> Result<Option<clients::Model>, DbErr> {
        clients::Entity::find_by_id(id.into_inner()).one(&self.db).await
    }

    /// Searches clients.
    ///
    /// Kind and active filters are applied in SQL; the text match is done
    /// here with Unicode lowercasing, which SQLite's `LIKE` lacks.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn search(&self, filter: &ClientFilter) -> Result<Vec<clients::Model>, DbErr> {
        let mut query = clients::Entity::find();
        if let Some(kind) = filter.kind {
            query = query.filter(clients::Column::Kind.eq(DbClientKind::from(kind)));
        }
        if let Some(active) = filter.active {
            query = query.filter(clients::Column::Active.eq(active));
        }

        let rows = query
            .order_by_asc(clients::Column::LastName)
            .order_by_asc(clients::Column::FirstName)
            .all(&self.db)
            .await?;

        let needle = filter
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        Ok(match needle {
            Some(needle) => rows
                .into_iter()
                .filter(|c| matches_query(c, &needle))
                .collect(),
            None => rows,
        })
    }

    /// Validates and inserts a client.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the insert fails.
    pub async fn create(&self, profile: &ClientProfile) -> Result<clients::Model, ClientError> {
        profile.validate()?;
        let profile = profile.normalized();
        let now = Utc::now();

        let mut active = clients::ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_profile(&mut active, &profile);

        let client = active.insert(&self.db).await?;
        tracing::info!(client_id = client.id, "Client created");
        Ok(client)
    }

    /// Validates and replaces a client's fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the client does not exist, validation fails or
    /// the update fails.
    pub async fn update(
        &self,
        id: ClientId,
        profile: &ClientProfile,
    ) -> Result<clients::Model, ClientError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(ClientError::NotFound(id))?;

        profile.validate()?;
        let profile = profile.normalized();

        let mut active: clients::ActiveModel = existing.into();
        apply_profile(&mut active, &profile);
        active.updated_at = Set(Utc::now());

        let client = active.update(&self.db).await?;
        tracing::info!(client_id = client.id, "Client updated");
        Ok(client)
    }

    /// Counts the invoices and quotes owned by a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn dependents(&self, id: ClientId) -> Result<(u64, u64), DbErr> {
        let invoices = factures::Entity::find()
            .filter(factures::Column::ClientId.eq(id.into_inner()))
            .count(&self.db)
            .await?;
        let quotes = devis::Entity::find()
            .filter(devis::Column::ClientId.eq(id.into_inner()))
            .count(&self.db)
            .await?;
        Ok((invoices, quotes))
    }

    /// Deletes a client that owns no invoice and no quote.
    ///
    /// Counts and delete run in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `HasInvoices` / `HasQuotes` with the exact count when
    /// dependents exist (invoices are reported first).
    pub async fn delete(&self, id: ClientId) -> Result<(), ClientError> {
        let txn = self.db.begin().await?;

        let exists = clients::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .is_some();
        if !exists {
            return Err(ClientError::NotFound(id));
        }

        let invoices = factures::Entity::find()
            .filter(factures::Column::ClientId.eq(id.into_inner()))
            .count(&txn)
            .await?;
        if invoices > 0 {
            return Err(ClientError::HasInvoices(invoices));
        }

        let quotes = devis::Entity::find()
            .filter(devis::Column::ClientId.eq(id.into_inner()))
            .count(&txn)
            .await?;
        if quotes > 0 {
            return Err(ClientError::HasQuotes(quotes));
        }

        clients::Entity::delete_by_id(id.into_inner())
            .exec(&txn)
            .await?;
        txn.commit().await?;

        tracing::info!(client_id = %id, "Client deleted");
        Ok(())
    }

    /// Flips the active flag and returns the updated client.
    ///
    /// # Errors
    ///
    /// Returns an error if the client does not exist or the update fails.
    pub async fn toggle_active(&self, id: ClientId) -> Result<clients::Model, ClientError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(ClientError::NotFound(id))?;

        let flipped = !existing.active;
        let mut active: clients::ActiveModel = existing.into();
        active.active = Set(flipped);
        active.updated_at = Set(Utc::now());

        let client = active.update(&self.db).await?;
        tracing::info!(client_id = client.id, active = client.active, "Client status toggled");
        Ok(client)
    }
}
