//! Prestation repository for the service catalog.

use chrono::Utc;
use facturo_shared::types::PrestationId;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::entities::{avoirs_lignes, devis_lignes, factures_lignes, prestations};

/// Error types for prestation operations.
#[derive(Debug, thiserror::Error)]
pub enum PrestationError {
    /// Prestation not found.
    #[error("Prestation not found: {0}")]
    NotFound(PrestationId),

    /// Label is blank.
    #[error("Label is required")]
    EmptyLabel,

    /// Unit is blank.
    #[error("Unit is required")]
    EmptyUnit,

    /// Unit price is negative.
    #[error("Unit price cannot be negative")]
    NegativePrice,

    /// Delete blocked by document lines.
    #[error("Cannot delete: the prestation is used on {0} document line(s)")]
    InUse(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Catalog item fields as entered in the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrestationInput {
    /// Label.
    pub label: String,
    /// Optional description.
    pub description: Option<String>,
    /// Unit price before tax.
    pub unit_price: Decimal,
    /// Unit of measure (session, hour, package...).
    pub unit: String,
    /// Optional category.
    pub category: Option<String>,
    /// Active flag.
    pub active: bool,
}

impl PrestationInput {
    fn validate(&self) -> Result<(), PrestationError> {
        if self.label.trim().is_empty() {
            return Err(PrestationError::EmptyLabel);
        }
        if self.unit.trim().is_empty() {
            return Err(PrestationError::EmptyUnit);
        }
        if self.unit_price < Decimal::ZERO {
            return Err(PrestationError::NegativePrice);
        }
        Ok(())
    }

    fn apply(&self, active: &mut prestations::ActiveModel) {
        let trimmed = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
        };
        active.label = Set(self.label.trim().to_string());
        active.description = Set(trimmed(&self.description));
        active.unit_price = Set(self.unit_price);
        active.unit = Set(self.unit.trim().to_string());
        active.category = Set(trimmed(&self.category));
        active.active = Set(self.active);
    }
}

/// Prestation repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct PrestationRepository {
    db: DatabaseConnection,
}

impl PrestationRepository {
    /// Creates a new prestation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists catalog items by category then label.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, active_only: bool) -> Result<Vec<prestations::Model>, DbErr> {
        let mut query = prestations::Entity::find();
        if active_only {
            query = query.filter(prestations::Column::Active.eq(true));
        }
        query
            .order_by_asc(prestations::Column::Category)
            .order_by_asc(prestations::Column::Label)
            .all(&self.db)
            .await
    }

    /// Finds a catalog item by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: PrestationId,
    ) -> Result<Option<prestations::Model>, DbErr> {
        prestations::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
    }

    /// Searches by case-insensitive substring over label and description,
    /// with an optional exact category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn search(
        &self,
        query: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<prestations::Model>, DbErr> {
        let mut select = prestations::Entity::find();
        if let Some(category) = category {
            select = select.filter(prestations::Column::Category.eq(category));
        }
        let rows = select
            .order_by_asc(prestations::Column::Label)
            .all(&self.db)
            .await?;

        let Some(needle) = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
        else {
            return Ok(rows);
        };

        Ok(rows
            .into_iter()
            .filter(|p| {
                p.label.to_lowercase().contains(&needle)
                    || p
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .collect())
    }

    /// Validates and inserts a catalog item.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the insert fails.
    pub async fn create(
        &self,
        input: &PrestationInput,
    ) -> Result<prestations::Model, PrestationError> {
        input.validate()?;

        let mut active = prestations::ActiveModel {
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        input.apply(&mut active);

        let prestation = active.insert(&self.db).await?;
        tracing::info!(prestation_id = prestation.id, "Prestation created");
        Ok(prestation)
    }

    /// Validates and replaces a catalog item's fields. Existing document
    /// lines keep their own label and price.
    ///
    /// # Errors
    ///
    /// Returns an error if the item does not exist, validation fails or the
    /// update fails.
    pub async fn update(
        &self,
        id: PrestationId,
        input: &PrestationInput,
    ) -> Result<prestations::Model, PrestationError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(PrestationError::NotFound(id))?;
        input.validate()?;

        let mut active: prestations::ActiveModel = existing.into();
        input.apply(&mut active);

        let prestation = active.update(&self.db).await?;
        tracing::info!(prestation_id = prestation.id, "Prestation updated");
        Ok(prestation)
    }

    /// Flips the active flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the item does not exist or the update fails.
    pub async fn toggle_active(
        &self,
        id: PrestationId,
    ) -> Result<prestations::Model, PrestationError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(PrestationError::NotFound(id))?;

        let flipped = !existing.active;
        let mut active: prestations::ActiveModel = existing.into();
        active.active = Set(flipped);
        Ok(active.update(&self.db).await?)
    }

    /// Deletes a catalog item no document line refers to.
    ///
    /// # Errors
    ///
    /// Returns `InUse` with the number of referencing lines.
    pub async fn delete(&self, id: PrestationId) -> Result<(), PrestationError> {
        let txn = self.db.begin().await?;
        let raw = id.into_inner();

        if prestations::Entity::find_by_id(raw).one(&txn).await?.is_none() {
            return Err(PrestationError::NotFound(id));
        }

        let used = devis_lignes::Entity::find()
            .filter(devis_lignes::Column::PrestationId.eq(raw))
            .count(&txn)
            .await?
            + factures_lignes::Entity::find()
                .filter(factures_lignes::Column::PrestationId.eq(raw))
                .count(&txn)
                .await?
            + avoirs_lignes::Entity::find()
                .filter(avoirs_lignes::Column::PrestationId.eq(raw))
                .count(&txn)
                .await?;
        if used > 0 {
            return Err(PrestationError::InUse(used));
        }

        prestations::Entity::delete_by_id(raw).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(prestation_id = %id, "Prestation deleted");
        Ok(())
    }
}
