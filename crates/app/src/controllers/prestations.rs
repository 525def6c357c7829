//! Catalog items.

use facturo_db::entities::prestations;
use facturo_db::repositories::{PrestationInput, PrestationRepository};
use facturo_shared::types::PrestationId;

use super::{read_or_default, respond};
use crate::{AppState, Outcome};

/// Catalog controller.
#[derive(Debug, Clone)]
pub struct PrestationController {
    prestations: PrestationRepository,
}

impl PrestationController {
    /// Creates the controller for the session.
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            prestations: PrestationRepository::new(state.connection()),
        }
    }

    /// Catalog items.
    pub async fn list(&self, active_only: bool) -> Vec<prestations::Model> {
        read_or_default(self.prestations.list(active_only).await, "list prestations")
    }

    /// One catalog item, if it exists.
    pub async fn get(&self, id: PrestationId) -> Option<prestations::Model> {
        read_or_default(self.prestations.find_by_id(id).await, "get prestation")
    }

    /// Search by text and optional category.
    pub async fn search(
        &self,
        query: Option<&str>,
        category: Option<&str>,
    ) -> Vec<prestations::Model> {
        read_or_default(
            self.prestations.search(query, category).await,
            "search prestations",
        )
    }

    /// Creates a catalog item.
    pub async fn create(&self, input: &PrestationInput) -> Outcome<prestations::Model> {
        respond(self.prestations.create(input).await, "create prestation", |_| {
            "Prestation created successfully".to_string()
        })
    }

    /// Updates a catalog item. Existing document lines are unaffected.
    pub async fn update(
        &self,
        id: PrestationId,
        input: &PrestationInput,
    ) -> Outcome<prestations::Model> {
        respond(
            self.prestations.update(id, input).await,
            "update prestation",
            |_| "Prestation updated successfully".to_string(),
        )
    }

    /// Activates or deactivates a catalog item.
    pub async fn toggle_active(&self, id: PrestationId) -> Outcome<prestations::Model> {
        respond(
            self.prestations.toggle_active(id).await,
            "toggle prestation",
            |p| {
                if p.active {
                    "Prestation activated".to_string()
                } else {
                    "Prestation deactivated".to_string()
                }
            },
        )
    }

    /// Deletes a catalog item no document line refers to.
    pub async fn delete(&self, id: PrestationId) -> Outcome<()> {
        respond(self.prestations.delete(id).await, "delete prestation", |_| {
            "Prestation deleted successfully".to_string()
        })
    }
}
