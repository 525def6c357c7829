//! Client records.

use facturo_core::client::{ClientKind, ClientProfile};
use facturo_db::entities::clients;
use facturo_db::repositories::{ClientFilter, ClientRepository, Statistics, StatisticsRepository};
use facturo_shared::types::ClientId;

use super::{read_or_default, respond};
use crate::{AppState, Outcome};

/// Client controller.
#[derive(Debug, Clone)]
pub struct ClientController {
    clients: ClientRepository,
    statistics: StatisticsRepository,
}

impl ClientController {
    /// Creates the controller for the session.
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            clients: ClientRepository::new(state.connection()),
            statistics: StatisticsRepository::new(state.connection()),
        }
    }

    /// Clients ordered by last name then first name.
    pub async fn list(&self, active_only: bool) -> Vec<clients::Model> {
        read_or_default(self.clients.list(active_only).await, "list clients")
    }

    /// One client, if it exists.
    pub async fn get(&self, id: ClientId) -> Option<clients::Model> {
        read_or_default(self.clients.find_by_id(id).await, "get client")
    }

    /// Case-insensitive search over names, email and tax id, with optional
    /// exact kind and active filters.
    pub async fn search(
        &self,
        query: Option<&str>,
        kind: Option<ClientKind>,
        active: Option<bool>,
    ) -> Vec<clients::Model> {
        let filter = ClientFilter {
            query: query.map(ToString::to_string),
            kind,
            active,
        };
        read_or_default(self.clients.search(&filter).await, "search clients")
    }

    /// Validates and creates a client.
    pub async fn create(&self, profile: &ClientProfile) -> Outcome<clients::Model> {
        respond(self.clients.create(profile).await, "create client", |_| {
            "Client created successfully".to_string()
        })
    }

    /// Validates and updates a client.
    pub async fn update(&self, id: ClientId, profile: &ClientProfile) -> Outcome<clients::Model> {
        respond(self.clients.update(id, profile).await, "update client", |_| {
            "Client updated successfully".to_string()
        })
    }

    /// Deletes a client without invoices or quotes.
    pub async fn delete(&self, id: ClientId) -> Outcome<()> {
        respond(self.clients.delete(id).await, "delete client", |_| {
            "Client deleted successfully".to_string()
        })
    }

    /// Activates or deactivates a client.
    pub async fn toggle_active(&self, id: ClientId) -> Outcome<clients::Model> {
        respond(
            self.clients.toggle_active(id).await,
            "toggle client",
            |client| {
                if client.active {
                    "Client activated".to_string()
                } else {
                    "Client deactivated".to_string()
                }
            },
        )
    }

    /// Invoice and quote counts and revenue (paid invoices) of a client.
    pub async fn statistics(&self, id: ClientId) -> Statistics {
        read_or_default(self.statistics.for_client(id).await, "client statistics")
    }
}
