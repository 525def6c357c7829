//! Typed application settings.

use facturo_db::entities::parametres;
use facturo_db::repositories::{ParameterRepository, ParameterValue};

use super::{read_or_default, respond};
use crate::{AppState, Outcome};

/// Settings controller.
#[derive(Debug, Clone)]
pub struct SettingsController {
    parameters: ParameterRepository,
}

impl SettingsController {
    /// Creates the controller for the session.
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            parameters: ParameterRepository::new(state.connection()),
        }
    }

    /// Every user setting, ordered by key.
    pub async fn list(&self) -> Vec<parametres::Model> {
        read_or_default(self.parameters.list().await, "list settings")
    }

    /// Typed value of a setting.
    pub async fn get(&self, key: &str) -> Option<ParameterValue> {
        read_or_default(self.parameters.get(key).await, "get setting")
    }

    /// Text setting, or `default` when missing or not text.
    pub async fn get_text(&self, key: &str, default: &str) -> String {
        match self.get(key).await {
            Some(ParameterValue::Text(value)) => value,
            _ => default.to_string(),
        }
    }

    /// Writes a setting.
    pub async fn set(&self, key: &str, value: &ParameterValue) -> Outcome<parametres::Model> {
        respond(self.parameters.set(key, value).await, "save setting", |p| {
            format!("Setting {} saved", p.key)
        })
    }

    /// Removes a setting. Succeeds whether or not it existed.
    pub async fn delete(&self, key: &str) -> Outcome<bool> {
        respond(self.parameters.delete(key).await, "delete setting", |_| {
            "Setting deleted".to_string()
        })
    }
}
