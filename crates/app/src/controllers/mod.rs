//! Record controllers.
//!
//! Mutations return [`Outcome`]; reads return plain values and fall back to
//! an empty result after logging the failure.

pub mod clients;
pub mod dashboard;
pub mod invoices;
pub mod prestations;
pub mod quotes;
pub mod settings;

pub use clients::ClientController;
pub use dashboard::{DashboardController, DashboardSummary};
pub use invoices::InvoiceController;
pub use prestations::PrestationController;
pub use quotes::QuoteController;
pub use settings::SettingsController;

use std::fmt::Display;

use facturo_db::repositories::{ParameterRepository, ParameterValue};
use tracing::{error, warn};

use crate::errors::IntoAppError;
use crate::outcome::Outcome;

/// Turns a repository result into an [`Outcome`], logging refusals and faults.
fn respond<T, E, F>(result: Result<T, E>, operation: &'static str, message: F) -> Outcome<T>
where
    E: IntoAppError,
    F: FnOnce(&T) -> String,
{
    match result {
        Ok(data) => {
            let message = message(&data);
            Outcome::ok(message, data)
        }
        Err(e) => {
            let err = e.into_app_error();
            if err.is_fault() {
                error!(error = %err, operation, "Operation failed");
            } else {
                warn!(error = %err, code = err.error_code(), operation, "Operation refused");
            }
            Outcome::from_error(&err)
        }
    }
}

/// Day count stored under `key`, or `default` when unset or unusable.
async fn setting_days(parameters: &ParameterRepository, key: &str, default: u32) -> u32 {
    match parameters.get(key).await {
        Ok(None) => default,
        Ok(Some(ParameterValue::Integer(days))) => u32::try_from(days).unwrap_or_else(|_| {
            warn!(key, days, "Day count out of range, using configured default");
            default
        }),
        Ok(Some(other)) => {
            warn!(key, value = ?other, "Day count is not an integer, using configured default");
            default
        }
        Err(e) => {
            warn!(error = %e, key, "Day count unreadable, using configured default");
            default
        }
    }
}

/// Unwraps a read, or logs and returns the empty value.
fn read_or_default<T, E>(result: Result<T, E>, operation: &'static str) -> T
where
    T: Default,
    E: Display,
{
    result.unwrap_or_else(|e| {
        error!(error = %e, operation, "Read failed");
        T::default()
    })
}
