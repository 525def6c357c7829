//! Classification of repository errors into the application taxonomy.
//!
//! The orphan rule keeps `From` impls between the db error enums and
//! [`AppError`] out of this crate, so the mapping lives on a local trait.

use facturo_core::billing::BillingError;
use facturo_core::numbering::NumberingError;
use facturo_db::repositories::{
    ClientError, InvoiceError, ParameterError, PrestationError, QuoteError,
};
use facturo_shared::AppError;
use sea_orm::DbErr;

/// Conversion of a lower-level error into an [`AppError`].
pub trait IntoAppError {
    /// Classifies the error.
    fn into_app_error(self) -> AppError;
}

impl IntoAppError for DbErr {
    fn into_app_error(self) -> AppError {
        AppError::Database(self.to_string())
    }
}

impl IntoAppError for BillingError {
    fn into_app_error(self) -> AppError {
        if self.is_validation() {
            AppError::Validation(self.to_string())
        } else {
            AppError::BusinessRule(self.to_string())
        }
    }
}

impl IntoAppError for NumberingError {
    fn into_app_error(self) -> AppError {
        match self {
            NumberingError::Exhausted { .. } => AppError::Conflict(self.to_string()),
            NumberingError::SequenceOverflow { .. } => AppError::BusinessRule(self.to_string()),
            NumberingError::UnreadableMark { .. } => AppError::Internal(self.to_string()),
        }
    }
}

impl IntoAppError for ClientError {
    fn into_app_error(self) -> AppError {
        match self {
            Self::NotFound(_) => AppError::NotFound("Client not found".to_string()),
            Self::Validation(e) => AppError::Validation(e.message),
            Self::HasInvoices(_) | Self::HasQuotes(_) => AppError::Integrity(self.to_string()),
            Self::Database(e) => e.into_app_error(),
        }
    }
}

impl IntoAppError for PrestationError {
    fn into_app_error(self) -> AppError {
        match self {
            Self::NotFound(_) => AppError::NotFound("Prestation not found".to_string()),
            Self::EmptyLabel | Self::EmptyUnit | Self::NegativePrice => {
                AppError::Validation(self.to_string())
            }
            Self::InUse(_) => AppError::Integrity(self.to_string()),
            Self::Database(e) => e.into_app_error(),
        }
    }
}

impl IntoAppError for QuoteError {
    fn into_app_error(self) -> AppError {
        match self {
            Self::NotFound(_) => AppError::NotFound("Quote not found".to_string()),
            Self::ClientNotFound(_) => AppError::NotFound("Client not found".to_string()),
            Self::Billing(e) => e.into_app_error(),
            Self::HasInvoices(_) => AppError::Integrity(self.to_string()),
            Self::Numbering(e) => e.into_app_error(),
            Self::Database(e) => e.into_app_error(),
        }
    }
}

impl IntoAppError for InvoiceError {
    fn into_app_error(self) -> AppError {
        match self {
            Self::NotFound(_) => AppError::NotFound("Invoice not found".to_string()),
            Self::ClientNotFound(_) => AppError::NotFound("Client not found".to_string()),
            Self::QuoteNotFound(_) => AppError::NotFound("Quote not found".to_string()),
            Self::PaymentNotFound(_) => AppError::NotFound("Payment not found".to_string()),
            Self::Billing(e) => e.into_app_error(),
            Self::Numbering(e) => e.into_app_error(),
            Self::Database(e) => e.into_app_error(),
        }
    }
}

impl IntoAppError for ParameterError {
    fn into_app_error(self) -> AppError {
        match self {
            Self::EmptyKey => AppError::Validation(self.to_string()),
            Self::ReservedKey(_) => AppError::Integrity(self.to_string()),
            Self::InvalidValue { .. } => AppError::Internal(self.to_string()),
            Self::Database(e) => e.into_app_error(),
        }
    }
}
