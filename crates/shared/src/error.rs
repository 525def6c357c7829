//! Application-wide error types.
//!
//! Controllers convert every lower-level error into an `AppError` before
//! turning it into a user-facing message, so this enum is the single error
//! taxonomy the presentation layer ever sees.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// User-correctable input problem (missing field, malformed value, bad amount).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation blocked by dependent records.
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Business rule violation (invalid status transition, overpayment, ...).
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Conflict (e.g., duplicate document number).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Persistence fault.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns a stable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Integrity(_) => "INTEGRITY_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true for infrastructure faults whose cause must not be shown raw.
    #[must_use]
    pub const fn is_fault(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Internal(_))
    }

    /// Returns the message shown to the end user.
    ///
    /// User-correctable errors carry their own message; faults are replaced by
    /// a generic sentence and only logged in full.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg)
            | Self::Integrity(msg)
            | Self::NotFound(msg)
            | Self::BusinessRule(msg)
            | Self::Conflict(msg) => msg.clone(),
            Self::Database(_) | Self::Internal(_) => {
                "The operation could not be completed, no changes were saved".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            AppError::Integrity(String::new()).error_code(),
            "INTEGRITY_ERROR"
        );
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::BusinessRule(String::new()).error_code(),
            "BUSINESS_RULE_VIOLATION"
        );
        assert_eq!(AppError::Conflict(String::new()).error_code(), "CONFLICT");
        assert_eq!(
            AppError::Database(String::new()).error_code(),
            "DATABASE_ERROR"
        );
        assert_eq!(
            AppError::Internal(String::new()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            AppError::Integrity("msg".into()).to_string(),
            "Integrity error: msg"
        );
        assert_eq!(
            AppError::NotFound("msg".into()).to_string(),
            "Not found: msg"
        );
        assert_eq!(
            AppError::BusinessRule("msg".into()).to_string(),
            "Business rule violation: msg"
        );
        assert_eq!(
            AppError::Database("msg".into()).to_string(),
            "Database error: msg"
        );
    }

    #[test]
    fn test_user_message_hides_faults() {
        let fault = AppError::Database("UNIQUE constraint failed: factures.numero".into());
        assert!(fault.is_fault());
        assert!(!fault.user_message().contains("UNIQUE"));

        let refused = AppError::Integrity("Client has 1 invoice(s)".into());
        assert!(!refused.is_fault());
        assert_eq!(refused.user_message(), "Client has 1 invoice(s)");
    }
}
