//! Result shape returned by controller mutations.

use facturo_shared::AppError;
use serde::Serialize;

/// Outcome of a mutation: a success flag, a message for the user and the
/// affected record when there is one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome<T> {
    /// Whether the operation was applied.
    pub success: bool,
    /// Message shown to the user.
    pub message: String,
    /// Affected record, only on success.
    pub data: Option<T>,
}

impl<T> Outcome<T> {
    /// Successful outcome carrying `data`.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Failed outcome. Nothing was saved.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    /// Failed outcome for `error`, with its user-facing message.
    #[must_use]
    pub fn from_error(error: &AppError) -> Self {
        Self::failure(error.user_message())
    }

    /// Maps the carried record.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        Outcome {
            success: self.success,
            message: self.message,
            data: self.data.map(f),
        }
    }

    /// Returns the record of a successful outcome.
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_has_no_data() {
        let outcome: Outcome<i32> = Outcome::failure("Client not found");
        assert!(!outcome.success);
        assert_eq!(outcome.data, None);
        assert_eq!(outcome.message, "Client not found");
    }

    #[test]
    fn test_fault_message_is_generic() {
        let outcome: Outcome<()> =
            Outcome::from_error(&AppError::Database("disk I/O error".to_string()));
        assert!(!outcome.success);
        assert!(!outcome.message.contains("disk"));
    }

    #[test]
    fn test_map_keeps_message() {
        let outcome = Outcome::ok("Invoice created", 41).map(|n| n + 1);
        assert!(outcome.success);
        assert_eq!(outcome.message, "Invoice created");
        assert_eq!(outcome.into_data(), Some(42));
    }
}
