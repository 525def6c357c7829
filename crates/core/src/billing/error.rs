//! Billing error types.

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::{InvoiceStatus, QuoteStatus};

/// Errors raised by line arithmetic, reconciliation and status transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillingError {
    // ========== Line Errors ==========
    /// Document has no line.
    #[error("Document must have at least one line")]
    NoLines,

    /// Line label is blank.
    #[error("Line {line}: label is required")]
    EmptyLabel {
        /// 1-based line number.
        line: usize,
    },

    /// Line quantity is zero or negative.
    #[error("Line {line}: quantity must be greater than zero")]
    NonPositiveQuantity {
        /// 1-based line number.
        line: usize,
    },

    /// Line unit price is negative.
    #[error("Line {line}: unit price cannot be negative")]
    NegativeUnitPrice {
        /// 1-based line number.
        line: usize,
    },

    /// Line unit price or total is above the storable maximum.
    #[error("Line {line}: amount cannot exceed 999 999 999,99")]
    AmountTooLarge {
        /// 1-based line number.
        line: usize,
    },

    // ========== Document Errors ==========
    /// Invoice total is not positive.
    #[error("Invoice total must be greater than zero")]
    NonPositiveTotal,

    /// Due date precedes issue date.
    #[error("Due date cannot be before the issue date")]
    DueBeforeIssue,

    /// Service period end precedes its start.
    #[error("Service period end cannot be before its start")]
    InvalidServicePeriod,

    /// New issue date leaves the year the document was numbered in.
    #[error("{number} belongs to {year}, its issue date must stay in that year")]
    IssueYearChanged {
        /// Assigned document number.
        number: String,
        /// Year scoping the number.
        year: i32,
    },

    /// Quote validity precedes issue date.
    #[error("Validity date cannot be before the issue date")]
    ValidityBeforeIssue,

    // ========== Payment Errors ==========
    /// Amount is zero or negative.
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    /// Payment larger than what is still owed.
    #[error("Payment of {amount} exceeds the outstanding balance of {outstanding}")]
    Overpayment {
        /// Requested payment amount.
        amount: Decimal,
        /// Amount still owed.
        outstanding: Decimal,
    },

    /// Invoice status does not accept payments.
    #[error("Cannot record a payment on a {0} invoice")]
    PaymentNotAllowed(InvoiceStatus),

    // ========== Credit Note Errors ==========
    /// Credit note reason is blank.
    #[error("A reason is required for a credit note")]
    ReasonRequired,

    /// Invoice status does not accept credit notes.
    #[error("Cannot issue a credit note on a {0} invoice")]
    CreditNoteNotAllowed(InvoiceStatus),

    /// Credit note larger than what can still be credited.
    #[error("Credit note of {amount} exceeds the creditable amount of {creditable}")]
    CreditExceedsInvoice {
        /// Requested credit amount.
        amount: Decimal,
        /// Invoice total minus credit notes already issued.
        creditable: Decimal,
    },

    // ========== Status Errors ==========
    /// Transition not allowed from the current invoice status.
    #[error("Cannot {action} a {from} invoice")]
    InvalidTransition {
        /// Current status.
        from: InvoiceStatus,
        /// Attempted action.
        action: &'static str,
    },

    /// Invoice is no longer a draft.
    #[error("Only draft invoices can be modified (current status: {0})")]
    NotEditable(InvoiceStatus),

    /// Quote already answered.
    #[error("Quote is {0}, only pending quotes can be changed")]
    QuoteNotPending(QuoteStatus),

    /// Quote cannot be converted.
    #[error("Quote is {0}, only accepted quotes can be invoiced")]
    QuoteNotAccepted(QuoteStatus),
}

impl BillingError {
    /// Returns a stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoLines => "NO_LINES",
            Self::EmptyLabel { .. } => "EMPTY_LABEL",
            Self::NonPositiveQuantity { .. } => "NON_POSITIVE_QUANTITY",
            Self::NegativeUnitPrice { .. } => "NEGATIVE_UNIT_PRICE",
            Self::AmountTooLarge { .. } => "AMOUNT_TOO_LARGE",
            Self::NonPositiveTotal => "NON_POSITIVE_TOTAL",
            Self::DueBeforeIssue => "DUE_BEFORE_ISSUE",
            Self::InvalidServicePeriod => "INVALID_SERVICE_PERIOD",
            Self::IssueYearChanged { .. } => "ISSUE_YEAR_CHANGED",
            Self::ValidityBeforeIssue => "VALIDITY_BEFORE_ISSUE",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::Overpayment { .. } => "OVERPAYMENT",
            Self::PaymentNotAllowed(_) => "PAYMENT_NOT_ALLOWED",
            Self::ReasonRequired => "REASON_REQUIRED",
            Self::CreditNoteNotAllowed(_) => "CREDIT_NOTE_NOT_ALLOWED",
            Self::CreditExceedsInvoice { .. } => "CREDIT_EXCEEDS_INVOICE",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotEditable(_) => "NOT_EDITABLE",
            Self::QuoteNotPending(_) => "QUOTE_NOT_PENDING",
            Self::QuoteNotAccepted(_) => "QUOTE_NOT_ACCEPTED",
        }
    }

    /// Returns true for malformed input, false for rule violations on
    /// well-formed input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NoLines
                | Self::EmptyLabel { .. }
                | Self::NonPositiveQuantity { .. }
                | Self::NegativeUnitPrice { .. }
                | Self::AmountTooLarge { .. }
                | Self::DueBeforeIssue
                | Self::InvalidServicePeriod
                | Self::ValidityBeforeIssue
                | Self::NonPositiveAmount
                | Self::ReasonRequired
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_display() {
        let err = BillingError::Overpayment {
            amount: dec!(150.00),
            outstanding: dec!(100.00),
        };
        assert_eq!(
            err.to_string(),
            "Payment of 150.00 exceeds the outstanding balance of 100.00"
        );

        let err = BillingError::InvalidTransition {
            from: InvoiceStatus::Paid,
            action: "cancel",
        };
        assert_eq!(err.to_string(), "Cannot cancel a paid invoice");

        assert_eq!(
            BillingError::EmptyLabel { line: 2 }.to_string(),
            "Line 2: label is required"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(BillingError::NonPositiveAmount.is_validation());
        assert!(BillingError::ReasonRequired.is_validation());
        assert!(!BillingError::PaymentNotAllowed(InvoiceStatus::Draft).is_validation());
        assert_eq!(BillingError::NoLines.error_code(), "NO_LINES");
        assert_eq!(
            BillingError::QuoteNotAccepted(QuoteStatus::Refused).error_code(),
            "QUOTE_NOT_ACCEPTED"
        );
    }
}
