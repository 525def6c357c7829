//! Billing domain enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Invoice status.
///
/// `draft -> issued -> partially_paid -> paid`, with `overdue` derived on
/// read and `cancelled` terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Being prepared, freely editable, no payments.
    Draft,
    /// Sent to the client, nothing received yet.
    Issued,
    /// Fully settled (payments and credit notes cover the total).
    Paid,
    /// Some money received, balance outstanding.
    PartiallyPaid,
    /// Past due date with a balance outstanding.
    Overdue,
    /// Cancelled (terminal).
    Cancelled,
}

impl InvoiceStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Issued => "issued",
            Self::Paid => "paid",
            Self::PartiallyPaid => "partially_paid",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "issued" => Some(Self::Issued),
            "paid" => Some(Self::Paid),
            "partially_paid" => Some(Self::PartiallyPaid),
            "overdue" => Some(Self::Overdue),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if lines and header fields may still be edited.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if payments may be recorded.
    #[must_use]
    pub fn accepts_payments(&self) -> bool {
        matches!(self, Self::Issued | Self::PartiallyPaid | Self::Overdue)
    }

    /// Returns true if credit notes may be issued against the invoice.
    #[must_use]
    pub fn accepts_credit_notes(&self) -> bool {
        matches!(
            self,
            Self::Issued | Self::PartiallyPaid | Self::Overdue | Self::Paid
        )
    }

    /// Returns true if the invoice may be cancelled.
    #[must_use]
    pub fn is_cancellable(&self) -> bool {
        matches!(
            self,
            Self::Draft | Self::Issued | Self::PartiallyPaid | Self::Overdue
        )
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quote status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    /// Awaiting the client's answer.
    Pending,
    /// Accepted by the client.
    Accepted,
    /// Refused by the client.
    Refused,
    /// Validity date passed without an answer.
    Expired,
}

impl QuoteStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Refused => "refused",
            Self::Expired => "expired",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "refused" => Some(Self::Refused),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Means of payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash.
    Cash,
    /// Cheque.
    Cheque,
    /// Bank transfer.
    Transfer,
    /// Card.
    Card,
    /// Stripe.
    Stripe,
    /// PayPal.
    Paypal,
    /// Anything else.
    Other,
}

impl PaymentMethod {
    /// Every payment method, in display order.
    pub const ALL: [Self; 7] = [
        Self::Cash,
        Self::Cheque,
        Self::Transfer,
        Self::Card,
        Self::Stripe,
        Self::Paypal,
        Self::Other,
    ];

    /// Returns the string representation of the method.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Cheque => "cheque",
            Self::Transfer => "transfer",
            Self::Card => "card",
            Self::Stripe => "stripe",
            Self::Paypal => "paypal",
            Self::Other => "other",
        }
    }

    /// Parses a method from a string.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
