//! Invoicing arithmetic and reconciliation.
//!
//! This module implements:
//! - Line totals and document totals
//! - Invoice balance (paid, credited, remaining)
//! - Payment and credit note rules
//! - Invoice and quote status machines

pub mod balance;
pub mod error;
pub mod lines;
pub mod quote;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use balance::InvoiceBalance;
pub use error::BillingError;
pub use lines::{
    ComputedLine, LineInput, MAX_LINE_AMOUNT, compute_lines, document_total, line_total,
};
pub use service::{Reconciled, ReconciliationService};
pub use types::{InvoiceStatus, PaymentMethod, QuoteStatus};
