//! Reconciliation service: payment and credit note rules, invoice status machine.
//!
//! Everything here works on plain values (status, balance, dates); callers
//! load the rows, ask this service for the outcome and persist it.

use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::balance::InvoiceBalance;
use super::error::BillingError;
use super::types::InvoiceStatus;

/// Status and balance of an invoice after an accepted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciled {
    /// Status to persist.
    pub status: InvoiceStatus,
    /// Balance including the event.
    pub balance: InvoiceBalance,
}

/// Reconciliation service for invoices.
///
/// Pure business logic with no database dependencies.
pub struct ReconciliationService;

impl ReconciliationService {
    /// Status implied by a balance change.
    ///
    /// Settled invoices become `paid`, invoices with money received become
    /// `partially_paid`, anything else keeps its current status.
    #[must_use]
    pub fn status_from_balance(current: InvoiceStatus, balance: &InvoiceBalance) -> InvoiceStatus {
        if balance.is_settled() {
            InvoiceStatus::Paid
        } else if balance.paid > Decimal::ZERO {
            InvoiceStatus::PartiallyPaid
        } else {
            current
        }
    }

    /// Checks a payment against an invoice and returns the resulting state.
    ///
    /// Rejects non-positive amounts, invoices that are not awaiting payment
    /// and any amount above the outstanding balance. On rejection nothing
    /// must be persisted.
    pub fn record_payment(
        status: InvoiceStatus,
        balance: &InvoiceBalance,
        amount: Decimal,
    ) -> Result<Reconciled, BillingError> {
        if amount <= Decimal::ZERO {
            return Err(BillingError::NonPositiveAmount);
        }
        if !status.accepts_payments() {
            return Err(BillingError::PaymentNotAllowed(status));
        }

        let outstanding = balance.outstanding();
        if amount > outstanding {
            return Err(BillingError::Overpayment {
                amount,
                outstanding,
            });
        }

        let balance = balance.with_payment(amount);
        Ok(Reconciled {
            status: Self::status_from_balance(status, &balance),
            balance,
        })
    }

    /// Checks a credit note against an invoice and returns the resulting state.
    ///
    /// `amount` is the credit magnitude. A `paid` invoice stays `paid`; any
    /// credit beyond what was still owed shows up as
    /// [`InvoiceBalance::refund_due`].
    pub fn apply_credit_note(
        status: InvoiceStatus,
        balance: &InvoiceBalance,
        amount: Decimal,
        reason: &str,
    ) -> Result<Reconciled, BillingError> {
        if reason.trim().is_empty() {
            return Err(BillingError::ReasonRequired);
        }
        if amount <= Decimal::ZERO {
            return Err(BillingError::NonPositiveAmount);
        }
        if !status.accepts_credit_notes() {
            return Err(BillingError::CreditNoteNotAllowed(status));
        }

        let creditable = balance.creditable();
        if amount > creditable {
            return Err(BillingError::CreditExceedsInvoice { amount, creditable });
        }

        let balance = balance.with_credit(amount);
        Ok(Reconciled {
            status: Self::status_from_balance(status, &balance),
            balance,
        })
    }

    /// Status after a payment was removed, given the balance without it.
    ///
    /// Unlike [`Self::status_from_balance`] this may step back: a `paid`
    /// invoice with nothing received anymore returns to `issued`. Drafts and
    /// cancelled invoices are left alone.
    #[must_use]
    pub fn status_after_payment_removal(
        current: InvoiceStatus,
        balance: &InvoiceBalance,
    ) -> InvoiceStatus {
        match current {
            InvoiceStatus::Draft | InvoiceStatus::Cancelled => current,
            _ if balance.is_settled() => InvoiceStatus::Paid,
            _ if balance.paid > Decimal::ZERO => InvoiceStatus::PartiallyPaid,
            _ => InvoiceStatus::Issued,
        }
    }

    /// Derives the overdue status at read time.
    ///
    /// `issued` and `partially_paid` invoices whose due date is before
    /// `today` read as `overdue`. Every other status is returned unchanged,
    /// and applying the function twice gives the same result.
    #[must_use]
    pub fn recompute_overdue(
        status: InvoiceStatus,
        due_date: NaiveDate,
        today: NaiveDate,
    ) -> InvoiceStatus {
        match status {
            InvoiceStatus::Issued | InvoiceStatus::PartiallyPaid if due_date < today => {
                InvoiceStatus::Overdue
            }
            _ => status,
        }
    }

    /// `draft -> issued`. Requires at least one line and a positive total.
    pub fn issue(
        status: InvoiceStatus,
        line_count: usize,
        total: Decimal,
    ) -> Result<InvoiceStatus, BillingError> {
        if status != InvoiceStatus::Draft {
            return Err(BillingError::InvalidTransition {
                from: status,
                action: "issue",
            });
        }
        if line_count == 0 {
            return Err(BillingError::NoLines);
        }
        if total <= Decimal::ZERO {
            return Err(BillingError::NonPositiveTotal);
        }
        Ok(InvoiceStatus::Issued)
    }

    /// `draft | issued | partially_paid | overdue -> cancelled`.
    pub fn cancel(status: InvoiceStatus) -> Result<InvoiceStatus, BillingError> {
        if status.is_cancellable() {
            Ok(InvoiceStatus::Cancelled)
        } else {
            Err(BillingError::InvalidTransition {
                from: status,
                action: "cancel",
            })
        }
    }

    /// Fails unless the invoice is still a draft.
    pub fn ensure_editable(status: InvoiceStatus) -> Result<(), BillingError> {
        if status.is_editable() {
            Ok(())
        } else {
            Err(BillingError::NotEditable(status))
        }
    }

    /// Checks invoice dates: due date not before issue, service period ordered.
    pub fn validate_dates(
        issue_date: NaiveDate,
        due_date: NaiveDate,
        period_start: Option<NaiveDate>,
        period_end: Option<NaiveDate>,
    ) -> Result<(), BillingError> {
        if due_date < issue_date {
            return Err(BillingError::DueBeforeIssue);
        }
        if let (Some(start), Some(end)) = (period_start, period_end)
            && end < start
        {
            return Err(BillingError::InvalidServicePeriod);
        }
        Ok(())
    }

    /// Fails when an edit would move a numbered document out of the year its
    /// number belongs to.
    pub fn ensure_issue_year(
        number: &str,
        numbered_on: NaiveDate,
        issue_date: NaiveDate,
    ) -> Result<(), BillingError> {
        if numbered_on.year() == issue_date.year() {
            Ok(())
        } else {
            Err(BillingError::IssueYearChanged {
                number: number.to_string(),
                year: numbered_on.year(),
            })
        }
    }

    /// Default due date: issue date plus the payment terms.
    #[must_use]
    pub fn default_due_date(issue_date: NaiveDate, payment_terms_days: u32) -> NaiveDate {
        issue_date
            .checked_add_days(Days::new(u64::from(payment_terms_days)))
            .unwrap_or(NaiveDate::MAX)
    }
}
