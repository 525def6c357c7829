//! Invoices, payments and credit notes.

use chrono::NaiveDate;
use facturo_core::billing::{InvoiceStatus, Reconciled, ReconciliationService};
use facturo_db::entities::factures;
use facturo_db::repositories::{
    CreditNoteInput, CreditNoteReceipt, InvoiceDetails, InvoiceFilter, InvoiceInput,
    InvoiceRepository, InvoiceSummary, PAYMENT_TERMS_DAYS, ParameterRepository, PaymentInput,
    PaymentReceipt,
};
use facturo_shared::types::{ClientId, InvoiceId, PaymentId, format_euros};
use rust_decimal::Decimal;

use super::{read_or_default, respond, setting_days};
use crate::{AppState, Outcome};

/// Invoice controller.
#[derive(Debug, Clone)]
pub struct InvoiceController {
    state: AppState,
    invoices: InvoiceRepository,
    parameters: ParameterRepository,
}

impl InvoiceController {
    /// Creates the controller for the session.
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            invoices: InvoiceRepository::new(state.connection()).with_numbering(state.numbering()),
            parameters: ParameterRepository::new(state.connection()),
            state: state.clone(),
        }
    }

    /// Due date proposed for an invoice issued on `issue_date`. The stored
    /// payment terms win over the configured ones.
    pub async fn default_due_date(&self, issue_date: NaiveDate) -> NaiveDate {
        let days = setting_days(
            &self.parameters,
            PAYMENT_TERMS_DAYS,
            self.state.config.billing.payment_terms_days,
        )
        .await;
        ReconciliationService::default_due_date(issue_date, days)
    }

    /// Invoices, newest first, filtered by client and read-time status.
    pub async fn list(
        &self,
        client_id: Option<ClientId>,
        status: Option<InvoiceStatus>,
    ) -> Vec<InvoiceSummary> {
        let filter = InvoiceFilter { client_id, status };
        read_or_default(
            self.invoices.list(filter, self.state.today()).await,
            "list invoices",
        )
    }

    /// One invoice with lines, payments, credit notes and balance.
    pub async fn get(&self, id: InvoiceId) -> Option<InvoiceDetails> {
        read_or_default(
            self.invoices.get(id, self.state.today()).await,
            "get invoice",
        )
    }

    /// Creates a numbered draft.
    pub async fn create(&self, input: &InvoiceInput) -> Outcome<factures::Model> {
        respond(self.invoices.create_draft(input).await, "create invoice", |i| {
            format!("Invoice {} created successfully", i.number)
        })
    }

    /// Replaces the content of a draft.
    pub async fn update_draft(
        &self,
        id: InvoiceId,
        input: &InvoiceInput,
    ) -> Outcome<factures::Model> {
        respond(
            self.invoices.update_draft(id, input).await,
            "update invoice",
            |i| format!("Invoice {} updated successfully", i.number),
        )
    }

    /// Issues a draft.
    pub async fn issue(&self, id: InvoiceId) -> Outcome<factures::Model> {
        respond(self.invoices.issue(id).await, "issue invoice", |i| {
            format!("Invoice {} issued", i.number)
        })
    }

    /// Cancels an invoice.
    pub async fn cancel(&self, id: InvoiceId) -> Outcome<factures::Model> {
        respond(self.invoices.cancel(id).await, "cancel invoice", |i| {
            format!("Invoice {} cancelled", i.number)
        })
    }

    /// Deletes an invoice with everything attached to it.
    pub async fn delete(&self, id: InvoiceId) -> Outcome<()> {
        respond(self.invoices.delete(id).await, "delete invoice", |_| {
            "Invoice deleted successfully".to_string()
        })
    }

    /// Records a payment.
    pub async fn record_payment(
        &self,
        invoice_id: InvoiceId,
        input: &PaymentInput,
    ) -> Outcome<PaymentReceipt> {
        respond(
            self.invoices.record_payment(invoice_id, input).await,
            "record payment",
            |r| {
                if r.outcome.status == InvoiceStatus::Paid {
                    "Payment recorded, the invoice is fully paid".to_string()
                } else {
                    format!(
                        "Payment recorded, {} remaining",
                        format_euros(r.outcome.balance.outstanding())
                    )
                }
            },
        )
    }

    /// Deletes a payment.
    pub async fn delete_payment(&self, payment_id: PaymentId) -> Outcome<Reconciled> {
        respond(
            self.invoices.delete_payment(payment_id).await,
            "delete payment",
            |_| "Payment deleted successfully".to_string(),
        )
    }

    /// Issues a credit note against an invoice.
    pub async fn create_credit_note(
        &self,
        invoice_id: InvoiceId,
        input: &CreditNoteInput,
    ) -> Outcome<CreditNoteReceipt> {
        respond(
            self.invoices.create_credit_note(invoice_id, input).await,
            "create credit note",
            |r| {
                let refund = r.outcome.balance.refund_due();
                if refund > Decimal::ZERO {
                    format!(
                        "Credit note {} created, {} to refund",
                        r.credit_note.credit_note.number,
                        format_euros(refund)
                    )
                } else {
                    format!(
                        "Credit note {} created successfully",
                        r.credit_note.credit_note.number
                    )
                }
            },
        )
    }
}
