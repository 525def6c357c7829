//! Invoice repository: drafts, issuing, payments and credit notes.
//!
//! Every mutation runs in one transaction. The stored status is recomputed
//! from the balance inside the transaction that records a payment or a
//! credit note; `overdue` is never stored and only derived on read.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Utc};
use facturo_core::billing::{
    BillingError, ComputedLine, InvoiceBalance, InvoiceStatus, LineInput, PaymentMethod,
    Reconciled, ReconciliationService, compute_lines, document_total, quote as quote_rules,
};
use facturo_core::numbering::{DocumentKind, NumberingError};
use facturo_shared::types::{ClientId, CreditNoteId, InvoiceId, PaymentId, QuoteId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use super::lines::{
    delete_invoice_lines, insert_credit_note_lines, insert_invoice_lines, quote_lines_as_inputs,
};
use super::numbering::{
    DocumentNumbering, NumberCollision, is_unique_violation, with_number_retry,
};
use crate::entities::{
    avoirs, avoirs_lignes, clients, devis, devis_lignes, factures, factures_lignes, paiements,
    sea_orm_active_enums::InvoiceStatus as DbInvoiceStatus,
};

/// Error types for invoice operations.
#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    NotFound(InvoiceId),

    /// Client not found.
    #[error("Client not found: {0}")]
    ClientNotFound(ClientId),

    /// Quote not found.
    #[error("Quote not found: {0}")]
    QuoteNotFound(QuoteId),

    /// Payment not found.
    #[error("Payment not found: {0}")]
    PaymentNotFound(PaymentId),

    /// Line, amount or status rule violated.
    #[error(transparent)]
    Billing(#[from] BillingError),

    /// Number assignment failed.
    #[error(transparent)]
    Numbering(#[from] NumberingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl NumberCollision for InvoiceError {
    fn is_number_collision(&self) -> bool {
        matches!(self, Self::Database(e) if is_unique_violation(e))
    }
}

/// Invoice fields as entered in the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceInput {
    /// Billed client.
    pub client_id: ClientId,
    /// Issue date; its year scopes the number.
    pub issue_date: NaiveDate,
    /// Due date, not before the issue date.
    pub due_date: NaiveDate,
    /// Start of the service period.
    pub period_start: Option<NaiveDate>,
    /// End of the service period.
    pub period_end: Option<NaiveDate>,
    /// Expected payment method.
    pub payment_method: Option<PaymentMethod>,
    /// Payment terms text.
    pub payment_terms: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Lines, in display order. A draft may have none.
    pub lines: Vec<LineInput>,
}

/// A payment to record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInput {
    /// Date the money was received.
    pub payment_date: NaiveDate,
    /// Amount received, strictly positive.
    pub amount: Decimal,
    /// Payment method.
    pub method: PaymentMethod,
    /// Cheque number, transfer reference...
    pub reference: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// A credit note to issue against an invoice.
///
/// When lines are given the credited amount is their total, otherwise
/// `amount` is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditNoteInput {
    /// Issue date; its year scopes the number.
    pub issue_date: NaiveDate,
    /// Mandatory reason.
    pub reason: String,
    /// Credited amount (positive magnitude) when no lines are given.
    pub amount: Option<Decimal>,
    /// Credited lines.
    pub lines: Vec<LineInput>,
}

impl CreditNoteInput {
    fn credited(&self) -> Result<(Vec<ComputedLine>, Decimal), BillingError> {
        let lines = compute_lines(&self.lines)?;
        if lines.is_empty() {
            let amount = self.amount.ok_or(BillingError::NonPositiveAmount)?;
            Ok((lines, amount))
        } else {
            let total = document_total(&lines);
            Ok((lines, total))
        }
    }
}

/// Invoice list criteria. `None` means no constraint.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvoiceFilter {
    /// Billed client.
    pub client_id: Option<ClientId>,
    /// Status as seen on the read date (`overdue` matches derived overdue).
    pub status: Option<InvoiceStatus>,
}

/// A credit note with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditNoteDetails {
    /// Stored row (amount is negative).
    pub credit_note: avoirs::Model,
    /// Lines ordered by position.
    pub lines: Vec<avoirs_lignes::Model>,
}

/// An invoice with everything attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDetails {
    /// Stored row.
    pub invoice: factures::Model,
    /// Status as of the read date.
    pub status: InvoiceStatus,
    /// Balance derived from payments and credit notes.
    pub balance: InvoiceBalance,
    /// Lines ordered by position.
    pub lines: Vec<factures_lignes::Model>,
    /// Payments, oldest first.
    pub payments: Vec<paiements::Model>,
    /// Credit notes, oldest first.
    pub credit_notes: Vec<CreditNoteDetails>,
}

/// An invoice row with its derived figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    /// Stored row.
    pub invoice: factures::Model,
    /// Status as of the read date.
    pub status: InvoiceStatus,
    /// Balance derived from payments and credit notes.
    pub balance: InvoiceBalance,
}

/// A recorded payment and the invoice state it led to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    /// Stored payment.
    pub payment: paiements::Model,
    /// Stored status and new balance.
    pub outcome: Reconciled,
}

/// An issued credit note and the invoice state it led to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditNoteReceipt {
    /// Stored credit note with its lines.
    pub credit_note: CreditNoteDetails,
    /// Stored status and new balance.
    pub outcome: Reconciled,
}

fn clean_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

fn prepare(input: &InvoiceInput) -> Result<(Vec<ComputedLine>, Decimal), BillingError> {
    ReconciliationService::validate_dates(
        input.issue_date,
        input.due_date,
        input.period_start,
        input.period_end,
    )?;
    let lines = compute_lines(&input.lines)?;
    let total = document_total(&lines);
    Ok((lines, total))
}

fn derived_status(invoice: &factures::Model, today: NaiveDate) -> InvoiceStatus {
    ReconciliationService::recompute_overdue(invoice.status.into(), invoice.due_date, today)
}

/// Balance of `invoice` as persisted on `conn`.
async fn load_balance<C>(conn: &C, invoice: &factures::Model) -> Result<InvoiceBalance, DbErr>
where
    C: ConnectionTrait,
{
    let payments = paiements::Entity::find()
        .filter(paiements::Column::InvoiceId.eq(invoice.id))
        .all(conn)
        .await?;
    let credit_notes = avoirs::Entity::find()
        .filter(avoirs::Column::InvoiceId.eq(invoice.id))
        .all(conn)
        .await?;

    Ok(InvoiceBalance::from_parts(
        invoice.total,
        payments.iter().map(|p| p.amount),
        credit_notes.iter().map(|c| c.amount),
    ))
}

async fn store_status<C>(
    conn: &C,
    invoice: factures::Model,
    status: InvoiceStatus,
) -> Result<factures::Model, DbErr>
where
    C: ConnectionTrait,
{
    let status = DbInvoiceStatus::from(status);
    if invoice.status == status {
        return Ok(invoice);
    }
    let mut active: factures::ActiveModel = invoice.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now());
    active.update(conn).await
}

async fn find_invoice<C>(conn: &C, id: InvoiceId) -> Result<factures::Model, InvoiceError>
where
    C: ConnectionTrait,
{
    factures::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .ok_or(InvoiceError::NotFound(id))
}

/// Invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
    numbering: DocumentNumbering,
}

impl InvoiceRepository {
    /// Creates a new invoice repository with default number formatting.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            numbering: DocumentNumbering::default(),
        }
    }

    /// Uses the given number formatting.
    #[must_use]
    pub const fn with_numbering(mut self, numbering: DocumentNumbering) -> Self {
        self.numbering = numbering;
        self
    }

    /// Creates a numbered draft invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the client does not exist,
    /// numbering fails twice or the insert fails.
    pub async fn create_draft(
        &self,
        input: &InvoiceInput,
    ) -> Result<factures::Model, InvoiceError> {
        let (lines, total) = prepare(input)?;

        let invoice = with_number_retry(DocumentKind::Invoice, || {
            self.insert_numbered(input, None, &lines, total)
        })
        .await?;

        tracing::info!(invoice_id = invoice.id, number = %invoice.number, "Draft invoice created");
        Ok(invoice)
    }

    /// Creates a draft invoice from an accepted quote, copying its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the quote is missing or not accepted, or if the
    /// invoice cannot be created.
    pub async fn create_from_quote(
        &self,
        quote_id: QuoteId,
        issue_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Result<factures::Model, InvoiceError> {
        let quote = devis::Entity::find_by_id(quote_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(InvoiceError::QuoteNotFound(quote_id))?;
        quote_rules::ensure_convertible(quote.status.into())?;

        let quote_lines = devis_lignes::Entity::find()
            .filter(devis_lignes::Column::DevisId.eq(quote.id))
            .order_by_asc(devis_lignes::Column::Position)
            .all(&self.db)
            .await?;

        let input = InvoiceInput {
            client_id: ClientId::new(quote.client_id),
            issue_date,
            due_date,
            period_start: None,
            period_end: None,
            payment_method: None,
            payment_terms: None,
            notes: quote.terms.clone(),
            lines: quote_lines_as_inputs(&quote_lines),
        };
        let (lines, total) = prepare(&input)?;

        let invoice = with_number_retry(DocumentKind::Invoice, || {
            self.insert_numbered(&input, Some(quote.id), &lines, total)
        })
        .await?;

        tracing::info!(
            invoice_id = invoice.id,
            quote_id = quote.id,
            number = %invoice.number,
            "Invoice created from quote"
        );
        Ok(invoice)
    }

    async fn insert_numbered(
        &self,
        input: &InvoiceInput,
        quote_id: Option<i32>,
        lines: &[ComputedLine],
        total: Decimal,
    ) -> Result<factures::Model, InvoiceError> {
        let txn = self.db.begin().await?;

        let client_id = input.client_id.into_inner();
        if clients::Entity::find_by_id(client_id).one(&txn).await?.is_none() {
            return Err(InvoiceError::ClientNotFound(input.client_id));
        }

        let number: String = self
            .numbering
            .reserve::<_, InvoiceError>(&txn, DocumentKind::Invoice, input.issue_date.year())
            .await?;

        let now = Utc::now();
        let invoice = factures::ActiveModel {
            number: Set(number),
            client_id: Set(client_id),
            devis_id: Set(quote_id),
            issue_date: Set(input.issue_date),
            period_start: Set(input.period_start),
            period_end: Set(input.period_end),
            due_date: Set(input.due_date),
            status: Set(DbInvoiceStatus::Draft),
            total: Set(total),
            payment_method: Set(input.payment_method.map(Into::into)),
            payment_terms: Set(clean_text(input.payment_terms.as_deref())),
            notes: Set(clean_text(input.notes.as_deref())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        insert_invoice_lines(&txn, invoice.id, lines).await?;
        txn.commit().await?;
        Ok(invoice)
    }

    /// Loads an invoice with its lines, payments and credit notes, status
    /// evaluated on `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn get(
        &self,
        id: InvoiceId,
        today: NaiveDate,
    ) -> Result<Option<InvoiceDetails>, DbErr> {
        let Some(invoice) = factures::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let lines = factures_lignes::Entity::find()
            .filter(factures_lignes::Column::InvoiceId.eq(invoice.id))
            .order_by_asc(factures_lignes::Column::Position)
            .all(&self.db)
            .await?;
        let payments = paiements::Entity::find()
            .filter(paiements::Column::InvoiceId.eq(invoice.id))
            .order_by_asc(paiements::Column::PaymentDate)
            .order_by_asc(paiements::Column::Id)
            .all(&self.db)
            .await?;
        let notes = avoirs::Entity::find()
            .filter(avoirs::Column::InvoiceId.eq(invoice.id))
            .order_by_asc(avoirs::Column::Id)
            .all(&self.db)
            .await?;

        let note_ids: Vec<i32> = notes.iter().map(|n| n.id).collect();
        let mut note_lines: HashMap<i32, Vec<avoirs_lignes::Model>> = HashMap::new();
        for line in avoirs_lignes::Entity::find()
            .filter(avoirs_lignes::Column::CreditNoteId.is_in(note_ids))
            .order_by_asc(avoirs_lignes::Column::Position)
            .all(&self.db)
            .await?
        {
            note_lines.entry(line.credit_note_id).or_default().push(line);
        }

        let balance = InvoiceBalance::from_parts(
            invoice.total,
            payments.iter().map(|p| p.amount),
            notes.iter().map(|n| n.amount),
        );
        let credit_notes = notes
            .into_iter()
            .map(|credit_note| CreditNoteDetails {
                lines: note_lines.remove(&credit_note.id).unwrap_or_default(),
                credit_note,
            })
            .collect();

        Ok(Some(InvoiceDetails {
            status: derived_status(&invoice, today),
            invoice,
            balance,
            lines,
            payments,
            credit_notes,
        }))
    }

    /// Lists invoices, newest first, with their balance and read-time status.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn list(
        &self,
        filter: InvoiceFilter,
        today: NaiveDate,
    ) -> Result<Vec<InvoiceSummary>, DbErr> {
        let mut query = factures::Entity::find();
        if let Some(client_id) = filter.client_id {
            query = query.filter(factures::Column::ClientId.eq(client_id.into_inner()));
        }
        let invoices = query
            .order_by_desc(factures::Column::IssueDate)
            .order_by_desc(factures::Column::Number)
            .all(&self.db)
            .await?;

        let ids: Vec<i32> = invoices.iter().map(|i| i.id).collect();
        let mut paid: HashMap<i32, Vec<Decimal>> = HashMap::new();
        for payment in paiements::Entity::find()
            .filter(paiements::Column::InvoiceId.is_in(ids.clone()))
            .all(&self.db)
            .await?
        {
            paid.entry(payment.invoice_id).or_default().push(payment.amount);
        }
        let mut credited: HashMap<i32, Vec<Decimal>> = HashMap::new();
        for note in avoirs::Entity::find()
            .filter(avoirs::Column::InvoiceId.is_in(ids))
            .all(&self.db)
            .await?
        {
            credited.entry(note.invoice_id).or_default().push(note.amount);
        }

        Ok(invoices
            .into_iter()
            .map(|invoice| {
                let balance = InvoiceBalance::from_parts(
                    invoice.total,
                    paid.remove(&invoice.id).unwrap_or_default(),
                    credited.remove(&invoice.id).unwrap_or_default(),
                );
                InvoiceSummary {
                    status: derived_status(&invoice, today),
                    invoice,
                    balance,
                }
            })
            .filter(|summary| filter.status.is_none_or(|s| s == summary.status))
            .collect())
    }

    /// Replaces the header and lines of a draft. The number is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice is missing or no longer a draft, the
    /// issue date leaves the year of its number, validation fails or the
    /// update fails.
    pub async fn update_draft(
        &self,
        id: InvoiceId,
        input: &InvoiceInput,
    ) -> Result<factures::Model, InvoiceError> {
        let (lines, total) = prepare(input)?;
        let txn = self.db.begin().await?;

        let existing = find_invoice(&txn, id).await?;
        ReconciliationService::ensure_editable(existing.status.into())?;
        ReconciliationService::ensure_issue_year(
            &existing.number,
            existing.issue_date,
            input.issue_date,
        )?;

        let client_id = input.client_id.into_inner();
        if clients::Entity::find_by_id(client_id).one(&txn).await?.is_none() {
            return Err(InvoiceError::ClientNotFound(input.client_id));
        }

        let mut active: factures::ActiveModel = existing.into();
        active.client_id = Set(client_id);
        active.issue_date = Set(input.issue_date);
        active.period_start = Set(input.period_start);
        active.period_end = Set(input.period_end);
        active.due_date = Set(input.due_date);
        active.total = Set(total);
        active.payment_method = Set(input.payment_method.map(Into::into));
        active.payment_terms = Set(clean_text(input.payment_terms.as_deref()));
        active.notes = Set(clean_text(input.notes.as_deref()));
        active.updated_at = Set(Utc::now());
        let invoice = active.update(&txn).await?;

        delete_invoice_lines(&txn, invoice.id).await?;
        insert_invoice_lines(&txn, invoice.id, &lines).await?;
        txn.commit().await?;

        tracing::info!(invoice_id = invoice.id, number = %invoice.number, "Draft invoice updated");
        Ok(invoice)
    }

    /// Issues a draft: `draft -> issued`.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice is missing, not a draft, has no
    /// lines or a non-positive total.
    pub async fn issue(&self, id: InvoiceId) -> Result<factures::Model, InvoiceError> {
        let txn = self.db.begin().await?;
        let invoice = find_invoice(&txn, id).await?;

        let line_count = factures_lignes::Entity::find()
            .filter(factures_lignes::Column::InvoiceId.eq(invoice.id))
            .all(&txn)
            .await?
            .len();
        let next = ReconciliationService::issue(invoice.status.into(), line_count, invoice.total)?;

        let invoice = store_status(&txn, invoice, next).await?;
        txn.commit().await?;

        tracing::info!(invoice_id = invoice.id, number = %invoice.number, "Invoice issued");
        Ok(invoice)
    }

    /// Cancels an invoice. The number stays consumed.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice is missing, paid or already cancelled.
    pub async fn cancel(&self, id: InvoiceId) -> Result<factures::Model, InvoiceError> {
        let txn = self.db.begin().await?;
        let invoice = find_invoice(&txn, id).await?;
        let next = ReconciliationService::cancel(invoice.status.into())?;

        let invoice = store_status(&txn, invoice, next).await?;
        txn.commit().await?;

        tracing::info!(invoice_id = invoice.id, number = %invoice.number, "Invoice cancelled");
        Ok(invoice)
    }

    /// Deletes an invoice with its lines, payments, credit notes and their
    /// lines, in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice is missing or a delete fails.
    pub async fn delete(&self, id: InvoiceId) -> Result<(), InvoiceError> {
        let txn = self.db.begin().await?;
        let invoice = find_invoice(&txn, id).await?;

        let note_ids: Vec<i32> = avoirs::Entity::find()
            .filter(avoirs::Column::InvoiceId.eq(invoice.id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|n| n.id)
            .collect();

        avoirs_lignes::Entity::delete_many()
            .filter(avoirs_lignes::Column::CreditNoteId.is_in(note_ids))
            .exec(&txn)
            .await?;
        let credit_notes = avoirs::Entity::delete_many()
            .filter(avoirs::Column::InvoiceId.eq(invoice.id))
            .exec(&txn)
            .await?
            .rows_affected;
        let payments = paiements::Entity::delete_many()
            .filter(paiements::Column::InvoiceId.eq(invoice.id))
            .exec(&txn)
            .await?
            .rows_affected;
        delete_invoice_lines(&txn, invoice.id).await?;
        factures::Entity::delete_by_id(invoice.id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(
            invoice_id = invoice.id,
            number = %invoice.number,
            payments,
            credit_notes,
            "Invoice deleted"
        );
        Ok(())
    }

    /// Records a payment and updates the invoice status.
    ///
    /// Nothing is written when the payment is refused.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice is missing, does not accept payments,
    /// or the amount is not positive or exceeds the outstanding balance.
    pub async fn record_payment(
        &self,
        invoice_id: InvoiceId,
        input: &PaymentInput,
    ) -> Result<PaymentReceipt, InvoiceError> {
        let txn = self.db.begin().await?;
        let invoice = find_invoice(&txn, invoice_id).await?;
        let balance = load_balance(&txn, &invoice).await?;

        let outcome =
            ReconciliationService::record_payment(invoice.status.into(), &balance, input.amount)?;

        let payment = paiements::ActiveModel {
            invoice_id: Set(invoice.id),
            payment_date: Set(input.payment_date),
            amount: Set(input.amount),
            method: Set(input.method.into()),
            reference: Set(clean_text(input.reference.as_deref())),
            notes: Set(clean_text(input.notes.as_deref())),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        store_status(&txn, invoice, outcome.status).await?;
        txn.commit().await?;

        tracing::info!(
            invoice_id = payment.invoice_id,
            payment_id = payment.id,
            amount = %payment.amount,
            status = %outcome.status,
            "Payment recorded"
        );
        Ok(PaymentReceipt { payment, outcome })
    }

    /// Deletes a payment and steps the invoice status back accordingly.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment or its invoice is missing.
    pub async fn delete_payment(&self, payment_id: PaymentId) -> Result<Reconciled, InvoiceError> {
        let txn = self.db.begin().await?;
        let payment = paiements::Entity::find_by_id(payment_id.into_inner())
            .one(&txn)
            .await?
            .ok_or(InvoiceError::PaymentNotFound(payment_id))?;
        let invoice = find_invoice(&txn, InvoiceId::new(payment.invoice_id)).await?;

        paiements::Entity::delete_by_id(payment.id).exec(&txn).await?;
        let balance = load_balance(&txn, &invoice).await?;
        let status =
            ReconciliationService::status_after_payment_removal(invoice.status.into(), &balance);

        store_status(&txn, invoice, status).await?;
        txn.commit().await?;

        tracing::info!(
            invoice_id = payment.invoice_id,
            payment_id = payment.id,
            status = %status,
            "Payment deleted"
        );
        Ok(Reconciled { status, balance })
    }

    /// Issues a numbered credit note against an invoice and updates its status.
    ///
    /// The amount is stored negative.
    ///
    /// # Errors
    ///
    /// Returns an error if the reason is blank, the amount is not positive
    /// or exceeds what can still be credited, the invoice does not accept
    /// credit notes, or numbering fails twice.
    pub async fn create_credit_note(
        &self,
        invoice_id: InvoiceId,
        input: &CreditNoteInput,
    ) -> Result<CreditNoteReceipt, InvoiceError> {
        let (lines, amount) = input.credited()?;

        let receipt = with_number_retry(DocumentKind::CreditNote, || {
            self.insert_credit_note(invoice_id, input, &lines, amount)
        })
        .await?;

        tracing::info!(
            invoice_id = %invoice_id,
            credit_note_id = receipt.credit_note.credit_note.id,
            number = %receipt.credit_note.credit_note.number,
            status = %receipt.outcome.status,
            "Credit note issued"
        );
        Ok(receipt)
    }

    async fn insert_credit_note(
        &self,
        invoice_id: InvoiceId,
        input: &CreditNoteInput,
        lines: &[ComputedLine],
        amount: Decimal,
    ) -> Result<CreditNoteReceipt, InvoiceError> {
        let txn = self.db.begin().await?;
        let invoice = find_invoice(&txn, invoice_id).await?;
        let balance = load_balance(&txn, &invoice).await?;

        let outcome = ReconciliationService::apply_credit_note(
            invoice.status.into(),
            &balance,
            amount,
            &input.reason,
        )?;

        let number: String = self
            .numbering
            .reserve::<_, InvoiceError>(&txn, DocumentKind::CreditNote, input.issue_date.year())
            .await?;

        let credit_note = avoirs::ActiveModel {
            number: Set(number),
            invoice_id: Set(invoice.id),
            issue_date: Set(input.issue_date),
            amount: Set(-amount),
            reason: Set(input.reason.trim().to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        insert_credit_note_lines(&txn, credit_note.id, lines).await?;
        store_status(&txn, invoice, outcome.status).await?;

        let stored_lines = avoirs_lignes::Entity::find()
            .filter(avoirs_lignes::Column::CreditNoteId.eq(credit_note.id))
            .order_by_asc(avoirs_lignes::Column::Position)
            .all(&txn)
            .await?;
        txn.commit().await?;

        Ok(CreditNoteReceipt {
            credit_note: CreditNoteDetails {
                credit_note,
                lines: stored_lines,
            },
            outcome,
        })
    }

    /// Loads a credit note with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn find_credit_note(
        &self,
        id: CreditNoteId,
    ) -> Result<Option<CreditNoteDetails>, DbErr> {
        let Some(credit_note) = avoirs::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        let lines = avoirs_lignes::Entity::find()
            .filter(avoirs_lignes::Column::CreditNoteId.eq(credit_note.id))
            .order_by_asc(avoirs_lignes::Column::Position)
            .all(&self.db)
            .await?;
        Ok(Some(CreditNoteDetails { credit_note, lines }))
    }
}
