//! Quote repository: numbered quotes with their lines.

use chrono::{Datelike, NaiveDate, Utc};
use facturo_core::billing::{
    BillingError, ComputedLine, LineInput, QuoteStatus, ReconciliationService, compute_lines,
    document_total, quote as quote_rules,
};
use facturo_core::numbering::{DocumentKind, NumberingError};
use facturo_shared::types::{ClientId, QuoteId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use super::lines::{delete_quote_lines, insert_quote_lines};
use super::numbering::{
    DocumentNumbering, NumberCollision, is_unique_violation, with_number_retry,
};
use crate::entities::{
    clients, devis, devis_lignes, factures,
    sea_orm_active_enums::QuoteStatus as DbQuoteStatus,
};

/// Error types for quote operations.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    /// Quote not found.
    #[error("Quote not found: {0}")]
    NotFound(QuoteId),

    /// Client not found.
    #[error("Client not found: {0}")]
    ClientNotFound(ClientId),

    /// Line, date or status rule violated.
    #[error(transparent)]
    Billing(#[from] BillingError),

    /// Delete blocked by invoices created from the quote.
    #[error("Cannot delete: {0} invoice(s) were created from this quote")]
    HasInvoices(u64),

    /// Number assignment failed.
    #[error(transparent)]
    Numbering(#[from] NumberingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl NumberCollision for QuoteError {
    fn is_number_collision(&self) -> bool {
        matches!(self, Self::Database(e) if is_unique_violation(e))
    }
}

/// Quote fields as entered in the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteInput {
    /// Client the quote is addressed to.
    pub client_id: ClientId,
    /// Issue date; its year scopes the number.
    pub issue_date: NaiveDate,
    /// Last day the quote can be accepted.
    pub validity_date: NaiveDate,
    /// Specific terms.
    pub terms: Option<String>,
    /// Lines, in display order.
    pub lines: Vec<LineInput>,
}

/// A quote with its status as of the read date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSummary {
    /// Stored row.
    pub quote: devis::Model,
    /// Effective status (a pending quote past validity reads as expired).
    pub status: QuoteStatus,
}

/// A quote with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteDetails {
    /// Stored row.
    pub quote: devis::Model,
    /// Effective status.
    pub status: QuoteStatus,
    /// Lines ordered by position.
    pub lines: Vec<devis_lignes::Model>,
}

/// Validates a quote form and computes its lines and total.
fn prepare(input: &QuoteInput) -> Result<(Vec<ComputedLine>, Decimal), BillingError> {
    quote_rules::validate_dates(input.issue_date, input.validity_date)?;
    if input.lines.is_empty() {
        return Err(BillingError::NoLines);
    }
    let lines = compute_lines(&input.lines)?;
    let total = document_total(&lines);
    Ok((lines, total))
}

fn clean_terms(terms: Option<&str>) -> Option<String> {
    terms
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
}

/// Quote repository.
#[derive(Debug, Clone)]
pub struct QuoteRepository {
    db: DatabaseConnection,
    numbering: DocumentNumbering,
}

impl QuoteRepository {
    /// Creates a new quote repository with default number formatting.
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

    /// Creates a pending quote and assigns its number.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the client does not exist,
    /// numbering fails twice or the insert fails.
    pub async fn create(&self, input: &QuoteInput) -> Result<QuoteDetails, QuoteError> {
        let (lines, total) = prepare(input)?;

        let quote = with_number_retry(DocumentKind::Quote, || {
            self.insert_numbered(input, &lines, total)
        })
        .await?;

        tracing::info!(quote_id = quote.id, number = %quote.number, "Quote created");
        let lines = self.load_lines(quote.id).await?;
        Ok(QuoteDetails {
            status: quote.status.into(),
            quote,
            lines,
        })
    }

    async fn insert_numbered(
        &self,
        input: &QuoteInput,
        lines: &[ComputedLine],
        total: Decimal,
    ) -> Result<devis::Model, QuoteError> {
        let txn = self.db.begin().await?;

        let client_id = input.client_id.into_inner();
        if clients::Entity::find_by_id(client_id).one(&txn).await?.is_none() {
            return Err(QuoteError::ClientNotFound(input.client_id));
        }

        let number: String = self
            .numbering
            .reserve::<_, QuoteError>(&txn, DocumentKind::Quote, input.issue_date.year())
            .await?;

        let now = Utc::now();
        let quote = devis::ActiveModel {
            number: Set(number),
            client_id: Set(client_id),
            issue_date: Set(input.issue_date),
            validity_date: Set(input.validity_date),
            status: Set(DbQuoteStatus::Pending),
            total: Set(total),
            terms: Set(clean_terms(input.terms.as_deref())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        insert_quote_lines(&txn, quote.id, lines).await?;
        txn.commit().await?;
        Ok(quote)
    }

    async fn load_lines(&self, quote_id: i32) -> Result<Vec<devis_lignes::Model>, DbErr> {
        devis_lignes::Entity::find()
            .filter(devis_lignes::Column::DevisId.eq(quote_id))
            .order_by_asc(devis_lignes::Column::Position)
            .all(&self.db)
            .await
    }

    /// Loads a quote with its lines, status evaluated on `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, id: QuoteId, today: NaiveDate) -> Result<Option<QuoteDetails>, DbErr> {
        let Some(quote) = devis::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let lines = self.load_lines(quote.id).await?;
        Ok(Some(QuoteDetails {
            status: quote_rules::effective_status(
                quote.status.into(),
                quote.validity_date,
                today,
            ),
            quote,
            lines,
        }))
    }

    /// Lists quotes, newest first, optionally for one client.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        client_id: Option<ClientId>,
        today: NaiveDate,
    ) -> Result<Vec<QuoteSummary>, DbErr> {
        let mut query = devis::Entity::find();
        if let Some(client_id) = client_id {
            query = query.filter(devis::Column::ClientId.eq(client_id.into_inner()));
        }
        let rows = query
            .order_by_desc(devis::Column::IssueDate)
            .order_by_desc(devis::Column::Number)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|quote| QuoteSummary {
                status: quote_rules::effective_status(
                    quote.status.into(),
                    quote.validity_date,
                    today,
                ),
                quote,
            })
            .collect())
    }

    /// Replaces the header and lines of a pending quote. The number is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the quote is missing or no longer pending, the
    /// issue date leaves the year of its number, validation fails or the
    /// update fails.
    pub async fn update(
        &self,
        id: QuoteId,
        input: &QuoteInput,
        today: NaiveDate,
    ) -> Result<QuoteDetails, QuoteError> {
        let (lines, total) = prepare(input)?;
        let txn = self.db.begin().await?;

        let existing = devis::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .ok_or(QuoteError::NotFound(id))?;
        quote_rules::ensure_pending(quote_rules::effective_status(
            existing.status.into(),
            existing.validity_date,
            today,
        ))?;
        ReconciliationService::ensure_issue_year(
            &existing.number,
            existing.issue_date,
            input.issue_date,
        )?;

        let client_id = input.client_id.into_inner();
        if clients::Entity::find_by_id(client_id).one(&txn).await?.is_none() {
            return Err(QuoteError::ClientNotFound(input.client_id));
        }

        let mut active: devis::ActiveModel = existing.into();
        active.client_id = Set(client_id);
        active.issue_date = Set(input.issue_date);
        active.validity_date = Set(input.validity_date);
        active.total = Set(total);
        active.terms = Set(clean_terms(input.terms.as_deref()));
        active.updated_at = Set(Utc::now());
        let quote = active.update(&txn).await?;

        delete_quote_lines(&txn, quote.id).await?;
        insert_quote_lines(&txn, quote.id, &lines).await?;
        txn.commit().await?;

        tracing::info!(quote_id = quote.id, number = %quote.number, "Quote updated");
        let lines = self.load_lines(quote.id).await?;
        Ok(QuoteDetails {
            status: quote.status.into(),
            quote,
            lines,
        })
    }

    async fn answer(
        &self,
        id: QuoteId,
        today: NaiveDate,
        transition: fn(QuoteStatus) -> Result<QuoteStatus, BillingError>,
    ) -> Result<devis::Model, QuoteError> {
        let existing = devis::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(QuoteError::NotFound(id))?;

        let current =
            quote_rules::effective_status(existing.status.into(), existing.validity_date, today);
        let next = transition(current)?;

        let mut active: devis::ActiveModel = existing.into();
        active.status = Set(next.into());
        active.updated_at = Set(Utc::now());
        let quote = active.update(&self.db).await?;

        tracing::info!(quote_id = quote.id, status = %next, "Quote answered");
        Ok(quote)
    }

    /// Marks a pending quote as accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the quote is missing, already answered or expired.
    pub async fn accept(&self, id: QuoteId, today: NaiveDate) -> Result<devis::Model, QuoteError> {
        self.answer(id, today, quote_rules::accept).await
    }

    /// Marks a pending quote as refused.
    ///
    /// # Errors
    ///
    /// Returns an error if the quote is missing, already answered or expired.
    pub async fn refuse(&self, id: QuoteId, today: NaiveDate) -> Result<devis::Model, QuoteError> {
        self.answer(id, today, quote_rules::refuse).await
    }

    /// Deletes a quote and its lines, unless an invoice was created from it.
    ///
    /// # Errors
    ///
    /// Returns `HasInvoices` with the exact count when invoices refer to it.
    pub async fn delete(&self, id: QuoteId) -> Result<(), QuoteError> {
        let txn = self.db.begin().await?;
        let raw = id.into_inner();

        if devis::Entity::find_by_id(raw).one(&txn).await?.is_none() {
            return Err(QuoteError::NotFound(id));
        }

        let invoices = factures::Entity::find()
            .filter(factures::Column::DevisId.eq(raw))
            .count(&txn)
            .await?;
        if invoices > 0 {
            return Err(QuoteError::HasInvoices(invoices));
        }

        delete_quote_lines(&txn, raw).await?;
        devis::Entity::delete_by_id(raw).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(quote_id = %id, "Quote deleted");
        Ok(())
    }
}
