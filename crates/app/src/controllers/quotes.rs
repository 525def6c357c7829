//! Quotes and their conversion into invoices.

use chrono::NaiveDate;
use facturo_core::billing::{ReconciliationService, quote as quote_rules};
use facturo_db::entities::{devis, factures};
use facturo_db::repositories::{
    InvoiceRepository, PAYMENT_TERMS_DAYS, ParameterRepository, QUOTE_VALIDITY_DAYS, QuoteDetails,
    QuoteInput, QuoteRepository, QuoteSummary,
};
use facturo_shared::types::{ClientId, QuoteId};

use super::{read_or_default, respond, setting_days};
use crate::{AppState, Outcome};

/// Quote controller.
#[derive(Debug, Clone)]
pub struct QuoteController {
    state: AppState,
    quotes: QuoteRepository,
    invoices: InvoiceRepository,
    parameters: ParameterRepository,
}

impl QuoteController {
    /// Creates the controller for the session.
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            quotes: QuoteRepository::new(state.connection()).with_numbering(state.numbering()),
            invoices: InvoiceRepository::new(state.connection()).with_numbering(state.numbering()),
            parameters: ParameterRepository::new(state.connection()),
            state: state.clone(),
        }
    }

    /// Validity date proposed for a quote issued on `issue_date`.
    pub async fn default_validity_date(&self, issue_date: NaiveDate) -> NaiveDate {
        let days = setting_days(
            &self.parameters,
            QUOTE_VALIDITY_DAYS,
            self.state.config.billing.quote_validity_days,
        )
        .await;
        quote_rules::default_validity_date(issue_date, days)
    }

    /// Quotes, newest first, optionally for one client.
    pub async fn list(&self, client_id: Option<ClientId>) -> Vec<QuoteSummary> {
        read_or_default(
            self.quotes.list(client_id, self.state.today()).await,
            "list quotes",
        )
    }

    /// One quote with its lines.
    pub async fn get(&self, id: QuoteId) -> Option<QuoteDetails> {
        read_or_default(self.quotes.get(id, self.state.today()).await, "get quote")
    }

    /// Creates a numbered pending quote.
    pub async fn create(&self, input: &QuoteInput) -> Outcome<QuoteDetails> {
        respond(self.quotes.create(input).await, "create quote", |q| {
            format!("Quote {} created successfully", q.quote.number)
        })
    }

    /// Replaces the content of a pending quote.
    pub async fn update(&self, id: QuoteId, input: &QuoteInput) -> Outcome<QuoteDetails> {
        respond(
            self.quotes.update(id, input, self.state.today()).await,
            "update quote",
            |q| format!("Quote {} updated successfully", q.quote.number),
        )
    }

    /// Marks a pending quote as accepted.
    pub async fn accept(&self, id: QuoteId) -> Outcome<devis::Model> {
        respond(
            self.quotes.accept(id, self.state.today()).await,
            "accept quote",
            |q| format!("Quote {} accepted", q.number),
        )
    }

    /// Marks a pending quote as refused.
    pub async fn refuse(&self, id: QuoteId) -> Outcome<devis::Model> {
        respond(
            self.quotes.refuse(id, self.state.today()).await,
            "refuse quote",
            |q| format!("Quote {} refused", q.number),
        )
    }

    /// Creates a draft invoice from an accepted quote, issued today with the
    /// current payment terms.
    pub async fn convert_to_invoice(&self, id: QuoteId) -> Outcome<factures::Model> {
        let today = self.state.today();
        let days = setting_days(
            &self.parameters,
            PAYMENT_TERMS_DAYS,
            self.state.config.billing.payment_terms_days,
        )
        .await;
        let due_date = ReconciliationService::default_due_date(today, days);
        respond(
            self.invoices.create_from_quote(id, today, due_date).await,
            "convert quote",
            |invoice| format!("Invoice {} created from the quote", invoice.number),
        )
    }

    /// Deletes a quote no invoice was created from.
    pub async fn delete(&self, id: QuoteId) -> Outcome<()> {
        respond(self.quotes.delete(id).await, "delete quote", |_| {
            "Quote deleted successfully".to_string()
        })
    }
}
