//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod client;
pub mod invoice;
mod lines;
pub mod numbering;
pub mod parameter;
pub mod prestation;
pub mod quote;
pub mod statistics;

pub use client::{ClientError, ClientFilter, ClientRepository, display_name_of, profile_of};
pub use invoice::{
    CreditNoteDetails, CreditNoteInput, CreditNoteReceipt, InvoiceDetails, InvoiceError,
    InvoiceFilter, InvoiceInput, InvoiceRepository, InvoiceSummary, PaymentInput, PaymentReceipt,
};
pub use numbering::{DocumentNumbering, NumberCollision, is_unique_violation, with_number_retry};
pub use parameter::{
    PAYMENT_TERMS_DAYS, ParameterError, ParameterRepository, ParameterValue, QUOTE_VALIDITY_DAYS,
};
pub use prestation::{PrestationError, PrestationInput, PrestationRepository};
pub use quote::{QuoteDetails, QuoteError, QuoteInput, QuoteRepository, QuoteSummary};
pub use statistics::{Statistics, StatisticsRepository, YearlyRevenue};
