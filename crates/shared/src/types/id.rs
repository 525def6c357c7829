//! Typed IDs for type-safe entity references.
//!
//! Rows use SQLite integer primary keys; wrapping them prevents accidentally
//! passing a `ClientId` where an `InvoiceId` is expected.

use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            /// Creates an ID from a raw primary key.
            #[must_use]
            pub const fn new(raw: i32) -> Self {
                Self(raw)
            }

            /// Returns the raw primary key.
            #[must_use]
            pub const fn into_inner(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(raw: i32) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

typed_id!(ClientId, "Unique identifier for a client.");
typed_id!(PrestationId, "Unique identifier for a catalog item.");
typed_id!(QuoteId, "Unique identifier for a quote (devis).");
typed_id!(InvoiceId, "Unique identifier for an invoice (facture).");
typed_id!(PaymentId, "Unique identifier for a payment.");
typed_id!(CreditNoteId, "Unique identifier for a credit note (avoir).");

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
