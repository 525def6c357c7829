//! Enums stored as text columns.

use facturo_core::billing::{
    InvoiceStatus as CoreInvoiceStatus, PaymentMethod as CorePaymentMethod,
    QuoteStatus as CoreQuoteStatus,
};
use facturo_core::client::ClientKind as CoreClientKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Client kind column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum ClientKind {
    /// Private person.
    #[sea_orm(string_value = "individual")]
    Individual,
    /// Company or association.
    #[sea_orm(string_value = "organization")]
    Organization,
}

/// Quote status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum QuoteStatus {
    /// Awaiting answer.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Accepted.
    #[sea_orm(string_value = "accepted")]
    Accepted,
    /// Refused.
    #[sea_orm(string_value = "refused")]
    Refused,
    /// Expired.
    #[sea_orm(string_value = "expired")]
    Expired,
}

/// Invoice status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum InvoiceStatus {
    /// Draft.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Issued.
    #[sea_orm(string_value = "issued")]
    Issued,
    /// Paid.
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Partially paid.
    #[sea_orm(string_value = "partially_paid")]
    PartiallyPaid,
    /// Overdue.
    #[sea_orm(string_value = "overdue")]
    Overdue,
    /// Cancelled.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Payment method column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum PaymentMethod {
    /// Cash.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Cheque.
    #[sea_orm(string_value = "cheque")]
    Cheque,
    /// Bank transfer.
    #[sea_orm(string_value = "transfer")]
    Transfer,
    /// Card.
    #[sea_orm(string_value = "card")]
    Card,
    /// Stripe.
    #[sea_orm(string_value = "stripe")]
    Stripe,
    /// PayPal.
    #[sea_orm(string_value = "paypal")]
    Paypal,
    /// Other.
    #[sea_orm(string_value = "other")]
    Other,
}

/// Setting value type column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ValueType {
    /// Free text.
    #[sea_orm(string_value = "string")]
    Text,
    /// Integer.
    #[sea_orm(string_value = "integer")]
    Integer,
    /// Decimal number.
    #[sea_orm(string_value = "float")]
    Float,
    /// `true` / `false`.
    #[sea_orm(string_value = "boolean")]
    Boolean,
    /// JSON document.
    #[sea_orm(string_value = "json")]
    Json,
}

macro_rules! mirror_enum {
    ($db:ident, $core:ident, [$($variant:ident),+ $(,)?]) => {
        impl From<$core> for $db {
            fn from(value: $core) -> Self {
                match value {
                    $($core::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$db> for $core {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant,)+
                }
            }
        }
    };
}

mirror_enum!(ClientKind, CoreClientKind, [Individual, Organization]);
mirror_enum!(QuoteStatus, CoreQuoteStatus, [Pending, Accepted, Refused, Expired]);
mirror_enum!(
    InvoiceStatus,
    CoreInvoiceStatus,
    [Draft, Issued, Paid, PartiallyPaid, Overdue, Cancelled]
);
mirror_enum!(
    PaymentMethod,
    CorePaymentMethod,
    [Cash, Cheque, Transfer, Card, Stripe, Paypal, Other]
);

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ActiveEnum, Iterable};

    #[test]
    fn test_string_values_match_core() {
        for status in InvoiceStatus::iter() {
            let core: CoreInvoiceStatus = status.into();
            assert_eq!(status.to_value(), core.as_str());
            assert_eq!(InvoiceStatus::from(core), status);
        }
        for method in PaymentMethod::iter() {
            let core: CorePaymentMethod = method.into();
            assert_eq!(method.to_value(), core.as_str());
        }
        for status in QuoteStatus::iter() {
            let core: CoreQuoteStatus = status.into();
            assert_eq!(status.to_value(), core.as_str());
        }
        for kind in ClientKind::iter() {
            let core: CoreClientKind = kind.into();
            assert_eq!(kind.to_value(), core.as_str());
        }
    }
}
