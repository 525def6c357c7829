//! Invoice balance derived from payments and credit notes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Financial position of an invoice.
///
/// Never stored: always rebuilt from the invoice total, its payments and its
/// credit notes, so it cannot drift from the underlying rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvoiceBalance {
    /// Invoice total before tax.
    pub total: Decimal,
    /// Sum of recorded payments.
    pub paid: Decimal,
    /// Sum of credit note magnitudes (credit notes are stored negative).
    pub credited: Decimal,
}

impl InvoiceBalance {
    /// Creates a balance from already-summed figures.
    #[must_use]
    pub const fn new(total: Decimal, paid: Decimal, credited: Decimal) -> Self {
        Self {
            total,
            paid,
            credited,
        }
    }

    /// Builds a balance from individual payment and credit note amounts.
    ///
    /// Credit note amounts may be given with either sign.
    pub fn from_parts<P, C>(total: Decimal, payments: P, credit_notes: C) -> Self
    where
        P: IntoIterator<Item = Decimal>,
        C: IntoIterator<Item = Decimal>,
    {
        Self {
            total,
            paid: payments.into_iter().sum(),
            credited: credit_notes.into_iter().map(|a| a.abs()).sum(),
        }
    }

    /// `total - paid - credited`. Negative when credit notes exceed what was still owed.
    #[must_use]
    pub fn remaining(&self) -> Decimal {
        self.total - self.paid - self.credited
    }

    /// What the client still owes (never negative).
    #[must_use]
    pub fn outstanding(&self) -> Decimal {
        self.remaining().max(Decimal::ZERO)
    }

    /// What is owed back to the client (never negative).
    #[must_use]
    pub fn refund_due(&self) -> Decimal {
        (-self.remaining()).max(Decimal::ZERO)
    }

    /// Amount that can still be credited: `total - credited`.
    #[must_use]
    pub fn creditable(&self) -> Decimal {
        self.total - self.credited
    }

    /// True once payments and credit notes cover the total.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.remaining() <= Decimal::ZERO
    }

    /// Balance after an additional payment.
    #[must_use]
    pub fn with_payment(&self, amount: Decimal) -> Self {
        Self {
            paid: self.paid + amount,
            ..*self
        }
    }

    /// Balance after an additional credit note of `amount` (magnitude).
    #[must_use]
    pub fn with_credit(&self, amount: Decimal) -> Self {
        Self {
            credited: self.credited + amount.abs(),
            ..*self
        }
    }
}
