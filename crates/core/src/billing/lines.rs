//! Line item arithmetic.
//!
//! Quantities and unit prices are kept exact; rounding to cents happens once
//! per line and once on the grand total.

use facturo_shared::types::{PrestationId, round_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::BillingError;

/// Largest unit price or line total accepted on a line.
///
/// Amounts are persisted as SQLite REAL; up to this magnitude they read back
/// with the same value.
pub const MAX_LINE_AMOUNT: Decimal = Decimal::from_parts(1_215_752_191, 23, 0, false, 2);

/// A line as entered on a quote, invoice or credit note form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineInput {
    /// Label printed on the document.
    pub label: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Catalog item the line was picked from, if any.
    pub prestation_id: Option<PrestationId>,
    /// Quantity (> 0).
    pub quantity: Decimal,
    /// Unit price before tax (>= 0).
    pub unit_price: Decimal,
}

impl LineInput {
    /// Creates a free-text line.
    pub fn new(label: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            label: label.into(),
            description: None,
            prestation_id: None,
            quantity,
            unit_price,
        }
    }
}

/// A validated line with its rounded total and display position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedLine {
    /// Trimmed label.
    pub label: String,
    /// Description, `None` when blank.
    pub description: Option<String>,
    /// Catalog reference.
    pub prestation_id: Option<PrestationId>,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit price.
    pub unit_price: Decimal,
    /// `quantity * unit_price`, rounded to cents.
    pub line_total: Decimal,
    /// Display order, 0-based and contiguous within the document.
    pub position: i32,
}

/// Total of a single line, rounded to cents.
#[must_use]
pub fn line_total(quantity: Decimal, unit_price: Decimal) -> Decimal {
    round_money(quantity * unit_price)
}

/// Validates lines and computes their totals, assigning positions in input order.
///
/// An empty list is accepted here; callers that need at least one line check
/// it themselves.
pub fn compute_lines(inputs: &[LineInput]) -> Result<Vec<ComputedLine>, BillingError> {
    inputs
        .iter()
        .zip(0i32..)
        .enumerate()
        .map(|(idx, (input, position))| {
            let line = idx + 1;
            let label = input.label.trim();
            if label.is_empty() {
                return Err(BillingError::EmptyLabel { line });
            }
            if input.quantity <= Decimal::ZERO {
                return Err(BillingError::NonPositiveQuantity { line });
            }
            if input.unit_price < Decimal::ZERO {
                return Err(BillingError::NegativeUnitPrice { line });
            }
            let total = input
                .quantity
                .checked_mul(input.unit_price)
                .map(round_money)
                .filter(|total| input.unit_price <= MAX_LINE_AMOUNT && *total <= MAX_LINE_AMOUNT)
                .ok_or(BillingError::AmountTooLarge { line })?;

            Ok(ComputedLine {
                label: label.to_string(),
                description: input
                    .description
                    .as_deref()
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(ToString::to_string),
                prestation_id: input.prestation_id,
                quantity: input.quantity,
                unit_price: input.unit_price,
                line_total: total,
                position,
            })
        })
        .collect()
}

/// Grand total of a document: sum of the rounded line totals.
#[must_use]
pub fn document_total(lines: &[ComputedLine]) -> Decimal {
    round_money(lines.iter().map(|l| l.line_total).sum())
}
