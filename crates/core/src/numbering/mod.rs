//! Document numbering.
//!
//! Quotes, invoices and credit notes carry human-readable numbers of the form
//! `{PREFIX}-{year}-{sequence}`, e.g. `FACT-2025-001`. Sequences are scoped
//! per (kind, year) and are append-only: a number, once handed out, is never
//! handed out again.
//!
//! # Modules
//!
//! - `sequence` - Number formatting, parsing and next-sequence computation

pub mod sequence;

#[cfg(test)]
mod sequence_props;

pub use sequence::{
    DEFAULT_MIN_DIGITS, DocumentKind, DocumentNumber, HIGH_WATER_PREFIX, MAX_ASSIGNMENT_ATTEMPTS,
    NumberingError, high_water_key, is_high_water_key, next_sequence,
};
