//! Number formatting, parsing and next-sequence computation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Default zero-padding width of the sequence part.
pub const DEFAULT_MIN_DIGITS: usize = 3;

/// How many times a number assignment is attempted before giving up.
///
/// The second attempt re-reads the persisted maximum after a uniqueness
/// collision at commit.
pub const MAX_ASSIGNMENT_ATTEMPTS: u32 = 2;

/// Kind of numbered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Quote (devis), prefix `DEV`.
    Quote,
    /// Invoice (facture), prefix `FACT`.
    Invoice,
    /// Credit note (avoir), prefix `AV`.
    CreditNote,
}

impl DocumentKind {
    /// Fixed number prefix of this kind.
    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::Quote => "DEV",
            Self::Invoice => "FACT",
            Self::CreditNote => "AV",
        }
    }

    /// Resolves a kind from its prefix.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "DEV" => Some(Self::Quote),
            "FACT" => Some(Self::Invoice),
            "AV" => Some(Self::CreditNote),
            _ => None,
        }
    }

    /// `LIKE` pattern selecting this kind's numbers for a year.
    #[must_use]
    pub fn year_pattern(&self, year: i32) -> String {
        format!("{}-{year}-%", self.prefix())
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quote => write!(f, "quote"),
            Self::Invoice => write!(f, "invoice"),
            Self::CreditNote => write!(f, "credit note"),
        }
    }
}

/// Errors raised while assigning document numbers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberingError {
    /// The sequence for this (kind, year) cannot grow any further.
    #[error("No {kind} number left for {year}")]
    SequenceOverflow {
        /// Document kind.
        kind: DocumentKind,
        /// Year scope.
        year: i32,
    },

    /// A persisted high-water mark does not hold a sequence.
    #[error("Numbering mark {key} is unreadable")]
    UnreadableMark {
        /// Parameter key of the mark.
        key: String,
    },

    /// Every assignment attempt collided with an existing number.
    #[error("Could not assign a unique {kind} number after {attempts} attempts")]
    Exhausted {
        /// Document kind.
        kind: DocumentKind,
        /// Number of attempts made.
        attempts: u32,
    },
}

/// A parsed document number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentNumber {
    /// Document kind (from the prefix).
    pub kind: DocumentKind,
    /// Year scope.
    pub year: i32,
    /// Sequence within (kind, year), starting at 1.
    pub sequence: u32,
}

impl DocumentNumber {
    /// Creates a number.
    #[must_use]
    pub const fn new(kind: DocumentKind, year: i32, sequence: u32) -> Self {
        Self {
            kind,
            year,
            sequence,
        }
    }

    /// Formats with the given minimum sequence width.
    ///
    /// Sequences wider than `min_digits` are printed in full, never truncated.
    #[must_use]
    pub fn format_with(&self, min_digits: usize) -> String {
        format!(
            "{}-{}-{:0>width$}",
            self.kind.prefix(),
            self.year,
            self.sequence,
            width = min_digits
        )
    }

    /// Parses `PREFIX-YEAR-SEQ`. Anything else yields `None`.
    pub fn parse(number: &str) -> Option<Self> {
        let mut parts = number.splitn(3, '-');
        let kind = DocumentKind::from_prefix(parts.next()?)?;
        let year_part = parts.next()?;
        let seq_part = parts.next()?;

        if year_part.is_empty()
            || seq_part.is_empty()
            || !year_part.chars().all(|c| c.is_ascii_digit())
            || !seq_part.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }

        Some(Self {
            kind,
            year: year_part.parse().ok()?,
            sequence: seq_part.parse().ok()?,
        })
    }
}

impl fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with(DEFAULT_MIN_DIGITS))
    }
}

/// Key prefix of the persisted high-water marks. Keys under it belong to
/// number assignment and are not user settings.
pub const HIGH_WATER_PREFIX: &str = "numbering.";

/// Key of the persisted high-water mark for (kind, year).
#[must_use]
pub fn high_water_key(kind: DocumentKind, year: i32) -> String {
    format!("{HIGH_WATER_PREFIX}{}.{year}", kind.prefix())
}

/// True if `key` names a high-water mark.
#[must_use]
pub fn is_high_water_key(key: &str) -> bool {
    key.trim().starts_with(HIGH_WATER_PREFIX)
}

/// Computes the next sequence for (kind, year).
///
/// Takes the maximum sequence among `existing` numbers of that kind and year
/// (not their count, so gaps left by deletions are tolerated) and the
/// persisted high-water mark `floor`, then adds one. Numbers of other kinds or
/// years, and unparseable numbers, are ignored.
pub fn next_sequence<I, S>(
    existing: I,
    kind: DocumentKind,
    year: i32,
    floor: u32,
) -> Result<u32, NumberingError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let max_existing = existing
        .into_iter()
        .filter_map(|n| DocumentNumber::parse(n.as_ref()))
        .filter(|n| n.kind == kind && n.year == year)
        .map(|n| n.sequence)
        .max()
        .unwrap_or(0);

    max_existing
        .max(floor)
        .checked_add(1)
        .ok_or(NumberingError::SequenceOverflow { kind, year })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes() {
        assert_eq!(DocumentKind::Quote.prefix(), "DEV");
        assert_eq!(DocumentKind::Invoice.prefix(), "FACT");
        assert_eq!(DocumentKind::CreditNote.prefix(), "AV");
        assert_eq!(DocumentKind::from_prefix("AV"), Some(DocumentKind::CreditNote));
        assert_eq!(DocumentKind::from_prefix("INV"), None);
    }

    #[test]
    fn test_format() {
        let number = DocumentNumber::new(DocumentKind::Invoice, 2025, 1);
        assert_eq!(number.to_string(), "FACT-2025-001");
        assert_eq!(number.format_with(5), "FACT-2025-00001");
    }

    #[test]
    fn test_format_beyond_padding() {
        let number = DocumentNumber::new(DocumentKind::Invoice, 2025, 1000);
        assert_eq!(number.to_string(), "FACT-2025-1000");
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            DocumentNumber::parse("DEV-2024-042"),
            Some(DocumentNumber::new(DocumentKind::Quote, 2024, 42))
        );
        assert_eq!(DocumentNumber::parse("FACT-2025"), None);
        assert_eq!(DocumentNumber::parse("FACT-2025-"), None);
        assert_eq!(DocumentNumber::parse("FACT-2025-01a"), None);
        assert_eq!(DocumentNumber::parse("XX-2025-001"), None);
        assert_eq!(DocumentNumber::parse("FACT-2025-001-bis"), None);
    }

    #[test]
    fn test_next_sequence_first_of_year() {
        let existing: Vec<&str> = vec![];
        assert_eq!(
            next_sequence(existing, DocumentKind::Invoice, 2025, 0),
            Ok(1)
        );
    }

    #[test]
    fn test_next_sequence_uses_max_not_count() {
        // FACT-2025-002 was deleted
        let existing = ["FACT-2025-001", "FACT-2025-003"];
        assert_eq!(
            next_sequence(existing, DocumentKind::Invoice, 2025, 0),
            Ok(4)
        );
    }

    #[test]
    fn test_next_sequence_scoped_by_kind_and_year() {
        let existing = [
            "FACT-2025-007",
            "DEV-2026-003",
            "AV-2026-009",
            "FACT-2026-002",
            "garbage",
        ];
        assert_eq!(
            next_sequence(existing, DocumentKind::Invoice, 2026, 0),
            Ok(3)
        );
        assert_eq!(next_sequence(existing, DocumentKind::Quote, 2025, 0), Ok(1));
    }

    #[test]
    fn test_next_sequence_respects_high_water_mark() {
        // FACT-2025-005 was the highest number and has been deleted
        let existing = ["FACT-2025-001", "FACT-2025-004"];
        assert_eq!(
            next_sequence(existing, DocumentKind::Invoice, 2025, 5),
            Ok(6)
        );
    }

    #[test]
    fn test_next_sequence_overflow() {
        let existing: [&str; 0] = [];
        assert_eq!(
            next_sequence(existing, DocumentKind::CreditNote, 2025, u32::MAX),
            Err(NumberingError::SequenceOverflow {
                kind: DocumentKind::CreditNote,
                year: 2025
            })
        );
    }

    #[test]
    fn test_high_water_key() {
        assert_eq!(
            high_water_key(DocumentKind::Invoice, 2025),
            "numbering.FACT.2025"
        );
        assert_eq!(DocumentKind::Quote.year_pattern(2025), "DEV-2025-%");
    }

    #[test]
    fn test_is_high_water_key() {
        assert!(is_high_water_key(&high_water_key(DocumentKind::CreditNote, 2026)));
        assert!(is_high_water_key(" numbering.FACT.2025"));
        assert!(!is_high_water_key("billing.payment_terms_days"));
        assert!(!is_high_water_key("company.numbering"));
    }
}
