//! Property-based tests for document numbering.

use proptest::prelude::*;

use crate::numbering::sequence::{DocumentKind, DocumentNumber, next_sequence};

fn arb_kind() -> impl Strategy<Value = DocumentKind> {
    prop_oneof![
        Just(DocumentKind::Quote),
        Just(DocumentKind::Invoice),
        Just(DocumentKind::CreditNote),
    ]
}

/// Simulates `count` creations in a row, each reading the numbers issued so far.
fn issue(kind: DocumentKind, year: i32, count: usize, existing: &mut Vec<String>) -> Vec<String> {
    let mut issued = Vec::with_capacity(count);
    for _ in 0..count {
        let seq = next_sequence(existing.iter(), kind, year, 0).unwrap();
        let number = DocumentNumber::new(kind, year, seq).to_string();
        existing.push(number.clone());
        issued.push(number);
    }
    issued
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Numbers created in sequence within a year are distinct and strictly increasing.
    #[test]
    fn prop_sequential_numbers_unique_and_increasing(
        kind in arb_kind(),
        year in 2000i32..2100,
        count in 1usize..60,
    ) {
        let mut existing = Vec::new();
        let issued = issue(kind, year, count, &mut existing);

        let sequences: Vec<u32> = issued
            .iter()
            .map(|n| DocumentNumber::parse(n).unwrap().sequence)
            .collect();
        for pair in sequences.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        prop_assert_eq!(sequences[0], 1);

        let mut deduped = issued.clone();
        deduped.sort();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), issued.len());
    }

    /// Sequences of two different years are independent.
    #[test]
    fn prop_year_scoping(
        kind in arb_kind(),
        year in 2000i32..2100,
        count in 0usize..40,
    ) {
        let mut existing = Vec::new();
        issue(kind, year, count, &mut existing);

        let next_year = next_sequence(existing.iter(), kind, year + 1, 0).unwrap();
        prop_assert_eq!(next_year, 1);
        prop_assert_eq!(
            DocumentNumber::new(kind, year + 1, next_year).to_string(),
            format!("{}-{}-001", kind.prefix(), year + 1)
        );
    }

    /// Deleting any already-issued document never lets its number come back
    /// while the high-water mark is honoured.
    #[test]
    fn prop_deleted_numbers_not_reused(
        kind in arb_kind(),
        count in 1usize..30,
        removed in any::<prop::sample::Index>(),
    ) {
        let mut existing = Vec::new();
        let issued = issue(kind, 2025, count, &mut existing);
        let high_water = u32::try_from(count).unwrap();

        let victim = removed.index(existing.len());
        existing.remove(victim);

        let next = next_sequence(existing.iter(), kind, 2025, high_water).unwrap();
        let number = DocumentNumber::new(kind, 2025, next).to_string();
        prop_assert!(!issued.contains(&number));
    }

    /// Parsing what we format gives back the same number, even past the padding width.
    #[test]
    fn prop_parse_format(kind in arb_kind(), year in 1000i32..10000, seq in 1u32..100_000) {
        let number = DocumentNumber::new(kind, year, seq);
        prop_assert_eq!(DocumentNumber::parse(&number.to_string()), Some(number));
    }
}
