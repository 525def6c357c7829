//! Transactional document number assignment.
//!
//! A number is reserved inside the transaction that inserts the document:
//! the next sequence is read from the persisted numbers and the per-year
//! high-water mark, and the mark is advanced in that same transaction.
//! Creation runs through [`with_number_retry`] so that a uniqueness
//! collision at insert or commit gets exactly one fresh attempt.

use std::future::Future;

use facturo_core::numbering::{
    DEFAULT_MIN_DIGITS, DocumentKind, DocumentNumber, MAX_ASSIGNMENT_ATTEMPTS, NumberingError,
    high_water_key, next_sequence,
};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect, SqlErr};

use super::parameter::{ParameterError, ParameterValue, read_value, write_value};
use crate::entities::{avoirs, devis, factures};

/// Errors that can be told apart as a number collision.
pub trait NumberCollision {
    /// True when the failure is a uniqueness violation worth one retry.
    fn is_number_collision(&self) -> bool;
}

/// True if the database rejected a duplicate value.
#[must_use]
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Number formatting settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentNumbering {
    min_digits: usize,
}

impl Default for DocumentNumbering {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DIGITS)
    }
}

impl DocumentNumbering {
    /// Creates numbering settings with the given sequence width.
    #[must_use]
    pub const fn new(min_digits: usize) -> Self {
        Self { min_digits }
    }

    /// Reserves the next number of `kind` for `year` on `conn`.
    ///
    /// `conn` must be the transaction that inserts the document.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or the sequence is exhausted.
    pub async fn reserve<C, E>(&self, conn: &C, kind: DocumentKind, year: i32) -> Result<String, E>
    where
        C: ConnectionTrait,
        E: From<DbErr> + From<NumberingError>,
    {
        let existing = existing_numbers(conn, kind, year).await?;
        let key = high_water_key(kind, year);
        let floor = read_high_water::<C, E>(conn, &key).await?;

        let sequence = next_sequence(&existing, kind, year, floor)?;
        write_value(conn, &key, &ParameterValue::Integer(i64::from(sequence))).await?;

        let number = DocumentNumber::new(kind, year, sequence).format_with(self.min_digits);
        tracing::debug!(number = %number, "Reserved document number");
        Ok(number)
    }
}

/// Numbers of `kind` already persisted for `year`.
async fn existing_numbers<C>(conn: &C, kind: DocumentKind, year: i32) -> Result<Vec<String>, DbErr>
where
    C: ConnectionTrait,
{
    let pattern = kind.year_pattern(year);
    match kind {
        DocumentKind::Quote => {
            devis::Entity::find()
                .select_only()
                .column(devis::Column::Number)
                .filter(devis::Column::Number.like(pattern))
                .into_tuple()
                .all(conn)
                .await
        }
        DocumentKind::Invoice => {
            factures::Entity::find()
                .select_only()
                .column(factures::Column::Number)
                .filter(factures::Column::Number.like(pattern))
                .into_tuple()
                .all(conn)
                .await
        }
        DocumentKind::CreditNote => {
            avoirs::Entity::find()
                .select_only()
                .column(avoirs::Column::Number)
                .filter(avoirs::Column::Number.like(pattern))
                .into_tuple()
                .all(conn)
                .await
        }
    }
}

/// Persisted mark for `key`, 0 when none was written yet.
async fn read_high_water<C, E>(conn: &C, key: &str) -> Result<u32, E>
where
    C: ConnectionTrait,
    E: From<DbErr> + From<NumberingError>,
{
    let unreadable = || NumberingError::UnreadableMark {
        key: key.to_string(),
    };
    match read_value(conn, key).await {
        Ok(None) => Ok(0),
        Ok(Some(ParameterValue::Integer(value))) => {
            u32::try_from(value).map_err(|_| unreadable().into())
        }
        Ok(Some(_)) => Err(unreadable().into()),
        Err(ParameterError::Database(e)) => Err(e.into()),
        Err(e) => {
            tracing::error!(error = %e, key, "Numbering mark is unreadable");
            Err(unreadable().into())
        }
    }
}

/// Runs a numbered creation, retrying once on a number collision.
///
/// Each call of `attempt` must open, use and commit its own transaction so
/// that a failed attempt is fully rolled back before the next one reads the
/// updated maximum. A second collision fails with
/// [`NumberingError::Exhausted`]; other errors are returned as is.
///
/// # Errors
///
/// Returns the attempt's error, or `Exhausted` after repeated collisions.
pub async fn with_number_retry<T, E, F, Fut>(kind: DocumentKind, mut attempt: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: NumberCollision + From<NumberingError>,
{
    let mut attempts = 0;
    loop {
        attempts += 1;
        match attempt().await {
            Err(e) if e.is_number_collision() => {
                if attempts >= MAX_ASSIGNMENT_ATTEMPTS {
                    tracing::error!(kind = %kind, attempts, "Document number assignment exhausted");
                    return Err(NumberingError::Exhausted { kind, attempts }.into());
                }
                tracing::warn!(
                    kind = %kind,
                    attempt = attempts,
                    "Document number collision, retrying"
                );
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, PartialEq)]
    enum FakeError {
        Collision,
        Other,
        Numbering(NumberingError),
    }

    impl NumberCollision for FakeError {
        fn is_number_collision(&self) -> bool {
            matches!(self, Self::Collision)
        }
    }

    impl From<NumberingError> for FakeError {
        fn from(e: NumberingError) -> Self {
            Self::Numbering(e)
        }
    }

    #[tokio::test]
    async fn test_retry_succeeds_on_second_attempt() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let attempt = || async move {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(FakeError::Collision)
            } else {
                Ok("FACT-2025-002")
            }
        };
        let result = with_number_retry(DocumentKind::Invoice, attempt).await;

        assert_eq!(result, Ok("FACT-2025-002"));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_two_collisions() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), FakeError> = with_number_retry(DocumentKind::Quote, || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(FakeError::Collision)
        })
        .await;

        assert_eq!(
            result,
            Err(FakeError::Numbering(NumberingError::Exhausted {
                kind: DocumentKind::Quote,
                attempts: 2
            }))
        );
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_other_errors_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let attempt = || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(FakeError::Other)
        };
        let result = with_number_retry(DocumentKind::CreditNote, attempt).await;

        assert_eq!(result, Err(FakeError::Other));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
