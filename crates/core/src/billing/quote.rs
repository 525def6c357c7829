//! Quote lifecycle: `pending -> accepted | refused | expired`.

use chrono::{Days, NaiveDate};

use super::error::BillingError;
use super::types::QuoteStatus;

/// Status as seen on `today`: a pending quote past its validity date reads
/// as expired. Answered quotes never change.
#[must_use]
pub fn effective_status(
    stored: QuoteStatus,
    validity_date: NaiveDate,
    today: NaiveDate,
) -> QuoteStatus {
    match stored {
        QuoteStatus::Pending if validity_date < today => QuoteStatus::Expired,
        _ => stored,
    }
}

/// Fails unless the quote can still be edited or answered.
pub fn ensure_pending(status: QuoteStatus) -> Result<(), BillingError> {
    if status == QuoteStatus::Pending {
        Ok(())
    } else {
        Err(BillingError::QuoteNotPending(status))
    }
}

/// `pending -> accepted`.
pub fn accept(status: QuoteStatus) -> Result<QuoteStatus, BillingError> {
    ensure_pending(status).map(|()| QuoteStatus::Accepted)
}

/// `pending -> refused`.
pub fn refuse(status: QuoteStatus) -> Result<QuoteStatus, BillingError> {
    ensure_pending(status).map(|()| QuoteStatus::Refused)
}

/// Fails unless the quote may be turned into an invoice.
pub fn ensure_convertible(status: QuoteStatus) -> Result<(), BillingError> {
    if status == QuoteStatus::Accepted {
        Ok(())
    } else {
        Err(BillingError::QuoteNotAccepted(status))
    }
}

/// Default validity date: issue date plus the validity period.
#[must_use]
pub fn default_validity_date(issue_date: NaiveDate, validity_days: u32) -> NaiveDate {
    issue_date
        .checked_add_days(Days::new(u64::from(validity_days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Checks that the validity date is not before the issue date.
pub fn validate_dates(issue_date: NaiveDate, validity_date: NaiveDate) -> Result<(), BillingError> {
    if validity_date < issue_date {
        Err(BillingError::ValidityBeforeIssue)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_effective_status() {
        let validity = date(2025, 3, 31);
        assert_eq!(
            effective_status(QuoteStatus::Pending, validity, date(2025, 3, 31)),
            QuoteStatus::Pending
        );
        assert_eq!(
            effective_status(QuoteStatus::Pending, validity, date(2025, 4, 1)),
            QuoteStatus::Expired
        );
        assert_eq!(
            effective_status(QuoteStatus::Accepted, validity, date(2025, 4, 1)),
            QuoteStatus::Accepted
        );
    }

    #[test]
    fn test_answers_only_from_pending() {
        assert_eq!(accept(QuoteStatus::Pending), Ok(QuoteStatus::Accepted));
        assert_eq!(refuse(QuoteStatus::Pending), Ok(QuoteStatus::Refused));
        assert_eq!(
            accept(QuoteStatus::Expired),
            Err(BillingError::QuoteNotPending(QuoteStatus::Expired))
        );
        assert_eq!(
            refuse(QuoteStatus::Accepted),
            Err(BillingError::QuoteNotPending(QuoteStatus::Accepted))
        );
    }

    #[test]
    fn test_only_accepted_converts() {
        assert!(ensure_convertible(QuoteStatus::Accepted).is_ok());
        assert_eq!(
            ensure_convertible(QuoteStatus::Pending),
            Err(BillingError::QuoteNotAccepted(QuoteStatus::Pending))
        );
    }

    #[test]
    fn test_validity_dates() {
        let issue = date(2025, 1, 1);
        assert_eq!(default_validity_date(issue, 90), date(2025, 4, 1));
        assert!(validate_dates(issue, issue).is_ok());
        assert_eq!(
            validate_dates(issue, date(2024, 12, 31)),
            Err(BillingError::ValidityBeforeIssue)
        );
    }
}
