//! Property-based tests for ReconciliationService.
//!
//! - Balance invariant: paid + remaining + credited == total after any event sequence
//! - Rejected events leave nothing to persist
//! - Overdue derivation is idempotent and never touches paid/cancelled

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::InvoiceBalance;
use super::error::BillingError;
use super::service::ReconciliationService;
use super::types::InvoiceStatus;

/// Strategy to generate positive amounts (0.01 to 1,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

#[derive(Debug, Clone)]
enum Event {
    Payment(Decimal),
    Credit(Decimal),
}

fn event() -> impl Strategy<Value = Event> {
    prop_oneof![
        3 => positive_amount().prop_map(Event::Payment),
        1 => positive_amount().prop_map(Event::Credit),
    ]
}

fn any_status() -> impl Strategy<Value = InvoiceStatus> {
    prop_oneof![
        Just(InvoiceStatus::Draft),
        Just(InvoiceStatus::Issued),
        Just(InvoiceStatus::Paid),
        Just(InvoiceStatus::PartiallyPaid),
        Just(InvoiceStatus::Overdue),
        Just(InvoiceStatus::Cancelled),
    ]
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// paid + remaining + credited == total after every accepted or rejected event.
    #[test]
    fn prop_balance_invariant(
        total in positive_amount(),
        events in prop::collection::vec(event(), 0..20),
    ) {
        let mut status = InvoiceStatus::Issued;
        let mut balance = InvoiceBalance::new(total, Decimal::ZERO, Decimal::ZERO);

        for event in events {
            let result = match event {
                Event::Payment(amount) => {
                    ReconciliationService::record_payment(status, &balance, amount)
                }
                Event::Credit(amount) => {
                    ReconciliationService::apply_credit_note(status, &balance, amount, "motif")
                }
            };
            if let Ok(reconciled) = result {
                status = reconciled.status;
                balance = reconciled.balance;
            }

            prop_assert_eq!(balance.paid + balance.remaining() + balance.credited, balance.total);
            prop_assert!(balance.paid <= balance.total);
            prop_assert!(balance.credited <= balance.total);
        }
    }

    /// Status after an accepted payment follows the balance.
    #[test]
    fn prop_payment_status_follows_balance(
        total in positive_amount(),
        fraction in 1u32..=100,
    ) {
        let amount = (total * Decimal::from(fraction) / Decimal::from(100)).round_dp(2);
        prop_assume!(amount > Decimal::ZERO);

        let balance = InvoiceBalance::new(total, Decimal::ZERO, Decimal::ZERO);
        let reconciled =
            ReconciliationService::record_payment(InvoiceStatus::Issued, &balance, amount).unwrap();

        if amount == total {
            prop_assert_eq!(reconciled.status, InvoiceStatus::Paid);
        } else {
            prop_assert_eq!(reconciled.status, InvoiceStatus::PartiallyPaid);
        }
        prop_assert_eq!(reconciled.balance.remaining(), total - amount);
    }

    /// Any payment above the outstanding balance is refused.
    #[test]
    fn prop_overpayment_rejected(
        total in positive_amount(),
        extra in positive_amount(),
    ) {
        let balance = InvoiceBalance::new(total, Decimal::ZERO, Decimal::ZERO);
        let result =
            ReconciliationService::record_payment(InvoiceStatus::Issued, &balance, total + extra);
        let is_overpayment = matches!(result, Err(BillingError::Overpayment { .. }));
        prop_assert!(is_overpayment);
    }

    /// recompute_overdue(recompute_overdue(s)) == recompute_overdue(s), and
    /// paid/cancelled are never changed.
    #[test]
    fn prop_overdue_idempotent(
        status in any_status(),
        due_offset in -60i64..60,
        today_offset in -60i64..60,
    ) {
        let due = base_date() + Duration::days(due_offset);
        let today = base_date() + Duration::days(today_offset);

        let once = ReconciliationService::recompute_overdue(status, due, today);
        let twice = ReconciliationService::recompute_overdue(once, due, today);
        prop_assert_eq!(once, twice);

        if matches!(status, InvoiceStatus::Paid | InvoiceStatus::Cancelled | InvoiceStatus::Draft) {
            prop_assert_eq!(once, status);
        }
    }
}
