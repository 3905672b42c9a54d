//! Payment ledger types and derivation rules.
//!
//! A request carries an ordered ledger of [`Payment`] records. The
//! request-level [`PaymentStatus`] is never stored authoritatively on the
//! client; it is derived from the sum of completed ledger entries and
//! reconciled against the server on every refetch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Amount;

/// Share of the total collected up front when the advance option is
/// chosen (70%, rounded half-up to the nearest rupee).
pub const ADVANCE_PERCENT: i64 = 70;

/// Payment option chosen by the client once a request is approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentOption {
    Advance,
    Full,
}

/// Intent behind a single payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Advance,
    Full,
    Remaining,
}

/// Lifecycle of a single payment record. Completed records are immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    Pending,
    Completed,
    Failed,
}

/// Request-level payment progress, derived from the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Partial,
    Completed,
}

/// One entry in a request's payment ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    pub amount: Amount,
    pub status: PaymentState,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    /// Gateway order identifier issued by `create-order`.
    #[serde(default)]
    pub order_id: Option<String>,
    /// Gateway payment identifier issued on checkout completion.
    #[serde(default)]
    pub payment_id: Option<String>,
}

/// Sum of completed ledger entries.
pub fn total_paid(payments: &[Payment]) -> Amount {
    payments
        .iter()
        .filter(|p| p.status == PaymentState::Completed)
        .map(|p| p.amount)
        .sum()
}

/// Amount owed for a payment of the given type against `total`.
///
/// Advance is 70% of the total, rounded half-up to the nearest rupee;
/// full is the total; remaining is the total minus everything already
/// completed in the ledger (never negative).
pub fn compute_amount(payment_type: PaymentType, total: Amount, payments: &[Payment]) -> Amount {
    match payment_type {
        PaymentType::Advance => (total * ADVANCE_PERCENT + 50) / 100,
        PaymentType::Full => total,
        PaymentType::Remaining => (total - total_paid(payments)).max(0),
    }
}

/// Derive the request-level payment status from the ledger.
///
/// Nothing paid derives `pending` (also when no price has been set yet);
/// a partial sum derives `partial`; covering the total derives
/// `completed`.
pub fn derive_status(total: Amount, payments: &[Payment]) -> PaymentStatus {
    let paid = total_paid(payments);
    if paid == 0 {
        PaymentStatus::Pending
    } else if paid >= total {
        PaymentStatus::Completed
    } else {
        PaymentStatus::Partial
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(payment_type: PaymentType, amount: Amount) -> Payment {
        Payment {
            payment_type,
            amount,
            status: PaymentState::Completed,
            paid_at: Some(Utc::now()),
            order_id: Some("order_1".into()),
            payment_id: Some("pay_1".into()),
        }
    }

    fn failed(amount: Amount) -> Payment {
        Payment {
            payment_type: PaymentType::Advance,
            amount,
            status: PaymentState::Failed,
            paid_at: None,
            order_id: None,
            payment_id: None,
        }
    }

    #[test]
    fn test_advance_is_seventy_percent_of_total() {
        assert_eq!(compute_amount(PaymentType::Advance, 10000, &[]), 7000);
    }

    #[test]
    fn test_full_equals_total() {
        assert_eq!(compute_amount(PaymentType::Full, 10000, &[]), 10000);
    }

    #[test]
    fn test_remaining_subtracts_completed_payments() {
        let ledger = vec![completed(PaymentType::Advance, 7000)];
        assert_eq!(compute_amount(PaymentType::Remaining, 10000, &ledger), 3000);
    }

    #[test]
    fn test_advance_rounds_half_up() {
        // 70% of 15 rupees is 10.5; half-up rounds to 11.
        assert_eq!(compute_amount(PaymentType::Advance, 15, &[]), 11);
        // 70% of 12 is 8.4; rounds down to 8.
        assert_eq!(compute_amount(PaymentType::Advance, 12, &[]), 8);
    }

    #[test]
    fn test_remaining_never_negative() {
        let ledger = vec![completed(PaymentType::Full, 12000)];
        assert_eq!(compute_amount(PaymentType::Remaining, 10000, &ledger), 0);
    }

    #[test]
    fn test_failed_payments_do_not_count() {
        let ledger = vec![failed(7000)];
        assert_eq!(total_paid(&ledger), 0);
        assert_eq!(derive_status(10000, &ledger), PaymentStatus::Pending);
    }

    #[test]
    fn test_status_derivation_thresholds() {
        assert_eq!(derive_status(10000, &[]), PaymentStatus::Pending);

        let partial = vec![completed(PaymentType::Advance, 7000)];
        assert_eq!(derive_status(10000, &partial), PaymentStatus::Partial);

        let full = vec![
            completed(PaymentType::Advance, 7000),
            completed(PaymentType::Remaining, 3000),
        ];
        assert_eq!(derive_status(10000, &full), PaymentStatus::Completed);
    }

    #[test]
    fn test_zero_total_with_no_payments_is_pending() {
        // A request whose price has not been set is never "paid".
        assert_eq!(derive_status(0, &[]), PaymentStatus::Pending);
    }

    #[test]
    fn test_completed_iff_paid_covers_total() {
        let ledger = vec![
            completed(PaymentType::Advance, 7000),
            completed(PaymentType::Remaining, 3000),
        ];
        let covers = total_paid(&ledger) >= 10000;
        assert_eq!(
            derive_status(10000, &ledger) == PaymentStatus::Completed,
            covers
        );
    }
}
