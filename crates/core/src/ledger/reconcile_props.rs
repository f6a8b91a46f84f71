//! Property-based tests for denomination reconciliation.

use chrono::NaiveDate;
use proptest::prelude::*;

use super::error::LedgerError;
use super::reconcile::{MismatchError, reconcile, validate_entry};
use super::types::{TransactionDraft, TransactionType};
use crate::cash::{DENOMINATION_COUNT, DenominationBreakdown};

/// Strategy to generate a breakdown with realistic counts.
fn breakdown_strategy() -> impl Strategy<Value = DenominationBreakdown> {
    prop::array::uniform9(0u32..200).prop_map(DenominationBreakdown::from_counts)
}

/// Strategy to generate a transaction type.
fn type_strategy() -> impl Strategy<Value = TransactionType> {
    prop_oneof![Just(TransactionType::Deposit), Just(TransactionType::Withdrawal)]
}

fn signed_total(ty: TransactionType, breakdown: &DenominationBreakdown) -> i64 {
    i64::try_from(breakdown.total_value()).unwrap() * ty.sign()
}

fn make_draft(ty: TransactionType, amount: i64) -> TransactionDraft {
    TransactionDraft {
        date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        transaction_type: ty,
        amount,
        summary: String::new(),
        memo: String::new(),
        recipient: String::new(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A breakdown always reconciles against its own signed total.
    #[test]
    fn prop_breakdown_reconciles_with_own_total(
        ty in type_strategy(),
        breakdown in breakdown_strategy(),
    ) {
        prop_assert!(reconcile(signed_total(ty, &breakdown), &breakdown).is_ok());
    }

    /// Any drift in the amount is reported with both totals.
    #[test]
    fn prop_drift_is_reported(
        breakdown in breakdown_strategy(),
        drift in 1i64..10_000,
    ) {
        let total = i64::try_from(breakdown.total_value()).unwrap();
        let amount = total + drift;
        let result = reconcile(amount, &breakdown);
        prop_assert_eq!(
            result,
            Err(MismatchError { expected: amount.unsigned_abs(), actual: breakdown.total_value() })
        );
    }

    /// Valid entries pass; a flipped sign is rejected before reconciliation.
    #[test]
    fn prop_sign_rule(
        ty in type_strategy(),
        counts in prop::array::uniform9(0u32..50),
    ) {
        let mut counts: [u32; DENOMINATION_COUNT] = counts;
        counts[0] += 1;
        let breakdown = DenominationBreakdown::from_counts(counts);
        let amount = signed_total(ty, &breakdown);

        prop_assert!(validate_entry(&make_draft(ty, amount), &breakdown).is_ok());
        let flipped = validate_entry(&make_draft(ty, -amount), &breakdown);
        prop_assert!(
            matches!(flipped, Err(LedgerError::InvalidSign { .. })),
            "flipped sign should be rejected, got: {:?}",
            flipped
        );
    }
}
