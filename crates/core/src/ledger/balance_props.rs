//! Property-based tests for running balances and inventory.
//!
//! The three ledger invariants are checked together: for any reconciled
//! history, every balance is the prefix sum of the canonical chain, and the
//! inventory's face value equals the final balance.

use cashbox_shared::TransactionId;
use chrono::NaiveDate;
use proptest::prelude::*;

use super::balance::{recompute, verify_chain};
use super::inventory::aggregate;
use super::types::{Transaction, TransactionType};
use crate::cash::DenominationBreakdown;

/// Strategy to generate one reconciled transaction with the given id.
fn transaction_strategy(id: i64) -> impl Strategy<Value = Transaction> {
    (
        1u32..=28,
        prop::bool::ANY,
        prop::array::uniform9(0u32..20),
    )
        .prop_filter("breakdown must not be empty", |(_, _, counts)| {
            counts.iter().any(|&c| c > 0)
        })
        .prop_map(move |(day, is_deposit, counts)| {
            let breakdown = DenominationBreakdown::from_counts(counts);
            let transaction_type = if is_deposit {
                TransactionType::Deposit
            } else {
                TransactionType::Withdrawal
            };
            let amount = i64::try_from(breakdown.total_value()).unwrap() * transaction_type.sign();
            Transaction {
                id: TransactionId::new(id),
                date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
                transaction_type,
                amount,
                summary: String::new(),
                memo: String::new(),
                recipient: String::new(),
                breakdown,
                running_balance: 0,
            }
        })
}

/// Strategy to generate a history of up to 40 transactions with unique ids.
fn history_strategy() -> impl Strategy<Value = Vec<Transaction>> {
    (0usize..40).prop_flat_map(|len| {
        (0..len)
            .map(|i| transaction_strategy(i64::try_from(i).unwrap() + 1))
            .collect::<Vec<_>>()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every balance equals the previous balance plus its own amount.
    #[test]
    fn prop_balances_are_prefix_sums(mut history in history_strategy()) {
        recompute(&mut history).unwrap();
        let mut expected = 0i64;
        for (i, tx) in history.iter().enumerate() {
            expected += tx.amount;
            prop_assert_eq!(tx.running_balance, expected);
            if i > 0 {
                let prev = &history[i - 1];
                prop_assert!((prev.date, prev.id) < (tx.date, tx.id));
            }
        }
        prop_assert!(verify_chain(&history).unwrap().is_empty());
    }

    /// A second recompute changes nothing.
    #[test]
    fn prop_recompute_is_idempotent(mut history in history_strategy()) {
        recompute(&mut history).unwrap();
        let snapshot = history.clone();
        prop_assert!(recompute(&mut history).unwrap().is_empty());
        prop_assert_eq!(history, snapshot);
    }

    /// Input order does not affect the assigned balances.
    #[test]
    fn prop_input_order_is_irrelevant(history in history_strategy()) {
        let mut forward = history.clone();
        let mut reversed: Vec<Transaction> = history.into_iter().rev().collect();
        recompute(&mut forward).unwrap();
        recompute(&mut reversed).unwrap();
        prop_assert_eq!(forward, reversed);
    }

    /// Inventory face value equals the final running balance.
    #[test]
    fn prop_inventory_matches_final_balance(mut history in history_strategy()) {
        recompute(&mut history).unwrap();
        let final_balance = history.last().map_or(0, |tx| tx.running_balance);
        prop_assert_eq!(aggregate(&history).total_value(), final_balance);
    }
}
