//! Running balance calculation.
//!
//! Transactions are totally ordered by `(date, id)`. Ids grow with insertion,
//! so two transactions booked on the same date keep the order they were
//! entered in. The running balance of a transaction is the sum of every amount
//! up to and including it in that order, starting from zero.

use cashbox_shared::TransactionId;
use serde::Serialize;
use thiserror::Error;

use super::types::Transaction;

/// A running balance that must be rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceChange {
    /// Transaction whose balance changed.
    pub id: TransactionId,
    /// Balance currently stored.
    pub previous: i64,
    /// Balance it should have.
    pub current: i64,
}

/// The chain left the `i64` range at this transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[error("Running balance overflows at transaction {id}")]
pub struct BalanceOverflow {
    /// First transaction whose balance cannot be represented.
    pub id: TransactionId,
}

/// Sorts transactions into canonical `(date, id)` order.
pub fn canonical_order(transactions: &mut [Transaction]) {
    transactions.sort_by_key(|tx| (tx.date, tx.id));
}

/// Recomputes every running balance in one linear pass.
///
/// The slice is left in canonical order with all balances assigned. Only the
/// transactions whose balance actually moved are returned, so storage can
/// write back just those rows. Calling this again on its own output yields no
/// changes.
///
/// # Errors
///
/// [`BalanceOverflow`] if a prefix sum leaves the `i64` range. Balances
/// assigned before that point are kept; nothing after it is touched.
pub fn recompute(transactions: &mut [Transaction]) -> Result<Vec<BalanceChange>, BalanceOverflow> {
    canonical_order(transactions);

    let mut balance: i64 = 0;
    let mut changes = Vec::new();
    for tx in transactions.iter_mut() {
        balance = balance
            .checked_add(tx.amount)
            .ok_or(BalanceOverflow { id: tx.id })?;
        if tx.running_balance != balance {
            changes.push(BalanceChange {
                id: tx.id,
                previous: tx.running_balance,
                current: balance,
            });
            tx.running_balance = balance;
        }
    }
    Ok(changes)
}

/// Reports stored balances that disagree with the chain, without modifying
/// anything. Input order does not matter.
///
/// # Errors
///
/// [`BalanceOverflow`] if a prefix sum leaves the `i64` range.
pub fn verify_chain(transactions: &[Transaction]) -> Result<Vec<BalanceChange>, BalanceOverflow> {
    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by_key(|tx| (tx.date, tx.id));

    let mut balance: i64 = 0;
    let mut stale = Vec::new();
    for tx in ordered {
        balance = balance
            .checked_add(tx.amount)
            .ok_or(BalanceOverflow { id: tx.id })?;
        if tx.running_balance != balance {
            stale.push(BalanceChange {
                id: tx.id,
                previous: tx.running_balance,
                current: balance,
            });
        }
    }
    Ok(stale)
}
