//! Full-history consistency audit.

use cashbox_shared::TransactionId;
use serde::Serialize;

use super::balance::{BalanceChange, BalanceOverflow, verify_chain};
use super::reconcile::reconcile;
use super::types::{Transaction, TransactionType};

/// A stored transaction whose breakdown does not back its amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnreconciledRow {
    /// Offending transaction.
    pub id: TransactionId,
    /// `|amount|`.
    pub expected: u64,
    /// Breakdown face value.
    pub actual: u64,
}

/// A stored transaction whose amount has the wrong sign for its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SignViolation {
    /// Offending transaction.
    pub id: TransactionId,
    /// Stored type.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Stored amount.
    pub amount: i64,
}

/// Outcome of checking every stored transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    /// Number of transactions examined.
    pub checked: usize,
    /// Rows failing reconciliation.
    pub unreconciled: Vec<UnreconciledRow>,
    /// Rows failing the sign rule.
    pub sign_violations: Vec<SignViolation>,
    /// Rows whose stored running balance is stale.
    pub stale_balances: Vec<BalanceChange>,
}

impl AuditReport {
    /// Returns true when nothing was found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unreconciled.is_empty() && self.sign_violations.is_empty() && self.stale_balances.is_empty()
    }
}

/// Checks reconciliation, sign and balance chain over the whole history.
///
/// # Errors
///
/// [`BalanceOverflow`] when the history cannot be summed at all.
pub fn check(transactions: &[Transaction]) -> Result<AuditReport, BalanceOverflow> {
    let mut report = AuditReport {
        checked: transactions.len(),
        stale_balances: verify_chain(transactions)?,
        ..AuditReport::default()
    };

    for tx in transactions {
        if !tx.transaction_type.accepts(tx.amount) {
            report.sign_violations.push(SignViolation {
                id: tx.id,
                transaction_type: tx.transaction_type,
                amount: tx.amount,
            });
        }
        if let Err(mismatch) = reconcile(tx.amount, &tx.breakdown) {
            report.unreconciled.push(UnreconciledRow {
                id: tx.id,
                expected: mismatch.expected,
                actual: mismatch.actual,
            });
        }
    }

    Ok(report)
}
