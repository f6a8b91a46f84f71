//! Denomination reconciliation.
//!
//! A transaction is reconciled when the face value of its breakdown equals
//! the absolute value of its declared amount. Both sides are compared as
//! `u64` so even `i64::MIN` has a representable magnitude.

use serde::Serialize;
use thiserror::Error;

use super::error::LedgerError;
use super::types::TransactionDraft;
use crate::cash::DenominationBreakdown;

/// The breakdown total differs from the declared amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[error("Denomination breakdown does not match amount: expected {expected}, actual {actual}")]
pub struct MismatchError {
    /// `|amount|` as declared.
    pub expected: u64,
    /// Face value of the breakdown.
    pub actual: u64,
}

/// Checks that `breakdown` backs `amount` exactly.
///
/// # Errors
///
/// Returns [`MismatchError`] carrying both totals when they differ.
pub fn reconcile(amount: i64, breakdown: &DenominationBreakdown) -> Result<(), MismatchError> {
    let expected = amount.unsigned_abs();
    let actual = breakdown.total_value();
    if expected == actual {
        Ok(())
    } else {
        Err(MismatchError { expected, actual })
    }
}

/// Validates an entry before it may be written: sign rule, then reconciliation.
///
/// # Errors
///
/// Returns `InvalidSign` or `Mismatch`.
pub fn validate_entry(
    draft: &TransactionDraft,
    breakdown: &DenominationBreakdown,
) -> Result<(), LedgerError> {
    if !draft.transaction_type.accepts(draft.amount) {
        return Err(LedgerError::InvalidSign {
            transaction_type: draft.transaction_type,
            amount: draft.amount,
        });
    }
    reconcile(draft.amount, breakdown)?;
    Ok(())
}
