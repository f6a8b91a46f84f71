//! Storage seam for the ledger.
//!
//! The store never talks to a database directly. It opens a [`LedgerUnit`]
//! per mutation, does all reads and writes through it, and commits once.
//! Implementations must roll the unit back when it is dropped uncommitted.

use async_trait::async_trait;
use cashbox_shared::{DateRange, TransactionId};
use thiserror::Error;

use super::balance::BalanceChange;
use super::types::{Transaction, TransactionDraft};
use crate::cash::DenominationBreakdown;

/// Repository-level failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Storage cannot be reached. Retrying may succeed.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Storage rejected the operation.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored row cannot be turned back into a transaction.
    #[error("corrupt stored row: {0}")]
    Corrupt(String),
}

/// Committed-state access and unit-of-work factory.
#[async_trait]
pub trait LedgerRepository: Send + Sync + 'static {
    /// Unit of work type.
    type Unit: LedgerUnit;

    /// Opens a unit of work.
    async fn begin(&self) -> Result<Self::Unit, StoreError>;

    /// Committed transactions dated inside `range`, in any order.
    async fn fetch_all(&self, range: &DateRange) -> Result<Vec<Transaction>, StoreError>;

    /// One committed transaction.
    async fn fetch_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError>;

    /// Checks that storage is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// One atomic storage transaction. Dropping it without [`LedgerUnit::commit`]
/// discards every write made through it.
#[async_trait]
pub trait LedgerUnit: Send + Sized {
    /// Inserts a transaction with its breakdown and returns the new id.
    async fn persist(
        &mut self,
        draft: &TransactionDraft,
        breakdown: &DenominationBreakdown,
    ) -> Result<TransactionId, StoreError>;

    /// Overwrites a transaction and its breakdown. Returns false if absent.
    async fn replace(
        &mut self,
        id: TransactionId,
        draft: &TransactionDraft,
        breakdown: &DenominationBreakdown,
    ) -> Result<bool, StoreError>;

    /// Every transaction visible inside the unit, in any order.
    async fn fetch_all(&mut self) -> Result<Vec<Transaction>, StoreError>;

    /// One transaction visible inside the unit.
    async fn fetch_by_id(&mut self, id: TransactionId) -> Result<Option<Transaction>, StoreError>;

    /// Removes a transaction and its breakdown. Returns false if absent.
    async fn delete_by_id(&mut self, id: TransactionId) -> Result<bool, StoreError>;

    /// Writes recomputed running balances.
    async fn write_balances(&mut self, changes: &[BalanceChange]) -> Result<(), StoreError>;

    /// Makes every write durable.
    async fn commit(self) -> Result<(), StoreError>;
}
