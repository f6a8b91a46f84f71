//! In-process ledger storage.
//!
//! Each unit of work stages a private copy of the committed state and swaps it
//! in on commit. This is only atomic under a single writer, which
//! [`LedgerStore`](super::store::LedgerStore) guarantees.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use cashbox_shared::{DateRange, TransactionId};
use tokio::sync::RwLock;

use super::balance::BalanceChange;
use super::repository::{LedgerRepository, LedgerUnit, StoreError};
use super::types::{Transaction, TransactionDraft};
use crate::cash::DenominationBreakdown;

#[derive(Debug, Clone, Default)]
struct LedgerState {
    last_id: i64,
    rows: BTreeMap<TransactionId, Transaction>,
}

/// Ledger storage held in memory. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedgerRepository {
    state: Arc<RwLock<LedgerState>>,
}

impl InMemoryLedgerRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Unit of work over [`InMemoryLedgerRepository`].
#[derive(Debug)]
pub struct InMemoryUnit {
    committed: Arc<RwLock<LedgerState>>,
    staged: LedgerState,
}

#[async_trait]
impl LedgerRepository for InMemoryLedgerRepository {
    type Unit = InMemoryUnit;

    async fn begin(&self) -> Result<Self::Unit, StoreError> {
        let staged = self.state.read().await.clone();
        Ok(InMemoryUnit {
            committed: Arc::clone(&self.state),
            staged,
        })
    }

    async fn fetch_all(&self, range: &DateRange) -> Result<Vec<Transaction>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .rows
            .values()
            .filter(|tx| range.contains(tx.date))
            .cloned()
            .collect())
    }

    async fn fetch_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError> {
        Ok(self.state.read().await.rows.get(&id).cloned())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl LedgerUnit for InMemoryUnit {
    async fn persist(
        &mut self,
        draft: &TransactionDraft,
        breakdown: &DenominationBreakdown,
    ) -> Result<TransactionId, StoreError> {
        self.staged.last_id += 1;
        let id = TransactionId::new(self.staged.last_id);
        self.staged
            .rows
            .insert(id, Transaction::from_draft(id, draft.clone(), *breakdown));
        Ok(id)
    }

    async fn replace(
        &mut self,
        id: TransactionId,
        draft: &TransactionDraft,
        breakdown: &DenominationBreakdown,
    ) -> Result<bool, StoreError> {
        let Some(existing) = self.staged.rows.get_mut(&id) else {
            return Ok(false);
        };
        let running_balance = existing.running_balance;
        *existing = Transaction {
            running_balance,
            ..Transaction::from_draft(id, draft.clone(), *breakdown)
        };
        Ok(true)
    }

    async fn fetch_all(&mut self) -> Result<Vec<Transaction>, StoreError> {
        Ok(self.staged.rows.values().cloned().collect())
    }

    async fn fetch_by_id(&mut self, id: TransactionId) -> Result<Option<Transaction>, StoreError> {
        Ok(self.staged.rows.get(&id).cloned())
    }

    async fn delete_by_id(&mut self, id: TransactionId) -> Result<bool, StoreError> {
        Ok(self.staged.rows.remove(&id).is_some())
    }

    async fn write_balances(&mut self, changes: &[BalanceChange]) -> Result<(), StoreError> {
        for change in changes {
            let row = self.staged.rows.get_mut(&change.id).ok_or_else(|| {
                StoreError::Backend(format!("balance write for missing transaction {}", change.id))
            })?;
            row.running_balance = change.current;
        }
        Ok(())
    }

    async fn commit(self) -> Result<(), StoreError> {
        *self.committed.write().await = self.staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::TransactionType;
    use chrono::NaiveDate;

    fn draft(day: u32, amount: i64) -> TransactionDraft {
        TransactionDraft {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            transaction_type: TransactionType::Deposit,
            amount,
            summary: String::new(),
            memo: String::new(),
            recipient: String::new(),
        }
    }

    #[tokio::test]
    async fn test_uncommitted_unit_rolls_back() {
        let repo = InMemoryLedgerRepository::new();
        {
            let mut unit = repo.begin().await.unwrap();
            unit.persist(&draft(1, 10), &DenominationBreakdown::empty())
                .await
                .unwrap();
        }
        assert!(repo.fetch_all(&DateRange::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_publishes_writes() {
        let repo = InMemoryLedgerRepository::new();
        let mut unit = repo.begin().await.unwrap();
        let id = unit
            .persist(&draft(1, 10), &DenominationBreakdown::empty())
            .await
            .unwrap();
        unit.commit().await.unwrap();

        let stored = repo.fetch_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.amount, 10);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryLedgerRepository::new();
        let mut unit = repo.begin().await.unwrap();
        let first = unit
            .persist(&draft(1, 10), &DenominationBreakdown::empty())
            .await
            .unwrap();
        assert!(unit.delete_by_id(first).await.unwrap());
        let second = unit
            .persist(&draft(1, 10), &DenominationBreakdown::empty())
            .await
            .unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_fetch_all_filters_by_range() {
        let repo = InMemoryLedgerRepository::new();
        let mut unit = repo.begin().await.unwrap();
        for day in 1..=5 {
            unit.persist(&draft(day, 10), &DenominationBreakdown::empty())
                .await
                .unwrap();
        }
        unit.commit().await.unwrap();

        let range = DateRange::between(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
        );
        assert_eq!(repo.fetch_all(&range).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_replace_missing_returns_false() {
        let repo = InMemoryLedgerRepository::new();
        let mut unit = repo.begin().await.unwrap();
        let replaced = unit
            .replace(TransactionId::new(9), &draft(1, 10), &DenominationBreakdown::empty())
            .await
            .unwrap();
        assert!(!replaced);
        assert!(!unit.delete_by_id(TransactionId::new(9)).await.unwrap());
    }
}
