//! The ledger store: the only writer of ledger state.
//!
//! Every mutation runs under one writer lock and inside one storage unit of
//! work covering the row write, the full running-balance recompute and the
//! balance write-back. If anything fails before the commit, or the optional
//! write timeout expires, the unit is dropped and storage is left as it was.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use cashbox_shared::{DateRange, TransactionId};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::audit::{self, AuditReport};
use super::balance::{canonical_order, recompute};
use super::error::LedgerError;
use super::inventory::{InventorySnapshot, aggregate};
use super::reconcile::validate_entry;
use super::repository::{LedgerRepository, LedgerUnit};
use super::types::{Transaction, TransactionDraft};
use crate::cash::DenominationBreakdown;

/// One entry of a batch write.
pub type Entry = (TransactionDraft, DenominationBreakdown);

/// Serialized, atomic access to the ledger.
#[derive(Debug)]
pub struct LedgerStore<R> {
    repository: R,
    write_lock: Mutex<()>,
    write_timeout: Option<Duration>,
}

impl<R: LedgerRepository> LedgerStore<R> {
    /// Creates a store with no write timeout.
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            write_lock: Mutex::new(()),
            write_timeout: None,
        }
    }

    /// Bounds each write up to its commit, lock wait included. `None` waits
    /// indefinitely.
    #[must_use]
    pub fn with_write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// The underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Records a new transaction.
    ///
    /// # Errors
    ///
    /// `InvalidSign` or `Mismatch` if the entry is rejected (nothing is
    /// written), or a storage error.
    pub async fn create(
        &self,
        draft: TransactionDraft,
        breakdown: DenominationBreakdown,
    ) -> Result<Transaction, LedgerError> {
        validate_entry(&draft, &breakdown)?;

        let (id, history) = self
            .serialized(self.create_in_unit(&draft, &breakdown))
            .await?;

        info!(
            transaction_id = %id,
            date = %draft.date,
            amount = draft.amount,
            "transaction created"
        );
        warn_on_shortfall(&history);
        find(history, id)
    }

    /// Replaces the fields and breakdown of an existing transaction.
    ///
    /// # Errors
    ///
    /// `NotFound`, `InvalidSign`, `Mismatch` or a storage error.
    pub async fn update(
        &self,
        id: TransactionId,
        draft: TransactionDraft,
        breakdown: DenominationBreakdown,
    ) -> Result<Transaction, LedgerError> {
        let history = self
            .serialized(self.update_in_unit(id, &draft, &breakdown))
            .await?;

        info!(transaction_id = %id, date = %draft.date, amount = draft.amount, "transaction updated");
        warn_on_shortfall(&history);
        find(history, id)
    }

    /// Removes a transaction and its breakdown.
    ///
    /// # Errors
    ///
    /// `NotFound` or a storage error.
    pub async fn delete(&self, id: TransactionId) -> Result<(), LedgerError> {
        let history = self.serialized(self.delete_in_unit(id)).await?;

        info!(transaction_id = %id, "transaction deleted");
        warn_on_shortfall(&history);
        Ok(())
    }

    /// Records several transactions in one unit of work with a single
    /// recompute. Every entry is validated before anything is written.
    ///
    /// Returns the stored transactions in input order.
    ///
    /// # Errors
    ///
    /// The first validation failure, or a storage error. Either way nothing
    /// from the batch is written.
    pub async fn create_batch(&self, entries: Vec<Entry>) -> Result<Vec<Transaction>, LedgerError> {
        for (draft, breakdown) in &entries {
            validate_entry(draft, breakdown)?;
        }
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let (ids, history) = self.serialized(self.batch_in_unit(&entries)).await?;

        info!(count = ids.len(), "transaction batch created");
        warn_on_shortfall(&history);

        let mut by_id: HashMap<TransactionId, Transaction> =
            history.into_iter().map(|tx| (tx.id, tx)).collect();
        ids.into_iter()
            .map(|id| {
                by_id.remove(&id).ok_or_else(|| {
                    LedgerError::Storage(format!("transaction {id} missing after commit"))
                })
            })
            .collect()
    }

    /// Committed transactions dated inside `range`, in canonical order.
    /// An inverted range matches nothing.
    ///
    /// # Errors
    ///
    /// Storage errors only.
    pub async fn list(&self, range: &DateRange) -> Result<Vec<Transaction>, LedgerError> {
        if range.is_inverted() {
            return Ok(Vec::new());
        }
        let mut transactions = self.repository.fetch_all(range).await?;
        canonical_order(&mut transactions);
        Ok(transactions)
    }

    /// One committed transaction.
    ///
    /// # Errors
    ///
    /// `NotFound` or a storage error.
    pub async fn get(&self, id: TransactionId) -> Result<Transaction, LedgerError> {
        self.repository
            .fetch_by_id(id)
            .await?
            .ok_or(LedgerError::NotFound(id))
    }

    /// Inventory derived from the full committed history.
    ///
    /// # Errors
    ///
    /// Storage errors only.
    pub async fn current_inventory(&self) -> Result<InventorySnapshot, LedgerError> {
        let history = self.repository.fetch_all(&DateRange::all()).await?;
        Ok(aggregate(&history))
    }

    /// Checks every committed transaction for reconciliation, sign and
    /// balance-chain problems.
    ///
    /// # Errors
    ///
    /// `BalanceOverflow` if the history cannot be summed, or a storage error.
    pub async fn audit(&self) -> Result<AuditReport, LedgerError> {
        let history = self.repository.fetch_all(&DateRange::all()).await?;
        let report = audit::check(&history)?;
        if !report.is_clean() {
            warn!(
                unreconciled = report.unreconciled.len(),
                sign_violations = report.sign_violations.len(),
                stale_balances = report.stale_balances.len(),
                "ledger audit found inconsistencies"
            );
        }
        Ok(report)
    }

    /// Recomputes and rewrites every stale running balance.
    /// Returns the number of rows corrected.
    ///
    /// # Errors
    ///
    /// `BalanceOverflow` or a storage error.
    pub async fn repair_balances(&self) -> Result<usize, LedgerError> {
        let repaired = self.serialized(self.repair_in_unit()).await?;
        if repaired > 0 {
            warn!(repaired, "stale running balances rewritten");
        }
        Ok(repaired)
    }

    /// Runs `work` under the writer lock, then commits the unit it staged.
    ///
    /// The timeout covers the lock wait and the staged work only. Once the
    /// commit is issued it runs to completion, and a failed commit is
    /// reported as `CommitUnknown` since the rows may already be durable.
    async fn serialized<T, F>(&self, work: F) -> Result<T, LedgerError>
    where
        F: Future<Output = Result<(R::Unit, T), LedgerError>>,
    {
        let staged = async {
            let guard = self.write_lock.lock().await;
            work.await.map(|(unit, value)| (guard, unit, value))
        };
        let (_guard, unit, value) = match self.write_timeout {
            Some(limit) => tokio::time::timeout(limit, staged).await.unwrap_or_else(|_| {
                warn!(timeout = ?limit, "ledger write timed out and was rolled back");
                Err(LedgerError::Timeout(limit))
            })?,
            None => staged.await?,
        };
        unit.commit().await.map_err(|e| {
            warn!(error = %e, "ledger commit failed, outcome unknown");
            LedgerError::CommitUnknown(e.to_string())
        })?;
        Ok(value)
    }

    async fn create_in_unit(
        &self,
        draft: &TransactionDraft,
        breakdown: &DenominationBreakdown,
    ) -> Result<(R::Unit, (TransactionId, Vec<Transaction>)), LedgerError> {
        let mut unit = self.repository.begin().await?;
        let id = unit.persist(draft, breakdown).await?;
        let history = rebalance(&mut unit).await?;
        Ok((unit, (id, history)))
    }

    async fn update_in_unit(
        &self,
        id: TransactionId,
        draft: &TransactionDraft,
        breakdown: &DenominationBreakdown,
    ) -> Result<(R::Unit, Vec<Transaction>), LedgerError> {
        let mut unit = self.repository.begin().await?;
        if unit.fetch_by_id(id).await?.is_none() {
            return Err(LedgerError::NotFound(id));
        }
        validate_entry(draft, breakdown)?;
        if !unit.replace(id, draft, breakdown).await? {
            return Err(LedgerError::NotFound(id));
        }
        let history = rebalance(&mut unit).await?;
        Ok((unit, history))
    }

    async fn delete_in_unit(
        &self,
        id: TransactionId,
    ) -> Result<(R::Unit, Vec<Transaction>), LedgerError> {
        let mut unit = self.repository.begin().await?;
        if !unit.delete_by_id(id).await? {
            return Err(LedgerError::NotFound(id));
        }
        let history = rebalance(&mut unit).await?;
        Ok((unit, history))
    }

    async fn batch_in_unit(
        &self,
        entries: &[Entry],
    ) -> Result<(R::Unit, (Vec<TransactionId>, Vec<Transaction>)), LedgerError> {
        let mut unit = self.repository.begin().await?;
        let mut ids = Vec::with_capacity(entries.len());
        for (draft, breakdown) in entries {
            ids.push(unit.persist(draft, breakdown).await?);
        }
        let history = rebalance(&mut unit).await?;
        Ok((unit, (ids, history)))
    }

    async fn repair_in_unit(&self) -> Result<(R::Unit, usize), LedgerError> {
        let mut unit = self.repository.begin().await?;
        let mut history = unit.fetch_all().await?;
        let changes = recompute(&mut history)?;
        if !changes.is_empty() {
            unit.write_balances(&changes).await?;
        }
        Ok((unit, changes.len()))
    }
}

/// Recomputes every running balance inside `unit` and writes back the rows
/// that moved. Returns the full history in canonical order.
async fn rebalance<U: LedgerUnit>(unit: &mut U) -> Result<Vec<Transaction>, LedgerError> {
    let mut history = unit.fetch_all().await?;
    let changes = recompute(&mut history)?;
    debug!(
        transactions = history.len(),
        changed = changes.len(),
        "running balances recomputed"
    );
    if !changes.is_empty() {
        unit.write_balances(&changes).await?;
    }
    Ok(history)
}

fn find(history: Vec<Transaction>, id: TransactionId) -> Result<Transaction, LedgerError> {
    history
        .into_iter()
        .find(|tx| tx.id == id)
        .ok_or_else(|| LedgerError::Storage(format!("transaction {id} missing after commit")))
}

fn warn_on_shortfall(history: &[Transaction]) {
    let snapshot = aggregate(history);
    if snapshot.has_shortfall() {
        let short: Vec<u32> = snapshot.shortfalls().iter().map(|d| d.value()).collect();
        warn!(
            shortfalls = ?short,
            total_value = snapshot.total_value(),
            "inventory has negative denomination counts"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::cash::Denomination;
    use crate::ledger::balance::{BalanceChange, verify_chain};
    use crate::ledger::memory::{InMemoryLedgerRepository, InMemoryUnit};
    use crate::ledger::repository::StoreError;
    use crate::ledger::types::TransactionType;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn draft(day: u32, transaction_type: TransactionType, amount: i64) -> TransactionDraft {
        TransactionDraft {
            date: date(day),
            transaction_type,
            amount,
            summary: "test".to_string(),
            memo: String::new(),
            recipient: String::new(),
        }
    }

    fn hundreds(n: u32) -> DenominationBreakdown {
        DenominationBreakdown::empty().with(Denomination::OneHundred, n)
    }

    fn deposit(day: u32, amount: i64) -> Entry {
        let n = u32::try_from(amount / 100).unwrap();
        (draft(day, TransactionType::Deposit, amount), hundreds(n))
    }

    fn withdrawal(day: u32, amount: i64) -> Entry {
        let n = u32::try_from(amount / 100).unwrap();
        (draft(day, TransactionType::Withdrawal, -amount), hundreds(n))
    }

    fn store() -> LedgerStore<InMemoryLedgerRepository> {
        LedgerStore::new(InMemoryLedgerRepository::new())
    }

    async fn balances(store: &LedgerStore<impl LedgerRepository>) -> Vec<i64> {
        store
            .list(&DateRange::all())
            .await
            .unwrap()
            .iter()
            .map(|tx| tx.running_balance)
            .collect()
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_balance() {
        let store = store();
        let breakdown = DenominationBreakdown::empty().with(Denomination::OneThousand, 1);
        let tx = store
            .create(draft(1, TransactionType::Deposit, 1_000), breakdown)
            .await
            .unwrap();

        assert_eq!(tx.running_balance, 1_000);
        assert_eq!(tx.breakdown, breakdown);
        let inventory = store.current_inventory().await.unwrap();
        assert_eq!(inventory.count(Denomination::OneThousand), 1);
    }

    #[tokio::test]
    async fn test_mismatch_is_rejected_and_nothing_written() {
        let store = store();
        let breakdown = DenominationBreakdown::empty().with(Denomination::FiveHundred, 1);
        let err = store
            .create(draft(1, TransactionType::Withdrawal, -1_000), breakdown)
            .await
            .unwrap_err();

        match err {
            LedgerError::Mismatch(m) => {
                assert_eq!(m.expected, 1_000);
                assert_eq!(m.actual, 500);
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
        assert!(store.list(&DateRange::all()).await.unwrap().is_empty());
        assert_eq!(store.current_inventory().await.unwrap().total_value(), 0);
    }

    #[tokio::test]
    async fn test_backdated_insert_then_delete() {
        let store = store();
        let (d, b) = deposit(1, 500);
        store.create(d, b).await.unwrap();
        let (d, b) = withdrawal(3, 200);
        store.create(d, b).await.unwrap();
        let (d, b) = deposit(2, 100);
        let middle = store.create(d, b).await.unwrap();

        let listed = store.list(&DateRange::all()).await.unwrap();
        let dates: Vec<NaiveDate> = listed.iter().map(|tx| tx.date).collect();
        assert_eq!(dates, vec![date(1), date(2), date(3)]);
        assert_eq!(balances(&store).await, vec![500, 600, 400]);
        assert_eq!(middle.running_balance, 600);

        store.delete(middle.id).await.unwrap();
        assert_eq!(balances(&store).await, vec![500, 300]);
    }

    #[tokio::test]
    async fn test_update_moves_transaction_in_history() {
        let store = store();
        let (d, b) = deposit(1, 500);
        let first = store.create(d, b).await.unwrap();
        let (d, b) = deposit(5, 300);
        store.create(d, b).await.unwrap();

        let (d, b) = deposit(9, 200);
        let updated = store.update(first.id, d, b).await.unwrap();
        assert_eq!(updated.id, first.id);
        assert_eq!(updated.running_balance, 500);
        assert_eq!(balances(&store).await, vec![300, 500]);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = store();
        let (d, b) = deposit(1, 100);
        let err = store.update(TransactionId::new(42), d, b).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(id) if id == TransactionId::new(42)));
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_entry_and_keeps_original() {
        let store = store();
        let (d, b) = deposit(1, 100);
        let tx = store.create(d, b).await.unwrap();

        let err = store
            .update(tx.id, draft(1, TransactionType::Deposit, -100), hundreds(1))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidSign { .. }));
        assert_eq!(store.get(tx.id).await.unwrap(), tx);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let err = store().delete(TransactionId::new(1)).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_range_and_inverted_range() {
        let store = store();
        for day in [1, 2, 3, 4] {
            let (d, b) = deposit(day, 100);
            store.create(d, b).await.unwrap();
        }
        let range = DateRange::between(date(2), date(3));
        let listed = store.list(&range).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].running_balance, 200);

        let inverted = DateRange::between(date(3), date(2));
        assert!(store.list(&inverted).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_negative_inventory_is_allowed() {
        let store = store();
        let (d, b) = withdrawal(1, 300);
        let tx = store.create(d, b).await.unwrap();
        assert_eq!(tx.running_balance, -300);

        let inventory = store.current_inventory().await.unwrap();
        assert!(inventory.has_shortfall());
        assert_eq!(inventory.count(Denomination::OneHundred), -3);
    }

    #[tokio::test]
    async fn test_create_batch_single_recompute() {
        let store = store();
        let created = store
            .create_batch(vec![deposit(3, 100), deposit(1, 200), withdrawal(2, 100)])
            .await
            .unwrap();
        let amounts: Vec<i64> = created.iter().map(|tx| tx.amount).collect();
        assert_eq!(amounts, vec![100, 200, -100]);
        assert_eq!(balances(&store).await, vec![200, 100, 200]);
    }

    #[tokio::test]
    async fn test_create_batch_rejects_whole_batch_on_invalid_entry() {
        let store = store();
        let bad = (draft(2, TransactionType::Deposit, 100), hundreds(2));
        let err = store
            .create_batch(vec![deposit(1, 100), bad])
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Mismatch(_)));
        assert!(store.list(&DateRange::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_writers_keep_chain_consistent() {
        let store = Arc::new(store());
        let mut handles = Vec::new();
        for i in 0..20u32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let (d, b) = deposit(1 + i % 7, 100);
                store.create(d, b).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let history = store.list(&DateRange::all()).await.unwrap();
        assert_eq!(history.len(), 20);
        assert!(verify_chain(&history).unwrap().is_empty());
        assert_eq!(history.last().unwrap().running_balance, 2_000);
        assert!(store.audit().await.unwrap().is_clean());
    }

    // ---- failure injection ----

    #[derive(Clone, Default)]
    struct FlakyRepository {
        inner: InMemoryLedgerRepository,
        fail_balance_writes: bool,
        fail_commit: bool,
        write_delay: Option<Duration>,
        commit_delay: Option<Duration>,
    }

    struct FlakyUnit {
        inner: InMemoryUnit,
        fail_balance_writes: bool,
        fail_commit: bool,
        write_delay: Option<Duration>,
        commit_delay: Option<Duration>,
    }

    #[async_trait]
    impl LedgerRepository for FlakyRepository {
        type Unit = FlakyUnit;

        async fn begin(&self) -> Result<Self::Unit, StoreError> {
            Ok(FlakyUnit {
                inner: self.inner.begin().await?,
                fail_balance_writes: self.fail_balance_writes,
                fail_commit: self.fail_commit,
                write_delay: self.write_delay,
                commit_delay: self.commit_delay,
            })
        }

        async fn fetch_all(&self, range: &DateRange) -> Result<Vec<Transaction>, StoreError> {
            self.inner.fetch_all(range).await
        }

        async fn fetch_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError> {
            self.inner.fetch_by_id(id).await
        }

        async fn ping(&self) -> Result<(), StoreError> {
            self.inner.ping().await
        }
    }

    #[async_trait]
    impl LedgerUnit for FlakyUnit {
        async fn persist(
            &mut self,
            draft: &TransactionDraft,
            breakdown: &DenominationBreakdown,
        ) -> Result<TransactionId, StoreError> {
            self.inner.persist(draft, breakdown).await
        }

        async fn replace(
            &mut self,
            id: TransactionId,
            draft: &TransactionDraft,
            breakdown: &DenominationBreakdown,
        ) -> Result<bool, StoreError> {
            self.inner.replace(id, draft, breakdown).await
        }

        async fn fetch_all(&mut self) -> Result<Vec<Transaction>, StoreError> {
            self.inner.fetch_all().await
        }

        async fn fetch_by_id(&mut self, id: TransactionId) -> Result<Option<Transaction>, StoreError> {
            self.inner.fetch_by_id(id).await
        }

        async fn delete_by_id(&mut self, id: TransactionId) -> Result<bool, StoreError> {
            self.inner.delete_by_id(id).await
        }

        async fn write_balances(&mut self, changes: &[BalanceChange]) -> Result<(), StoreError> {
            if self.fail_balance_writes {
                return Err(StoreError::Unavailable("connection reset".to_string()));
            }
            if let Some(delay) = self.write_delay {
                tokio::time::sleep(delay).await;
            }
            self.inner.write_balances(changes).await
        }

        // The rows land first; the acknowledgement is what is slow or lost.
        async fn commit(self) -> Result<(), StoreError> {
            self.inner.commit().await?;
            if let Some(delay) = self.commit_delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_commit {
                return Err(StoreError::Unavailable("connection reset".to_string()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_storage_failure_rolls_back_pair_write() {
        let repository = FlakyRepository {
            fail_balance_writes: true,
            ..FlakyRepository::default()
        };
        let store = LedgerStore::new(repository);
        let (d, b) = deposit(1, 100);
        let err = store.create(d, b).await.unwrap_err();

        assert!(err.is_retryable());
        assert!(matches!(err, LedgerError::StorageUnavailable(_)));
        assert!(store.list(&DateRange::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_timeout_is_retryable_and_leaves_storage_untouched() {
        let repository = FlakyRepository {
            write_delay: Some(Duration::from_millis(500)),
            ..FlakyRepository::default()
        };
        let store =
            LedgerStore::new(repository).with_write_timeout(Some(Duration::from_millis(20)));
        let (d, b) = deposit(1, 100);
        let err = store.create(d, b).await.unwrap_err();

        assert!(matches!(err, LedgerError::Timeout(_)));
        assert!(err.is_retryable());
        assert!(store.list(&DateRange::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_slow_commit_acknowledgement_is_not_a_timeout() {
        let repository = FlakyRepository {
            commit_delay: Some(Duration::from_millis(100)),
            ..FlakyRepository::default()
        };
        let store =
            LedgerStore::new(repository).with_write_timeout(Some(Duration::from_millis(20)));
        let (d, b) = deposit(1, 100);
        let tx = store.create(d, b).await.unwrap();

        let listed = store.list(&DateRange::all()).await.unwrap();
        assert_eq!(listed, vec![tx]);
    }

    #[tokio::test]
    async fn test_failed_commit_is_not_retryable() {
        let repository = FlakyRepository {
            fail_commit: true,
            ..FlakyRepository::default()
        };
        let store = LedgerStore::new(repository);
        let (d, b) = deposit(1, 100);
        let err = store.create(d, b).await.unwrap_err();

        assert!(matches!(err, LedgerError::CommitUnknown(_)));
        assert!(!err.is_retryable());
        // The write did land, so a blind retry would have duplicated it.
        assert_eq!(store.list(&DateRange::all()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_balance_overflow_rejects_write() {
        let repository = InMemoryLedgerRepository::new();
        let store = LedgerStore::new(repository.clone());

        // Seed a balance at the top of the range behind the store's back.
        let mut unit = repository.begin().await.unwrap();
        unit.persist(
            &draft(1, TransactionType::Deposit, i64::MAX),
            &DenominationBreakdown::empty(),
        )
        .await
        .unwrap();
        unit.commit().await.unwrap();

        let (d, b) = deposit(2, 100);
        let err = store.create(d, b).await.unwrap_err();
        assert!(matches!(err, LedgerError::BalanceOverflow(_)));
        let listed = store.list(&DateRange::all()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].amount, i64::MAX);
    }

    #[tokio::test]
    async fn test_audit_and_repair_stale_balances() {
        let repository = InMemoryLedgerRepository::new();
        let store = LedgerStore::new(repository.clone());
        let (d, b) = deposit(1, 100);
        let first = store.create(d, b).await.unwrap();
        let (d, b) = deposit(2, 200);
        store.create(d, b).await.unwrap();

        // Corrupt a stored balance behind the store's back.
        let mut unit = repository.begin().await.unwrap();
        unit.write_balances(&[BalanceChange {
            id: first.id,
            previous: 100,
            current: 7,
        }])
        .await
        .unwrap();
        unit.commit().await.unwrap();

        let report = store.audit().await.unwrap();
        assert_eq!(report.stale_balances.len(), 1);
        assert_eq!(report.stale_balances[0].id, first.id);

        assert_eq!(store.repair_balances().await.unwrap(), 1);
        assert!(store.audit().await.unwrap().is_clean());
        assert_eq!(store.repair_balances().await.unwrap(), 0);
    }
}
