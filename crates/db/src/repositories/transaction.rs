//! Ledger repository over `SeaORM`.
//!
//! Each [`LedgerUnit`] wraps one `DatabaseTransaction`. `SeaORM` rolls a
//! transaction back when it is dropped, which is exactly the unit-of-work
//! contract the ledger store relies on.

use async_trait::async_trait;
use cashbox_core::cash::{DENOMINATION_COUNT, DenominationBreakdown};
use cashbox_core::ledger::{
    BalanceChange, LedgerRepository, LedgerUnit, StoreError, Transaction, TransactionDraft,
};
use cashbox_shared::{DateRange, TransactionId};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, NotSet, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::error;

use crate::entities::{denominations, transactions};

/// Ledger storage backed by a `SeaORM` connection.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Unit of work over one database transaction.
#[derive(Debug)]
pub struct TransactionUnit {
    txn: DatabaseTransaction,
}

#[async_trait]
impl LedgerRepository for TransactionRepository {
    type Unit = TransactionUnit;

    async fn begin(&self) -> Result<Self::Unit, StoreError> {
        let txn = self.db.begin().await.map_err(store_error)?;
        Ok(TransactionUnit { txn })
    }

    async fn fetch_all(&self, range: &DateRange) -> Result<Vec<Transaction>, StoreError> {
        select_all(&self.db, range).await
    }

    async fn fetch_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError> {
        select_one(&self.db, id).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.ping().await.map_err(store_error)
    }
}

#[async_trait]
impl LedgerUnit for TransactionUnit {
    async fn persist(
        &mut self,
        draft: &TransactionDraft,
        breakdown: &DenominationBreakdown,
    ) -> Result<TransactionId, StoreError> {
        let row = transactions::ActiveModel {
            id: NotSet,
            running_balance: Set(0),
            ..draft_columns(draft)
        }
        .insert(&self.txn)
        .await
        .map_err(store_error)?;

        breakdown_row(row.id, breakdown)
            .insert(&self.txn)
            .await
            .map_err(store_error)?;

        Ok(TransactionId::new(row.id))
    }

    async fn replace(
        &mut self,
        id: TransactionId,
        draft: &TransactionDraft,
        breakdown: &DenominationBreakdown,
    ) -> Result<bool, StoreError> {
        let Some(existing) = transactions::Entity::find_by_id(id.into_inner())
            .one(&self.txn)
            .await
            .map_err(store_error)?
        else {
            return Ok(false);
        };

        transactions::ActiveModel {
            id: Set(existing.id),
            running_balance: Set(existing.running_balance),
            ..draft_columns(draft)
        }
        .update(&self.txn)
        .await
        .map_err(store_error)?;

        denominations::Entity::delete_by_id(existing.id)
            .exec(&self.txn)
            .await
            .map_err(store_error)?;
        breakdown_row(existing.id, breakdown)
            .insert(&self.txn)
            .await
            .map_err(store_error)?;

        Ok(true)
    }

    async fn fetch_all(&mut self) -> Result<Vec<Transaction>, StoreError> {
        select_all(&self.txn, &DateRange::all()).await
    }

    async fn fetch_by_id(&mut self, id: TransactionId) -> Result<Option<Transaction>, StoreError> {
        select_one(&self.txn, id).await
    }

    async fn delete_by_id(&mut self, id: TransactionId) -> Result<bool, StoreError> {
        // Not every backend enforces the cascade, so the breakdown goes first.
        denominations::Entity::delete_by_id(id.into_inner())
            .exec(&self.txn)
            .await
            .map_err(store_error)?;
        let result = transactions::Entity::delete_by_id(id.into_inner())
            .exec(&self.txn)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected > 0)
    }

    async fn write_balances(&mut self, changes: &[BalanceChange]) -> Result<(), StoreError> {
        for change in changes {
            transactions::Entity::update_many()
                .col_expr(
                    transactions::Column::RunningBalance,
                    Expr::value(change.current),
                )
                .filter(transactions::Column::Id.eq(change.id.into_inner()))
                .exec(&self.txn)
                .await
                .map_err(store_error)?;
        }
        Ok(())
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.txn.commit().await.map_err(store_error)
    }
}

async fn select_all<C: ConnectionTrait>(
    db: &C,
    range: &DateRange,
) -> Result<Vec<Transaction>, StoreError> {
    let mut query = transactions::Entity::find();
    if let Some(start) = range.start {
        query = query.filter(transactions::Column::TransactionDate.gte(start));
    }
    if let Some(end) = range.end {
        query = query.filter(transactions::Column::TransactionDate.lte(end));
    }

    query
        .order_by_asc(transactions::Column::TransactionDate)
        .order_by_asc(transactions::Column::Id)
        .find_also_related(denominations::Entity)
        .all(db)
        .await
        .map_err(store_error)?
        .into_iter()
        .map(|(row, counts)| to_transaction(row, counts))
        .collect()
}

async fn select_one<C: ConnectionTrait>(
    db: &C,
    id: TransactionId,
) -> Result<Option<Transaction>, StoreError> {
    transactions::Entity::find_by_id(id.into_inner())
        .find_also_related(denominations::Entity)
        .one(db)
        .await
        .map_err(store_error)?
        .map(|(row, counts)| to_transaction(row, counts))
        .transpose()
}

fn draft_columns(draft: &TransactionDraft) -> transactions::ActiveModel {
    transactions::ActiveModel {
        id: NotSet,
        transaction_date: Set(draft.date),
        transaction_type: Set(draft.transaction_type.as_str().to_string()),
        amount: Set(draft.amount),
        summary: Set(draft.summary.clone()),
        memo: Set(draft.memo.clone()),
        recipient: Set(draft.recipient.clone()),
        running_balance: NotSet,
    }
}

fn breakdown_row(transaction_id: i64, breakdown: &DenominationBreakdown) -> denominations::ActiveModel {
    let [c10000, c5000, c1000, c500, c100, c50, c10, c5, c1] =
        (*breakdown.counts()).map(i64::from);
    denominations::ActiveModel {
        transaction_id: Set(transaction_id),
        count_10000: Set(c10000),
        count_5000: Set(c5000),
        count_1000: Set(c1000),
        count_500: Set(c500),
        count_100: Set(c100),
        count_50: Set(c50),
        count_10: Set(c10),
        count_5: Set(c5),
        count_1: Set(c1),
    }
}

fn to_transaction(
    row: transactions::Model,
    counts: Option<denominations::Model>,
) -> Result<Transaction, StoreError> {
    let transaction_type = row
        .transaction_type
        .parse()
        .map_err(|e| StoreError::Corrupt(format!("transaction {}: {e}", row.id)))?;
    let counts = counts.ok_or_else(|| {
        StoreError::Corrupt(format!("transaction {} has no denomination breakdown", row.id))
    })?;

    let raw: [i64; DENOMINATION_COUNT] = [
        counts.count_10000,
        counts.count_5000,
        counts.count_1000,
        counts.count_500,
        counts.count_100,
        counts.count_50,
        counts.count_10,
        counts.count_5,
        counts.count_1,
    ];
    let mut breakdown = [0u32; DENOMINATION_COUNT];
    for (slot, value) in breakdown.iter_mut().zip(raw) {
        *slot = u32::try_from(value).map_err(|_| {
            StoreError::Corrupt(format!("transaction {} has count {value}", row.id))
        })?;
    }

    Ok(Transaction {
        id: TransactionId::new(row.id),
        date: row.transaction_date,
        transaction_type,
        amount: row.amount,
        summary: row.summary,
        memo: row.memo,
        recipient: row.recipient,
        breakdown: DenominationBreakdown::from_counts(breakdown),
        running_balance: row.running_balance,
    })
}

fn store_error(err: DbErr) -> StoreError {
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => {
            error!(error = %err, "database unreachable");
            StoreError::Unavailable(err.to_string())
        }
        other => {
            error!(error = %other, "database operation failed");
            StoreError::Backend(other.to_string())
        }
    }
}
