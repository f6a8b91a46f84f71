//! Flat row shapes for CSV import and export.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cash::{DENOMINATION_COUNT, DenominationBreakdown};
use crate::ledger::{Transaction, TransactionDraft, TransactionType};

/// Header of the transaction CSV, in column order.
pub const TRANSACTION_COLUMNS: [&str; 16] = [
    "date",
    "type",
    "amount",
    "summary",
    "memo",
    "recipient",
    "10000",
    "5000",
    "1000",
    "500",
    "100",
    "50",
    "10",
    "5",
    "1",
    "running_balance",
];

/// Header of the inventory CSV, in column order.
pub const INVENTORY_COLUMNS: [&str; 3] = ["denomination", "count", "subtotal"];

/// One transaction as a flat record.
///
/// Denomination columns are headed by face value. Empty cells count as zero.
/// `running_balance` is written on export and ignored on import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashRow {
    /// Booking date, `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// `deposit`/`withdrawal` (also `入金`/`出金`).
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Signed amount in minor units.
    pub amount: i64,
    /// Short description.
    #[serde(default)]
    pub summary: String,
    /// Free-form note.
    #[serde(default)]
    pub memo: String,
    /// Who received or handed over the cash.
    #[serde(default)]
    pub recipient: String,
    /// Count of 10000 pieces.
    #[serde(rename = "10000", default)]
    pub count_10000: Option<u32>,
    /// Count of 5000 pieces.
    #[serde(rename = "5000", default)]
    pub count_5000: Option<u32>,
    /// Count of 1000 pieces.
    #[serde(rename = "1000", default)]
    pub count_1000: Option<u32>,
    /// Count of 500 pieces.
    #[serde(rename = "500", default)]
    pub count_500: Option<u32>,
    /// Count of 100 pieces.
    #[serde(rename = "100", default)]
    pub count_100: Option<u32>,
    /// Count of 50 pieces.
    #[serde(rename = "50", default)]
    pub count_50: Option<u32>,
    /// Count of 10 pieces.
    #[serde(rename = "10", default)]
    pub count_10: Option<u32>,
    /// Count of 5 pieces.
    #[serde(rename = "5", default)]
    pub count_5: Option<u32>,
    /// Count of 1 pieces.
    #[serde(rename = "1", default)]
    pub count_1: Option<u32>,
    /// Balance after this transaction. Export only.
    #[serde(default)]
    pub running_balance: Option<i64>,
}

impl CashRow {
    /// Denomination counts, ordered like [`crate::cash::Denomination::ALL`].
    #[must_use]
    pub fn counts(&self) -> [u32; DENOMINATION_COUNT] {
        [
            self.count_10000,
            self.count_5000,
            self.count_1000,
            self.count_500,
            self.count_100,
            self.count_50,
            self.count_10,
            self.count_5,
            self.count_1,
        ]
        .map(|c| c.unwrap_or(0))
    }

    /// The breakdown this row declares.
    #[must_use]
    pub fn breakdown(&self) -> DenominationBreakdown {
        DenominationBreakdown::from_counts(self.counts())
    }

    /// Splits the row into a draft and its breakdown. The running balance is
    /// dropped.
    #[must_use]
    pub fn into_entry(self) -> (TransactionDraft, DenominationBreakdown) {
        let breakdown = self.breakdown();
        let draft = TransactionDraft {
            date: self.date,
            transaction_type: self.transaction_type,
            amount: self.amount,
            summary: self.summary,
            memo: self.memo,
            recipient: self.recipient,
        };
        (draft, breakdown)
    }
}

impl From<&Transaction> for CashRow {
    fn from(tx: &Transaction) -> Self {
        let [c10000, c5000, c1000, c500, c100, c50, c10, c5, c1] = *tx.breakdown.counts();
        Self {
            date: tx.date,
            transaction_type: tx.transaction_type,
            amount: tx.amount,
            summary: tx.summary.clone(),
            memo: tx.memo.clone(),
            recipient: tx.recipient.clone(),
            count_10000: Some(c10000),
            count_5000: Some(c5000),
            count_1000: Some(c1000),
            count_500: Some(c500),
            count_100: Some(c100),
            count_50: Some(c50),
            count_10: Some(c10),
            count_5: Some(c5),
            count_1: Some(c1),
            running_balance: Some(tx.running_balance),
        }
    }
}

/// One line of the inventory export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRow {
    /// Face value.
    pub denomination: u32,
    /// Net count on hand.
    pub count: i64,
    /// `denomination * count`.
    pub subtotal: i64,
}
