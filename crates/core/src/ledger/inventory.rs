//! On-hand inventory derived from the full transaction history.

use crate::cash::{DENOMINATION_COUNT, DENOMINATION_SET_VERSION, Denomination, DenominationBreakdown};

use super::types::Transaction;

/// Net count of each denomination in the box.
///
/// Counts may go negative when history records more of a denomination leaving
/// than ever arrived. That is a shortfall: surfaced through
/// [`InventorySnapshot::shortfalls`], never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventorySnapshot {
    counts: [i64; DENOMINATION_COUNT],
    set_version: u32,
}

impl Default for InventorySnapshot {
    fn default() -> Self {
        Self {
            counts: [0; DENOMINATION_COUNT],
            set_version: DENOMINATION_SET_VERSION,
        }
    }
}

impl InventorySnapshot {
    /// Net count of one denomination.
    #[must_use]
    pub const fn count(&self, denomination: Denomination) -> i64 {
        self.counts[denomination.index()]
    }

    /// Iterates `(denomination, net count)` pairs, highest value first.
    pub fn iter(&self) -> impl Iterator<Item = (Denomination, i64)> + '_ {
        Denomination::ALL
            .into_iter()
            .map(|d| (d, self.counts[d.index()]))
    }

    /// Face value of everything in the box.
    ///
    /// Clamps at the `i64` bounds. Over reconciled rows this equals the last
    /// running balance, which the store already keeps in range.
    #[must_use]
    pub fn total_value(&self) -> i64 {
        self.iter()
            .map(|(d, count)| count.saturating_mul(i64::from(d.value())))
            .fold(0i64, i64::saturating_add)
    }

    /// Denominations with a negative net count.
    #[must_use]
    pub fn shortfalls(&self) -> Vec<Denomination> {
        self.iter()
            .filter(|&(_, count)| count < 0)
            .map(|(d, _)| d)
            .collect()
    }

    /// Returns true when any denomination is short.
    #[must_use]
    pub fn has_shortfall(&self) -> bool {
        self.counts.iter().any(|&c| c < 0)
    }

    /// Version of the denomination set this snapshot was computed against.
    #[must_use]
    pub const fn set_version(&self) -> u32 {
        self.set_version
    }

    /// Compares a physical count of the box against this snapshot.
    ///
    /// The value difference clamps at the `i64` bounds like
    /// [`total_value`](Self::total_value).
    #[must_use]
    pub fn difference(&self, counted: &DenominationBreakdown) -> CountDifference {
        let mut per_denomination = [0i64; DENOMINATION_COUNT];
        for (d, counted) in counted.iter() {
            per_denomination[d.index()] = i64::from(counted) - self.counts[d.index()];
        }
        let value = Denomination::ALL
            .into_iter()
            .map(|d| per_denomination[d.index()].saturating_mul(i64::from(d.value())))
            .fold(0i64, i64::saturating_add);
        CountDifference {
            per_denomination,
            value,
        }
    }
}

/// Physical count minus expected inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountDifference {
    per_denomination: [i64; DENOMINATION_COUNT],
    value: i64,
}

impl CountDifference {
    /// `counted - expected` for one denomination.
    #[must_use]
    pub const fn count(&self, denomination: Denomination) -> i64 {
        self.per_denomination[denomination.index()]
    }

    /// Total value difference. Positive means more cash than recorded.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.value
    }

    /// Denominations whose count disagrees, with the signed difference.
    #[must_use]
    pub fn discrepancies(&self) -> Vec<(Denomination, i64)> {
        Denomination::ALL
            .into_iter()
            .map(|d| (d, self.per_denomination[d.index()]))
            .filter(|&(_, diff)| diff != 0)
            .collect()
    }

    /// Returns true when the physical count matches exactly.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.per_denomination.iter().all(|&d| d == 0)
    }
}

/// Derives the inventory from the complete history.
///
/// Deposits add their breakdown counts, withdrawals subtract them.
#[must_use]
pub fn aggregate(transactions: &[Transaction]) -> InventorySnapshot {
    let mut snapshot = InventorySnapshot::default();
    for tx in transactions {
        let sign = tx.transaction_type.sign();
        for (d, count) in tx.breakdown.iter() {
            snapshot.counts[d.index()] += sign * i64::from(count);
        }
    }
    snapshot
}
