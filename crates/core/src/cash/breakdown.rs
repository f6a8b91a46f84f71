//! Per-denomination counts backing one transaction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::denomination::{DENOMINATION_COUNT, Denomination, UnknownDenomination};

/// Non-negative count of each denomination handed over in one transaction.
///
/// Stored as a fixed array indexed by [`Denomination::index`]. On the wire it
/// is a map from face value to count; keys outside the denomination set are
/// rejected and missing keys count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<u32, u32>", into = "BTreeMap<u32, u32>")]
pub struct DenominationBreakdown {
    counts: [u32; DENOMINATION_COUNT],
}

impl DenominationBreakdown {
    /// A breakdown with every count at zero.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            counts: [0; DENOMINATION_COUNT],
        }
    }

    /// Builds a breakdown from counts ordered like [`Denomination::ALL`].
    #[must_use]
    pub const fn from_counts(counts: [u32; DENOMINATION_COUNT]) -> Self {
        Self { counts }
    }

    /// Returns a copy with `denomination` set to `count`.
    #[must_use]
    pub const fn with(mut self, denomination: Denomination, count: u32) -> Self {
        self.counts[denomination.index()] = count;
        self
    }

    /// Sets the count for one denomination.
    pub fn set(&mut self, denomination: Denomination, count: u32) {
        self.counts[denomination.index()] = count;
    }

    /// Count for one denomination.
    #[must_use]
    pub const fn count(&self, denomination: Denomination) -> u32 {
        self.counts[denomination.index()]
    }

    /// All counts, ordered like [`Denomination::ALL`].
    #[must_use]
    pub const fn counts(&self) -> &[u32; DENOMINATION_COUNT] {
        &self.counts
    }

    /// Iterates `(denomination, count)` pairs, highest value first.
    pub fn iter(&self) -> impl Iterator<Item = (Denomination, u32)> + '_ {
        Denomination::ALL
            .into_iter()
            .map(|d| (d, self.counts[d.index()]))
    }

    /// Total face value of the breakdown.
    #[must_use]
    pub fn total_value(&self) -> u64 {
        self.iter()
            .map(|(d, count)| u64::from(count) * u64::from(d.value()))
            .sum()
    }
}

impl TryFrom<BTreeMap<u32, u32>> for DenominationBreakdown {
    type Error = UnknownDenomination;

    fn try_from(map: BTreeMap<u32, u32>) -> Result<Self, Self::Error> {
        let mut breakdown = Self::empty();
        for (value, count) in map {
            breakdown.set(Denomination::try_from(value)?, count);
        }
        Ok(breakdown)
    }
}

impl From<DenominationBreakdown> for BTreeMap<u32, u32> {
    fn from(breakdown: DenominationBreakdown) -> Self {
        breakdown.iter().map(|(d, c)| (d.value(), c)).collect()
    }
}
