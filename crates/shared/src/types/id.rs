//! Typed IDs for type-safe entity references.
//!
//! Transaction ids are assigned by storage from an autoincrement sequence, so
//! they are plain integers that only ever grow. Wrapping them keeps a row id
//! from being mixed up with an amount or a count.

use serde::{Deserialize, Serialize};

/// Unique identifier for a cash box transaction.
///
/// Ordering follows assignment order, which is what the ledger uses to break
/// ties between transactions booked on the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub i64);

impl TransactionId {
    /// Wraps a raw storage id.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw storage id.
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl From<i64> for TransactionId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TransactionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}
