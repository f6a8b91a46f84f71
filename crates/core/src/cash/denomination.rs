//! The closed set of physical cash denominations.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version of the denomination set below. Bumped whenever a variant is added
/// or removed so stored snapshots can be compared against the set they used.
pub const DENOMINATION_SET_VERSION: u32 = 1;

/// Number of denominations in the current set.
pub const DENOMINATION_COUNT: usize = 9;

/// A banknote or coin, highest value first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Denomination {
    /// 10000 note.
    TenThousand,
    /// 5000 note.
    FiveThousand,
    /// 1000 note.
    OneThousand,
    /// 500 coin.
    FiveHundred,
    /// 100 coin.
    OneHundred,
    /// 50 coin.
    Fifty,
    /// 10 coin.
    Ten,
    /// 5 coin.
    Five,
    /// 1 coin.
    One,
}

/// A face value that is not part of the denomination set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown denomination: {0}")]
pub struct UnknownDenomination(pub u32);

impl Denomination {
    /// Every denomination, highest value first.
    pub const ALL: [Self; DENOMINATION_COUNT] = [
        Self::TenThousand,
        Self::FiveThousand,
        Self::OneThousand,
        Self::FiveHundred,
        Self::OneHundred,
        Self::Fifty,
        Self::Ten,
        Self::Five,
        Self::One,
    ];

    /// Face value in minor currency units.
    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            Self::TenThousand => 10_000,
            Self::FiveThousand => 5_000,
            Self::OneThousand => 1_000,
            Self::FiveHundred => 500,
            Self::OneHundred => 100,
            Self::Fifty => 50,
            Self::Ten => 10,
            Self::Five => 5,
            Self::One => 1,
        }
    }

    /// Position in [`Denomination::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Looks up a denomination by face value.
    #[must_use]
    pub fn from_value(value: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.value() == value)
    }
}

impl TryFrom<u32> for Denomination {
    type Error = UnknownDenomination;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or(UnknownDenomination(value))
    }
}

impl From<Denomination> for u32 {
    fn from(denomination: Denomination) -> Self {
        denomination.value()
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}
