//! Physical cash: denominations and per-transaction breakdowns.

pub mod breakdown;
pub mod denomination;

pub use breakdown::DenominationBreakdown;
pub use denomination::{
    DENOMINATION_COUNT, DENOMINATION_SET_VERSION, Denomination, UnknownDenomination,
};
