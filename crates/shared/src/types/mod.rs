//! Common types used across the application.

pub mod date_range;
pub mod id;

pub use date_range::{DateRange, DateRangeError};
pub use id::TransactionId;
