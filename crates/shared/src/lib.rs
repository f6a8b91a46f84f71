//! Shared types and configuration for the cash box ledger.
//!
//! This crate provides common types used across all other crates:
//! - Typed transaction ids
//! - Inclusive date ranges for history queries
//! - Configuration management

pub mod config;
pub mod types;

pub use config::{AppConfig, DatabaseConfig, LedgerConfig, ServerConfig};
pub use types::{DateRange, DateRangeError, TransactionId};
