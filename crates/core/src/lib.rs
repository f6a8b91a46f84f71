//! Core business logic for the cash box ledger.
//!
//! This crate contains the ledger engine with ZERO web or database
//! dependencies. Storage is reached only through the traits in
//! [`ledger::repository`].
//!
//! # Modules
//!
//! - `cash` - Denominations and per-transaction breakdowns
//! - `ledger` - Reconciliation, running balances, inventory and the store
//! - `transfer` - CSV import and export

pub mod cash;
pub mod ledger;
pub mod transfer;
