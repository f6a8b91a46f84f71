//! Cash box ledger engine.
//!
//! This module implements the core ledger functionality:
//! - Domain types for transactions
//! - Denomination reconciliation
//! - Running balance recomputation
//! - Inventory aggregation
//! - Consistency audit
//! - The storage seam and an in-memory implementation
//! - The ledger store that serializes and commits every mutation

pub mod audit;
pub mod balance;
pub mod error;
pub mod inventory;
pub mod memory;
pub mod reconcile;
pub mod repository;
pub mod store;
pub mod types;

#[cfg(test)]
mod balance_props;
#[cfg(test)]
mod reconcile_props;

pub use audit::{AuditReport, SignViolation, UnreconciledRow};
pub use balance::{BalanceChange, BalanceOverflow, canonical_order, recompute, verify_chain};
pub use error::LedgerError;
pub use inventory::{CountDifference, InventorySnapshot, aggregate};
pub use memory::InMemoryLedgerRepository;
pub use reconcile::{MismatchError, reconcile, validate_entry};
pub use repository::{LedgerRepository, LedgerUnit, StoreError};
pub use store::LedgerStore;
pub use types::{ParseTransactionTypeError, Transaction, TransactionDraft, TransactionType};
