//! CSV import and export of the cash box ledger.
//!
//! Import is row-level: bad rows are reported and skipped, the rest are
//! written in one batch. Export is a faithful projection of what
//! [`LedgerStore::list`](crate::ledger::LedgerStore::list) returns.

pub mod export;
pub mod import;
pub mod row;


pub use export::{export_inventory, export_transactions, write_inventory, write_transactions};
pub use import::{ImportReport, ImportRowError, RowFailure, import_csv, import_rows, read_rows};
pub use row::{CashRow, INVENTORY_COLUMNS, InventoryRow, TRANSACTION_COLUMNS};
