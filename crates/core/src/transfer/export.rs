//! Flat projections of the ledger for export.

use std::io;

use csv::WriterBuilder;

use crate::ledger::{InventorySnapshot, Transaction};

use super::row::{CashRow, INVENTORY_COLUMNS, InventoryRow, TRANSACTION_COLUMNS};

/// Projects transactions into rows, preserving order.
#[must_use]
pub fn export_transactions(transactions: &[Transaction]) -> Vec<CashRow> {
    transactions.iter().map(CashRow::from).collect()
}

/// Projects an inventory snapshot into one row per denomination.
#[must_use]
pub fn export_inventory(snapshot: &InventorySnapshot) -> Vec<InventoryRow> {
    snapshot
        .iter()
        .map(|(d, count)| InventoryRow {
            denomination: d.value(),
            count,
            subtotal: count.saturating_mul(i64::from(d.value())),
        })
        .collect()
}

/// Writes transactions as CSV with a header line.
///
/// # Errors
///
/// Returns an error if serialization or the underlying writer fails.
pub fn write_transactions<W: io::Write>(
    output: W,
    transactions: &[Transaction],
) -> Result<(), csv::Error> {
    write_all(output, &TRANSACTION_COLUMNS, export_transactions(transactions))
}

/// Writes the inventory as CSV with a header line.
///
/// # Errors
///
/// Returns an error if serialization or the underlying writer fails.
pub fn write_inventory<W: io::Write>(
    output: W,
    snapshot: &InventorySnapshot,
) -> Result<(), csv::Error> {
    write_all(output, &INVENTORY_COLUMNS, export_inventory(snapshot))
}

/// An empty export still has its header line.
fn write_all<W: io::Write, T: serde::Serialize>(
    output: W,
    columns: &[&str],
    rows: Vec<T>,
) -> Result<(), csv::Error> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(output);
    writer.write_record(columns)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
