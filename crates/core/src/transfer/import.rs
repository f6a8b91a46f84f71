//! Row-level import.
//!
//! Each row is parsed and validated on its own. Rejected rows are reported
//! with their 1-based position among the data rows; every accepted row is
//! then written in a single batch.

use std::io;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use tracing::{info, warn};

use crate::ledger::{LedgerError, LedgerRepository, LedgerStore, Transaction, TransactionType, validate_entry};

use super::row::CashRow;

/// Why a row was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowFailure {
    /// The row could not be parsed.
    Malformed {
        /// Parser message.
        reason: String,
    },
    /// The amount's sign contradicts the type.
    InvalidSign {
        /// Declared type.
        #[serde(rename = "type")]
        transaction_type: TransactionType,
        /// Declared amount.
        amount: i64,
    },
    /// The breakdown does not add up to the amount.
    Mismatch {
        /// `|amount|`.
        expected: u64,
        /// Breakdown face value.
        actual: u64,
    },
}

/// A rejected row and its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRowError {
    /// 1-based data row index, header excluded.
    pub index: usize,
    /// What was wrong with it.
    #[serde(flatten)]
    pub failure: RowFailure,
}

/// Outcome of an import.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    /// Transactions written, in row order.
    pub committed: Vec<Transaction>,
    /// Rows that were rejected.
    pub failures: Vec<ImportRowError>,
}

impl ImportReport {
    /// Number of rows written.
    #[must_use]
    pub fn committed_count(&self) -> usize {
        self.committed.len()
    }
}

/// Free-text columns keep their surrounding whitespace.
const VERBATIM_COLUMNS: [&str; 3] = ["summary", "memo", "recipient"];

/// Parses CSV with a header line into one result per data row.
///
/// Headers and the date, type, amount and count fields are trimmed.
pub fn read_rows<R: io::Read>(input: R) -> Vec<Result<CashRow, RowFailure>> {
    let mut reader = ReaderBuilder::new().trim(Trim::Headers).from_reader(input);
    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => return vec![Err(malformed(&e))],
    };
    let verbatim: Vec<bool> = headers
        .iter()
        .map(|name| VERBATIM_COLUMNS.contains(&name))
        .collect();

    reader
        .records()
        .map(|record| {
            let record = record.map_err(|e| malformed(&e))?;
            let fields: StringRecord = record
                .iter()
                .enumerate()
                .map(|(i, field)| {
                    if verbatim.get(i).copied().unwrap_or(false) {
                        field
                    } else {
                        field.trim()
                    }
                })
                .collect();
            fields
                .deserialize::<CashRow>(Some(&headers))
                .map_err(|e| malformed(&e))
        })
        .collect()
}

fn malformed(err: &csv::Error) -> RowFailure {
    RowFailure::Malformed {
        reason: err.to_string(),
    }
}

/// Validates every row and commits the valid ones in one batch.
///
/// # Errors
///
/// Returns a storage error if the batch cannot be written; in that case no row
/// from this import is stored.
pub async fn import_rows<R, I>(store: &LedgerStore<R>, rows: I) -> Result<ImportReport, LedgerError>
where
    R: LedgerRepository,
    I: IntoIterator<Item = Result<CashRow, RowFailure>>,
{
    let mut accepted = Vec::new();
    let mut failures = Vec::new();

    for (position, row) in rows.into_iter().enumerate() {
        let index = position + 1;
        let (draft, breakdown) = match row {
            Ok(row) => row.into_entry(),
            Err(failure) => {
                failures.push(ImportRowError { index, failure });
                continue;
            }
        };
        match validate_entry(&draft, &breakdown) {
            Ok(()) => accepted.push((draft, breakdown)),
            Err(LedgerError::InvalidSign {
                transaction_type,
                amount,
            }) => failures.push(ImportRowError {
                index,
                failure: RowFailure::InvalidSign {
                    transaction_type,
                    amount,
                },
            }),
            Err(LedgerError::Mismatch(m)) => failures.push(ImportRowError {
                index,
                failure: RowFailure::Mismatch {
                    expected: m.expected,
                    actual: m.actual,
                },
            }),
            Err(other) => return Err(other),
        }
    }

    if !failures.is_empty() {
        warn!(rejected = failures.len(), "import rows rejected");
    }
    let committed = store.create_batch(accepted).await?;
    info!(committed = committed.len(), rejected = failures.len(), "import finished");

    Ok(ImportReport {
        committed,
        failures,
    })
}

/// Reads CSV from `input` and imports it.
///
/// # Errors
///
/// See [`import_rows`].
pub async fn import_csv<R, In>(store: &LedgerStore<R>, input: In) -> Result<ImportReport, LedgerError>
where
    R: LedgerRepository,
    In: io::Read,
{
    import_rows(store, read_rows(input)).await
}
