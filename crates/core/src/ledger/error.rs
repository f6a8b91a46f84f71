//! Ledger error types for validation, lookup and storage failures.

use std::time::Duration;

use cashbox_shared::TransactionId;
use thiserror::Error;

use super::balance::BalanceOverflow;
use super::reconcile::MismatchError;
use super::repository::StoreError;
use super::types::TransactionType;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// The breakdown does not add up to the declared amount.
    #[error(transparent)]
    Mismatch(#[from] MismatchError),

    /// The amount's sign contradicts the transaction type.
    #[error("{transaction_type} amount must be {sign}, got {amount}", sign = .transaction_type.expected_sign())]
    InvalidSign {
        /// Declared type.
        transaction_type: TransactionType,
        /// Declared amount.
        amount: i64,
    },

    /// The write would push a running balance out of range.
    #[error(transparent)]
    BalanceOverflow(#[from] BalanceOverflow),

    // ========== Lookup Errors ==========
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    NotFound(TransactionId),

    // ========== Storage Errors ==========
    /// The write did not finish within the configured bound.
    #[error("Ledger write timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Storage could not be reached.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Commit failed after it was issued. The write may have landed.
    #[error("Commit outcome unknown: {0}")]
    CommitUnknown(String),

    /// Storage failed in a way retrying will not fix.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Mismatch(_) => "DENOMINATION_MISMATCH",
            Self::InvalidSign { .. } => "INVALID_SIGN",
            Self::BalanceOverflow(_) => "BALANCE_OVERFLOW",
            Self::NotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::Timeout(_) => "WRITE_TIMEOUT",
            Self::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            Self::CommitUnknown(_) => "COMMIT_OUTCOME_UNKNOWN",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 422 Unprocessable Entity - rejected entries
            Self::Mismatch(_) | Self::InvalidSign { .. } | Self::BalanceOverflow(_) => 422,

            // 404 Not Found
            Self::NotFound(_) => 404,

            // 503 Service Unavailable - transient
            Self::Timeout(_) | Self::StorageUnavailable(_) => 503,

            // 500 Internal Server Error
            Self::CommitUnknown(_) | Self::Storage(_) => 500,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::StorageUnavailable(_))
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => Self::StorageUnavailable(msg),
            other @ (StoreError::Backend(_) | StoreError::Corrupt(_)) => {
                Self::Storage(other.to_string())
            }
        }
    }
}
