//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cashbox_core::ledger::LedgerError;
use serde_json::{Value, json};
use tracing::error;

/// Errors returned by route handlers.
///
/// Every variant renders as `{ "error": CODE, "message": text }`, plus a
/// `details` object when there is structured context to report.
#[derive(Debug)]
pub enum ApiError {
    /// A ledger operation failed.
    Ledger(LedgerError),
    /// The request itself is unusable.
    BadRequest {
        /// Machine-readable code.
        code: &'static str,
        /// Human-readable explanation.
        message: String,
    },
    /// Something failed on our side outside the ledger.
    Internal(String),
}

impl ApiError {
    /// Shorthand for [`ApiError::BadRequest`].
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Ledger(err) => StatusCode::from_u16(err.http_status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Ledger(err) => err.error_code(),
            Self::BadRequest { code, .. } => code,
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            Self::Ledger(LedgerError::Mismatch(m)) => Some(json!({
                "expected": m.expected,
                "actual": m.actual,
            })),
            Self::Ledger(LedgerError::InvalidSign {
                transaction_type,
                amount,
            }) => Some(json!({
                "type": transaction_type,
                "amount": amount,
            })),
            Self::Ledger(LedgerError::NotFound(id)) => Some(json!({ "id": id })),
            Self::Ledger(LedgerError::BalanceOverflow(overflow)) => Some(json!(overflow)),
            Self::Ledger(err) if err.is_retryable() => Some(json!({ "retryable": true })),
            _ => None,
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self::Ledger(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ledger(err) => err.fmt(f),
            Self::BadRequest { message, .. } => f.write_str(message),
            Self::Internal(message) => write!(f, "Internal error: {message}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        }

        let mut body = json!({
            "error": self.code(),
            "message": self.to_string(),
        });
        if let Some(details) = self.details() {
            body["details"] = details;
        }
        (status, Json(body)).into_response()
    }
}
