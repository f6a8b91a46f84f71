//! Transaction management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use cashbox_core::cash::DenominationBreakdown;
use cashbox_core::ledger::{LedgerRepository, TransactionDraft, TransactionType};
use cashbox_shared::{DateRange, TransactionId};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::ApiError};

/// Creates the transaction routes.
pub fn routes<R: LedgerRepository>() -> Router<AppState<R>> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions::<R>).post(create_transaction::<R>),
        )
        .route(
            "/transactions/{id}",
            get(get_transaction::<R>)
                .put(update_transaction::<R>)
                .delete(delete_transaction::<R>),
        )
}

// ============================================================================
// Request Types
// ============================================================================

/// Date filter shared by listing and export.
///
/// `month` (`YYYY-MM`) takes precedence over `from`/`to`.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    /// First date included (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Last date included (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
    /// Whole calendar month.
    pub month: Option<String>,
}

impl RangeQuery {
    /// Resolves the query into a date range.
    pub fn range(&self) -> Result<DateRange, ApiError> {
        match &self.month {
            Some(month) => DateRange::parse_month(month)
                .map_err(|e| ApiError::bad_request("INVALID_MONTH", e.to_string())),
            None => Ok(DateRange::new(self.from, self.to)),
        }
    }
}

/// Request body for creating or replacing a transaction.
#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    /// Booking date.
    pub date: NaiveDate,
    /// Deposit or withdrawal.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Signed amount in minor units.
    pub amount: i64,
    /// Short description.
    #[serde(default)]
    pub summary: String,
    /// Free-form note.
    #[serde(default)]
    pub memo: String,
    /// Counterparty.
    #[serde(default)]
    pub recipient: String,
    /// Pieces handled, keyed by face value.
    #[serde(default)]
    pub breakdown: DenominationBreakdown,
}

impl EntryRequest {
    fn into_parts(self) -> (TransactionDraft, DenominationBreakdown) {
        let draft = TransactionDraft {
            date: self.date,
            transaction_type: self.transaction_type,
            amount: self.amount,
            summary: self.summary,
            memo: self.memo,
            recipient: self.recipient,
        };
        (draft, self.breakdown)
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/transactions` - List transactions in canonical order.
async fn list_transactions<R: LedgerRepository>(
    State(state): State<AppState<R>>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let range = query.range()?;
    let transactions = state.store.list(&range).await?;
    Ok(Json(json!({ "transactions": transactions })))
}

/// POST `/transactions` - Record a new transaction.
async fn create_transaction<R: LedgerRepository>(
    State(state): State<AppState<R>>,
    Json(payload): Json<EntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (draft, breakdown) = payload.into_parts();
    let transaction = state.store.create(draft, breakdown).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// GET `/transactions/{id}` - Fetch one transaction.
async fn get_transaction<R: LedgerRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction = state.store.get(TransactionId::new(id)).await?;
    Ok(Json(transaction))
}

/// PUT `/transactions/{id}` - Replace a transaction and its breakdown.
async fn update_transaction<R: LedgerRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<i64>,
    Json(payload): Json<EntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (draft, breakdown) = payload.into_parts();
    let transaction = state
        .store
        .update(TransactionId::new(id), draft, breakdown)
        .await?;
    Ok(Json(transaction))
}

/// DELETE `/transactions/{id}` - Remove a transaction.
async fn delete_transaction<R: LedgerRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete(TransactionId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
