//! CSV import and export routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
};
use cashbox_core::ledger::LedgerRepository;
use cashbox_core::transfer::{ImportReport, import_csv, write_inventory, write_transactions};

use super::transactions::RangeQuery;
use crate::{AppState, error::ApiError};

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Creates the import/export routes.
pub fn routes<R: LedgerRepository>() -> Router<AppState<R>> {
    Router::new()
        .route("/import", post(import::<R>))
        .route("/export/transactions", get(export_transactions::<R>))
        .route("/export/inventory", get(export_inventory::<R>))
}

/// POST `/import` - Import a CSV body. Bad rows are reported, not fatal.
async fn import<R: LedgerRepository>(
    State(state): State<AppState<R>>,
    body: String,
) -> Result<Json<ImportReport>, ApiError> {
    let report = import_csv(&state.store, body.as_bytes()).await?;
    Ok(Json(report))
}

/// GET `/export/transactions` - Transactions as CSV, canonical order.
async fn export_transactions<R: LedgerRepository>(
    State(state): State<AppState<R>>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = state.store.list(&query.range()?).await?;
    let mut buffer = Vec::new();
    write_transactions(&mut buffer, &transactions)
        .map_err(|e| ApiError::Internal(format!("CSV export failed: {e}")))?;
    Ok(([(header::CONTENT_TYPE, CSV_CONTENT_TYPE)], buffer))
}

/// GET `/export/inventory` - Current inventory as CSV.
async fn export_inventory<R: LedgerRepository>(
    State(state): State<AppState<R>>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.store.current_inventory().await?;
    let mut buffer = Vec::new();
    write_inventory(&mut buffer, &snapshot)
        .map_err(|e| ApiError::Internal(format!("CSV export failed: {e}")))?;
    Ok(([(header::CONTENT_TYPE, CSV_CONTENT_TYPE)], buffer))
}
