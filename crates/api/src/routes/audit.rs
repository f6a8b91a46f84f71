//! Consistency audit routes.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use cashbox_core::ledger::{AuditReport, LedgerRepository};
use serde_json::{Value, json};

use crate::{AppState, error::ApiError};

/// Creates the audit routes.
pub fn routes<R: LedgerRepository>() -> Router<AppState<R>> {
    Router::new()
        .route("/audit", get(run_audit::<R>))
        .route("/audit/repair", post(repair_balances::<R>))
}

/// GET `/audit` - Check stored rows against the ledger invariants.
async fn run_audit<R: LedgerRepository>(
    State(state): State<AppState<R>>,
) -> Result<Json<AuditReport>, ApiError> {
    Ok(Json(state.store.audit().await?))
}

/// POST `/audit/repair` - Rewrite stale running balances.
async fn repair_balances<R: LedgerRepository>(
    State(state): State<AppState<R>>,
) -> Result<Json<Value>, ApiError> {
    let repaired = state.store.repair_balances().await?;
    Ok(Json(json!({ "repaired": repaired })))
}
