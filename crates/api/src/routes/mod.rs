//! API route definitions.

use axum::Router;
use cashbox_core::ledger::LedgerRepository;

use crate::AppState;

pub mod audit;
pub mod health;
pub mod inventory;
pub mod transactions;
pub mod transfer;

/// Creates the API router with all routes.
pub fn api_routes<R: LedgerRepository>() -> Router<AppState<R>> {
    Router::new()
        .merge(health::routes())
        .merge(transactions::routes())
        .merge(inventory::routes())
        .merge(audit::routes())
        .merge(transfer::routes())
}
