//! Health check endpoints.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use cashbox_core::ledger::LedgerRepository;
use serde::Serialize;
use tracing::warn;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Whether ledger storage answered a ping.
    pub storage: bool,
}

/// Reports liveness and storage reachability.
async fn health_check<R: LedgerRepository>(
    State(state): State<AppState<R>>,
) -> (StatusCode, Json<HealthResponse>) {
    let storage = match state.store.repository().ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "storage ping failed");
            false
        }
    };
    let (code, status) = if storage {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };
    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            storage,
        }),
    )
}

/// Creates health check routes.
pub fn routes<R: LedgerRepository>() -> Router<AppState<R>> {
    Router::new().route("/health", get(health_check::<R>))
}
