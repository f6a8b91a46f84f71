//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes over the ledger store
//! - CSV import and export endpoints
//! - JSON error responses

pub mod error;
pub mod routes;

pub use error::ApiError;

use std::sync::Arc;

use axum::Router;
use cashbox_core::ledger::{LedgerRepository, LedgerStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Largest accepted request body. Bounds CSV imports.
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Application state shared across handlers.
pub struct AppState<R> {
    /// The ledger store every handler goes through.
    pub store: Arc<LedgerStore<R>>,
}

impl<R> AppState<R> {
    /// Wraps a store for sharing across handlers.
    pub fn new(store: LedgerStore<R>) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

// Derived Clone would require `R: Clone`.
impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

/// Creates the main application router.
pub fn create_router<R: LedgerRepository>(state: AppState<R>) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes::<R>())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
