//! HTTP API layer with Axum routes.
//!
//! This crate exposes the ledger commands and queries as JSON endpoints
//! under `/api/v1`.

pub mod extractors;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use pitaka_core::LedgerService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The process-wide ledger service.
    pub ledger: Arc<LedgerService>,
    /// Whether `POST /reset` is enabled.
    pub allow_reset: bool,
}

impl AppState {
    /// Wraps a ledger service for the router.
    #[must_use]
    pub fn new(ledger: Arc<LedgerService>, allow_reset: bool) -> Self {
        Self {
            ledger,
            allow_reset,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
