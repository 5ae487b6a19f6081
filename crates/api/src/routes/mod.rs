//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pitaka_core::ledger::LedgerError;
use pitaka_shared::AppError;
use serde_json::json;
use tracing::error;

use crate::AppState;

pub mod fees;
pub mod health;
pub mod ledgers;
pub mod transactions;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(fees::routes())
        .merge(transactions::routes())
        .merge(ledgers::routes())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// JSON error body with the given status.
pub(crate) fn error_response(status: StatusCode, code: &str, message: String) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message
        })),
    )
        .into_response()
}

/// Maps a ledger error onto an HTTP response.
///
/// Validation failures echo their message; anything else is logged and
/// reported generically.
fn ledger_error_response(err: &LedgerError) -> Response {
    if err.is_validation() {
        let status =
            StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::BAD_REQUEST);
        return error_response(status, err.error_code(), err.to_string());
    }

    error!(error = %err, code = err.error_code(), "Ledger command failed");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        err.error_code(),
        "An error occurred".to_string(),
    )
}

/// Maps an application error onto an HTTP response.
fn app_error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    error_response(status, err.error_code(), err.to_string())
}
