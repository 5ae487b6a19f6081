//! Ledger views, display ordering, balance, and reset.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use pitaka_core::ledger::LedgerKind;
use pitaka_shared::AppError;
use pitaka_shared::types::LedgerEntryId;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::app_error_response;
use crate::AppState;
use crate::extractors::{ApiJson, ApiPath};

/// Creates the ledger routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ledgers", get(list_ledgers))
        .route("/ledgers/{name}", get(get_ledger))
        .route("/ledgers/{name}/order", put(set_ledger_order))
        .route("/balance", get(get_balance))
        .route("/credits", get(list_credits))
        .route("/credits/order", put(set_credits_order))
        .route("/reset", post(reset))
}

/// Request body for replacing a display order.
#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    /// Entry ids in the wanted order.
    pub entry_ids: Vec<LedgerEntryId>,
}

/// GET `/ledgers` - All four ledgers with balances and ordered entries.
async fn list_ledgers(State(state): State<AppState>) -> Response {
    let ledgers = state.ledger.get_all_ledgers().await;
    (StatusCode::OK, Json(json!({ "ledgers": ledgers }))).into_response()
}

/// GET `/ledgers/{name}` - One ledger; unknown names resolve to Others.
async fn get_ledger(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
) -> Response {
    let view = state.ledger.get_ledger(LedgerKind::resolve(&name)).await;
    (StatusCode::OK, Json(view)).into_response()
}

/// PUT `/ledgers/{name}/order` - Replace one ledger's display order.
async fn set_ledger_order(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
    ApiJson(payload): ApiJson<OrderRequest>,
) -> Response {
    let kind = LedgerKind::resolve(&name);
    let outcome = state.ledger.set_manual_order(kind, &payload.entry_ids).await;
    (
        StatusCode::OK,
        Json(json!({
            "ledger": kind,
            "persisted": outcome.persisted
        })),
    )
        .into_response()
}

/// GET `/balance` - Sum of all four balances.
async fn get_balance(State(state): State<AppState>) -> Response {
    let total = state.ledger.total_balance().await;
    (StatusCode::OK, Json(json!({ "total_balance": total }))).into_response()
}

/// GET `/credits` - Every credit entry in display order.
async fn list_credits(State(state): State<AppState>) -> Response {
    let credits = state.ledger.all_credits_ordered().await;
    (StatusCode::OK, Json(json!({ "entries": credits }))).into_response()
}

/// PUT `/credits/order` - Replace the all-credits display order.
async fn set_credits_order(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<OrderRequest>,
) -> Response {
    let outcome = state.ledger.set_all_credits_order(&payload.entry_ids).await;
    (
        StatusCode::OK,
        Json(json!({ "persisted": outcome.persisted })),
    )
        .into_response()
}

/// POST `/reset` - Clear every ledger; disabled unless configured.
async fn reset(State(state): State<AppState>) -> Response {
    if !state.allow_reset {
        warn!("Rejected reset request: reset is disabled");
        return app_error_response(&AppError::Forbidden("reset is disabled".to_string()));
    }

    let outcome = state.ledger.reset().await;
    (
        StatusCode::OK,
        Json(json!({
            "reset": true,
            "persisted": outcome.persisted
        })),
    )
        .into_response()
}
