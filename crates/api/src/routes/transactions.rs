//! Transaction routes: record, inspect, and delete.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use pitaka_core::ledger::LedgerError;
use pitaka_core::transaction::{FeeCalculator, FeeOption, TransactionRequest, TransactionType};
use pitaka_shared::AppError;
use pitaka_shared::types::parse_amount;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{app_error_response, ledger_error_response};
use crate::AppState;
use crate::extractors::{ApiJson, ApiPath};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", post(create_transaction))
        .route(
            "/transactions/{number}",
            get(get_transaction).delete(delete_transaction),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for recording a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Transaction type label, e.g. "Cash In".
    pub transaction_type: String,
    /// Base amount as a decimal string.
    pub amount: String,
    /// Customer total as a decimal string; quoted from the fee table if absent.
    pub customer_pays: Option<String>,
    /// Fee option used when `customer_pays` is absent.
    pub fee_option: Option<String>,
    /// Source of funds, load source or payment method.
    pub source_of_funds: String,
    /// Ledger the customer paid with.
    pub paid_with: Option<String>,
    /// Whether `paid_with` replaces Cash as the credit ledger.
    #[serde(default)]
    pub is_paid_with_checked: bool,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
}

impl CreateTransactionRequest {
    /// Parses the body into a core request.
    fn into_request(self) -> Result<TransactionRequest, LedgerError> {
        let transaction_type: TransactionType = self.transaction_type.parse()?;
        let amount = parse_amount(&self.amount)?;
        let customer_pays = match &self.customer_pays {
            Some(raw) => parse_amount(raw)?,
            None => {
                let fee_option = match &self.fee_option {
                    Some(raw) => raw.parse()?,
                    None => FeeOption::AddToAmount,
                };
                FeeCalculator::quote(transaction_type, amount, fee_option)?.customer_pays
            }
        };

        Ok(TransactionRequest {
            transaction_type,
            amount,
            customer_pays,
            source_of_funds: self.source_of_funds,
            paid_with: self.paid_with,
            is_paid_with_checked: self.is_paid_with_checked,
            notes: self.notes,
        })
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST `/transactions` - Record a transaction.
async fn create_transaction(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateTransactionRequest>,
) -> Response {
    let request = match payload.into_request() {
        Ok(request) => request,
        Err(e) => return ledger_error_response(&e),
    };

    match state.ledger.process_transaction(&request).await {
        Ok(outcome) => (
            StatusCode::CREATED,
            Json(json!({
                "transaction_number": outcome.value,
                "customer_pays": request.customer_pays,
                "persisted": outcome.persisted
            })),
        )
            .into_response(),
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/transactions/{number}` - Every entry of one transaction.
async fn get_transaction(
    State(state): State<AppState>,
    ApiPath(number): ApiPath<u64>,
) -> Response {
    let entries = state.ledger.transaction_details(number).await;
    if entries.is_empty() {
        return app_error_response(&AppError::NotFound(format!("transaction {number}")));
    }

    (
        StatusCode::OK,
        Json(json!({
            "transaction_number": number,
            "entries": entries
        })),
    )
        .into_response()
}

/// DELETE `/transactions/{number}` - Remove a transaction from every ledger.
///
/// Unknown numbers are not an error; the response reports `deleted: false`.
async fn delete_transaction(
    State(state): State<AppState>,
    ApiPath(number): ApiPath<u64>,
) -> Response {
    let outcome = state.ledger.delete_transaction(number).await;
    if outcome.value {
        info!(transaction_number = number, "Transaction deleted via API");
    }

    (
        StatusCode::OK,
        Json(json!({
            "deleted": outcome.value,
            "persisted": outcome.persisted
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{app, send};
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    async fn cash_in(app: &axum::Router, body: Value) -> (StatusCode, Value) {
        send(app, "POST", "/api/v1/transactions", Some(body)).await
    }

    #[tokio::test]
    async fn test_create_and_fetch_cash_in() {
        let app = app(false);
        let (status, body) = cash_in(
            &app,
            json!({
                "transaction_type": "Cash In",
                "amount": "1000",
                "customer_pays": "1015",
                "source_of_funds": "GCash"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["transaction_number"], 1);
        assert_eq!(body["persisted"], false);

        let (status, body) = send(&app, "GET", "/api/v1/transactions/1", None).await;
        assert_eq!(status, StatusCode::OK);
        let entries = body["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 2);

        let credit = entries.iter().find(|e| e["direction"] == "credit").unwrap();
        let debit = entries.iter().find(|e| e["direction"] == "debit").unwrap();
        assert_eq!(credit["ledger"], "Cash");
        assert_eq!(credit["amount"], "1015");
        assert_eq!(debit["ledger"], "GCash");
        assert_eq!(debit["amount"], "1000");
    }

    #[tokio::test]
    async fn test_customer_pays_defaults_to_quote() {
        let app = app(false);
        let (status, body) = cash_in(
            &app,
            json!({
                "transaction_type": "Cash Out",
                "amount": "2500",
                "source_of_funds": "PayMaya"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["customer_pays"], "2540");
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let app = app(false);
        let (status, body) = cash_in(
            &app,
            json!({
                "transaction_type": "Cash In",
                "amount": "12abc",
                "source_of_funds": "GCash"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_AMOUNT");

        let (status, body) = cash_in(
            &app,
            json!({
                "transaction_type": "Payroll",
                "amount": "10",
                "source_of_funds": "GCash"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "UNKNOWN_TRANSACTION_TYPE");

        let (status, body) = cash_in(
            &app,
            json!({
                "transaction_type": "Cash In",
                "amount": "10",
                "customer_pays": "15",
                "source_of_funds": "GCash",
                "is_paid_with_checked": true
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "MISSING_PAID_WITH");
    }

    #[tokio::test]
    async fn test_unknown_transaction_is_not_found() {
        let app = app(false);
        let (status, body) = send(&app, "GET", "/api/v1/transactions/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_delete_transaction() {
        let app = app(false);
        cash_in(
            &app,
            json!({
                "transaction_type": "Misc Payment",
                "amount": "250",
                "source_of_funds": "Cash"
            }),
        )
        .await;

        let (status, body) = send(&app, "DELETE", "/api/v1/transactions/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted"], true);

        let (status, body) = send(&app, "DELETE", "/api/v1/transactions/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted"], false);

        let (_, body) = send(&app, "GET", "/api/v1/balance", None).await;
        assert_eq!(body["total_balance"], "0");
    }

    #[tokio::test]
    async fn test_non_numeric_path_gets_json_error() {
        let app = app(false);
        for method in ["GET", "DELETE"] {
            let (status, body) = send(&app, method, "/api/v1/transactions/abc", None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "INVALID_PATH");
            assert!(body["message"].is_string());
        }
    }

    #[tokio::test]
    async fn test_malformed_body_gets_json_error() {
        let app = app(false);
        let (status, body) = cash_in(&app, json!({ "transaction_type": "Cash In" })).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "INVALID_BODY");
        assert!(body["message"].is_string());

        let (_, body) = send(&app, "GET", "/api/v1/transactions/1", None).await;
        assert_eq!(body["error"], "NOT_FOUND");
    }
}
