//! Fee quote route.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use pitaka_core::ledger::LedgerError;
use pitaka_core::transaction::{FeeCalculator, FeeOption, FeeQuote, TransactionType};
use pitaka_shared::types::parse_amount;
use serde::Deserialize;

use super::ledger_error_response;
use crate::AppState;
use crate::extractors::ApiJson;

/// Creates the fee routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/fees/quote", post(quote_fee))
}

/// Request body for a fee quote.
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    /// Transaction type label, e.g. "Cash In".
    pub transaction_type: String,
    /// Base amount as a decimal string.
    pub amount: String,
    /// Fee option; defaults to "add to amount".
    pub fee_option: Option<String>,
}

impl QuoteRequest {
    fn quote(&self) -> Result<FeeQuote, LedgerError> {
        let transaction_type: TransactionType = self.transaction_type.parse()?;
        let amount = parse_amount(&self.amount)?;
        let fee_option = match &self.fee_option {
            Some(raw) => raw.parse()?,
            None => FeeOption::AddToAmount,
        };
        FeeCalculator::quote(transaction_type, amount, fee_option)
    }
}

/// POST `/fees/quote` - Compute the fee and customer total.
async fn quote_fee(ApiJson(payload): ApiJson<QuoteRequest>) -> Response {
    match payload.quote() {
        Ok(quote) => (StatusCode::OK, Json(quote)).into_response(),
        Err(e) => ledger_error_response(&e),
    }
}
