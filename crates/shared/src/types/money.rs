//! Amount parsing.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount in the system is a `rust_decimal::Decimal`.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors produced while reading an amount supplied as text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The input was empty or only whitespace.
    #[error("amount is required")]
    Empty,

    /// The input is not a decimal number.
    #[error("'{0}' is not a valid amount")]
    NotANumber(String),
}

/// Parses a user-supplied amount.
///
/// Accepts plain decimal notation with an optional thousands separator
/// (`"1,500.25"`). Sign checks are left to the caller.
pub fn parse_amount(raw: &str) -> Result<Decimal, AmountError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }

    let normalized = trimmed.replace(',', "");
    Decimal::from_str(&normalized).map_err(|_| AmountError::NotANumber(trimmed.to_string()))
}
