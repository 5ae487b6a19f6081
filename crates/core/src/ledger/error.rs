//! Ledger error types for validation, consistency, and storage failures.
//!
//! Deleting an unknown transaction number is not an error; callers get
//! "nothing deleted" instead.

use pitaka_shared::types::AmountError;
use rust_decimal::Decimal;
use thiserror::Error;

use super::kind::LedgerKind;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// An amount was below zero.
    #[error("{field} cannot be negative")]
    NegativeAmount {
        /// Which input carried the negative value.
        field: &'static str,
    },

    /// An amount could not be read as a number.
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    /// The transaction type label is not one the processor knows.
    #[error("Unknown transaction type: {0}")]
    UnknownTransactionType(String),

    /// The fee option label is not recognized.
    #[error("Unknown fee option: {0}")]
    UnknownFeeOption(String),

    /// The fee option cannot be used with this transaction type.
    #[error("Fee option '{option}' is not available for {transaction_type}")]
    FeeOptionNotAllowed {
        /// Transaction type label.
        transaction_type: &'static str,
        /// Fee option label.
        option: &'static str,
    },

    /// A deducted fee would leave less than nothing to disburse.
    #[error("Fee {fee} exceeds the amount {amount}")]
    FeeExceedsAmount {
        /// Service fee.
        fee: Decimal,
        /// Base amount.
        amount: Decimal,
    },

    /// The paid-with override was checked but no ledger was named.
    #[error("A paid-with ledger is required when the paid-with override is checked")]
    MissingPaidWith,

    // ========== Consistency Errors ==========
    /// A ledger's recorded balance disagrees with its entries.
    #[error("Balance of {ledger} is {recorded} but its entries sum to {computed}")]
    BalanceMismatch {
        /// The ledger.
        ledger: LedgerKind,
        /// Balance as recorded.
        recorded: Decimal,
        /// Σ credits − Σ debits over the entries.
        computed: Decimal,
    },

    /// Every transaction number has been handed out.
    #[error("Transaction numbers are exhausted")]
    CounterExhausted,

    /// Some other internal invariant does not hold.
    #[error("Consistency violation: {0}")]
    ConsistencyViolation(String),

    // ========== Storage Errors ==========
    /// Durable storage failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::UnknownTransactionType(_) => "UNKNOWN_TRANSACTION_TYPE",
            Self::UnknownFeeOption(_) => "UNKNOWN_FEE_OPTION",
            Self::FeeOptionNotAllowed { .. } => "FEE_OPTION_NOT_ALLOWED",
            Self::FeeExceedsAmount { .. } => "FEE_EXCEEDS_AMOUNT",
            Self::MissingPaidWith => "MISSING_PAID_WITH",
            Self::BalanceMismatch { .. } => "BALANCE_MISMATCH",
            Self::CounterExhausted => "COUNTER_EXHAUSTED",
            Self::ConsistencyViolation(_) => "CONSISTENCY_VIOLATION",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        if self.is_validation() { 400 } else { 500 }
    }

    /// Returns true if the input was rejected before any state changed.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NegativeAmount { .. }
                | Self::InvalidAmount(_)
                | Self::UnknownTransactionType(_)
                | Self::UnknownFeeOption(_)
                | Self::FeeOptionNotAllowed { .. }
                | Self::FeeExceedsAmount { .. }
                | Self::MissingPaidWith
        )
    }
}
