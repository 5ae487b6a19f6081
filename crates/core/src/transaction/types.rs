//! Transaction inputs: the closed set of types, fee options, and requests.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::LedgerError;

/// Every kind of transaction the kiosk can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Customer hands over cash, receives e-wallet funds.
    #[serde(rename = "Cash In")]
    CashIn,
    /// Customer sends e-wallet funds, receives cash.
    #[serde(rename = "Cash Out")]
    CashOut,
    /// Prepaid mobile load.
    #[serde(rename = "Mobile Loading Service")]
    MobileLoading,
    /// Skyro loan payment.
    #[serde(rename = "Skyro Payment")]
    SkyroPayment,
    /// Home Credit loan payment.
    #[serde(rename = "Home Credit Payment")]
    HomeCreditPayment,
    /// Any other income without a matching outflow.
    #[serde(rename = "Misc Payment")]
    MiscPayment,
}

impl TransactionType {
    /// Every transaction type.
    pub const ALL: [Self; 6] = [
        Self::CashIn,
        Self::CashOut,
        Self::MobileLoading,
        Self::SkyroPayment,
        Self::HomeCreditPayment,
        Self::MiscPayment,
    ];

    /// Label stored on every entry this type produces.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CashIn => "Cash In",
            Self::CashOut => "Cash Out",
            Self::MobileLoading => "Mobile Loading Service",
            Self::SkyroPayment => "Skyro Payment",
            Self::HomeCreditPayment => "Home Credit Payment",
            Self::MiscPayment => "Misc Payment",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    /// Case-insensitive label match; unknown labels are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| LedgerError::UnknownTransactionType(wanted.to_string()))
    }
}

/// How a computed fee affects what the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeOption {
    /// Customer pays amount + fee.
    AddToAmount,
    /// Fee comes out of the amount handed over (Cash In/Out only).
    DeductFromAmount,
    /// No fee.
    Free,
}

impl FeeOption {
    /// Human label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AddToAmount => "add to amount",
            Self::DeductFromAmount => "deduct from amount",
            Self::Free => "free",
        }
    }
}

impl FromStr for FeeOption {
    type Err = LedgerError;

    /// Accepts the human label or the snake_case form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', " ");
        [Self::AddToAmount, Self::DeductFromAmount, Self::Free]
            .into_iter()
            .find(|o| o.label() == wanted)
            .ok_or_else(|| LedgerError::UnknownFeeOption(s.trim().to_string()))
    }
}

/// Everything needed to record one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    /// What kind of transaction this is.
    pub transaction_type: TransactionType,
    /// Base amount, before fees.
    pub amount: Decimal,
    /// What the customer hands over.
    pub customer_pays: Decimal,
    /// Source of funds; read as transfer-to (Cash In), load source (Mobile
    /// Loading), or payment method (Skyro, Home Credit, Misc, Cash Out).
    pub source_of_funds: String,
    /// Ledger the customer paid with, when the override is checked.
    pub paid_with: Option<String>,
    /// Whether `paid_with` replaces Cash as the credit ledger.
    pub is_paid_with_checked: bool,
    /// Free-text notes copied onto every entry.
    pub notes: String,
}
