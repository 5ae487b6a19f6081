//! Service fee schedules.
//!
//! Every transaction type has its own schedule:
//!
//! | Type | Fee | Option |
//! |---|---|---|
//! | Misc Payment | 0 | forced to free |
//! | Mobile Loading Service | 0 / 5 / 10 / 20 / 30 by amount | as selected |
//! | Skyro / Home Credit Payment | 15 | forced to add-to-amount |
//! | Cash In / Cash Out | bracket table, open-ended above 20,000 | as selected |

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::Serialize;

use super::types::{FeeOption, TransactionType};
use crate::ledger::LedgerError;

/// Last bracket upper bound of the Cash In/Out table.
const CASH_TABLE_CAP: i64 = 20_000;
/// Width of each bracket from 1,500 upward, and of each step above the cap.
const CASH_STEP: i64 = 500;
/// Fee increase per step.
const CASH_STEP_FEE: i64 = 10;

/// Cash In/Out brackets as (inclusive upper bound, fee), ascending.
///
/// 100→5, 500→10, 1000→15, 1500→20, then +10 per 500 up to 20000→390.
static CASH_BRACKETS: Lazy<Vec<(Decimal, Decimal)>> = Lazy::new(|| {
    let mut brackets: Vec<(Decimal, Decimal)> = [(100, 5), (500, 10), (1_000, 15), (1_500, 20)]
        .into_iter()
        .map(|(upper, fee)| (Decimal::from(upper), Decimal::from(fee)))
        .collect();

    let mut upper = 2_000;
    let mut fee = 30;
    while upper <= CASH_TABLE_CAP {
        brackets.push((Decimal::from(upper), Decimal::from(fee)));
        upper += CASH_STEP;
        fee += CASH_STEP_FEE;
    }
    brackets
});

/// Fee, effective option and customer total for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeQuote {
    /// Transaction type quoted.
    pub transaction_type: TransactionType,
    /// Base amount.
    pub amount: Decimal,
    /// Option after any per-type override.
    pub fee_option: FeeOption,
    /// Service fee.
    pub fee: Decimal,
    /// What the customer hands over.
    pub customer_pays: Decimal,
    /// What actually reaches the customer or biller.
    pub net_disbursed: Decimal,
}

/// Stateless fee computation.
pub struct FeeCalculator;

impl FeeCalculator {
    /// The option that actually applies to `transaction_type`.
    ///
    /// Misc Payment is always free; Skyro and Home Credit always add the fee.
    #[must_use]
    pub fn effective_option(transaction_type: TransactionType, selected: FeeOption) -> FeeOption {
        match transaction_type {
            TransactionType::MiscPayment => FeeOption::Free,
            TransactionType::SkyroPayment | TransactionType::HomeCreditPayment => {
                FeeOption::AddToAmount
            }
            TransactionType::CashIn
            | TransactionType::CashOut
            | TransactionType::MobileLoading => selected,
        }
    }

    /// Fee for `amount` under the effective option.
    #[must_use]
    pub fn fee(transaction_type: TransactionType, amount: Decimal, selected: FeeOption) -> Decimal {
        if Self::effective_option(transaction_type, selected) == FeeOption::Free {
            return Decimal::ZERO;
        }

        match transaction_type {
            TransactionType::MiscPayment => Decimal::ZERO,
            TransactionType::MobileLoading => Self::mobile_loading_fee(amount),
            TransactionType::SkyroPayment | TransactionType::HomeCreditPayment => {
                Decimal::from(15)
            }
            TransactionType::CashIn | TransactionType::CashOut => Self::cash_transfer_fee(amount),
        }
    }

    /// Validates the inputs and produces a full quote.
    ///
    /// # Errors
    ///
    /// Returns `NegativeAmount` for a negative amount,
    /// `FeeOptionNotAllowed` when deduct-from-amount is chosen for anything
    /// other than Cash In/Out, and `FeeExceedsAmount` when a deducted fee is
    /// larger than the amount.
    pub fn quote(
        transaction_type: TransactionType,
        amount: Decimal,
        selected: FeeOption,
    ) -> Result<FeeQuote, LedgerError> {
        if amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount { field: "amount" });
        }

        let fee_option = Self::effective_option(transaction_type, selected);
        if fee_option == FeeOption::DeductFromAmount
            && !matches!(transaction_type, TransactionType::CashIn | TransactionType::CashOut)
        {
            return Err(LedgerError::FeeOptionNotAllowed {
                transaction_type: transaction_type.label(),
                option: fee_option.label(),
            });
        }

        let fee = Self::fee(transaction_type, amount, fee_option);
        if fee_option == FeeOption::DeductFromAmount && fee > amount {
            return Err(LedgerError::FeeExceedsAmount { fee, amount });
        }
        let (customer_pays, net_disbursed) = match fee_option {
            FeeOption::AddToAmount => (amount + fee, amount),
            FeeOption::DeductFromAmount => (amount, amount - fee),
            FeeOption::Free => (amount, amount),
        };

        Ok(FeeQuote {
            transaction_type,
            amount,
            fee_option,
            fee,
            customer_pays,
            net_disbursed,
        })
    }

    /// Mobile load steps: ≤0 → 0, ≤99 → 5, ≤499 → 10, ≤999 → 20, above → 30.
    fn mobile_loading_fee(amount: Decimal) -> Decimal {
        let fee = if amount <= Decimal::ZERO {
            0
        } else if amount <= Decimal::from(99) {
            5
        } else if amount <= Decimal::from(499) {
            10
        } else if amount <= Decimal::from(999) {
            20
        } else {
            30
        };
        Decimal::from(fee)
    }

    /// Cash In/Out bracket lookup, open-ended above the table cap.
    fn cash_transfer_fee(amount: Decimal) -> Decimal {
        if let Some((_, fee)) = CASH_BRACKETS.iter().find(|(upper, _)| amount <= *upper) {
            return *fee;
        }

        let cap = Decimal::from(CASH_TABLE_CAP);
        let top_fee = CASH_BRACKETS.last().map_or(Decimal::ZERO, |(_, fee)| *fee);
        let steps = ((amount - cap) / Decimal::from(CASH_STEP)).ceil();
        top_fee + Decimal::from(CASH_STEP_FEE) * steps
    }
}
