//! Turns a transaction request into ledger entries.
//!
//! The routing table below is the contract. Every type posts one credit and
//! one debit under a single transaction number, except Misc Payment, which
//! posts a credit only.
//!
//! | Type | Credit ledger | Credit | Debit ledger | Debit |
//! |---|---|---|---|---|
//! | Cash In | paid-with or Cash | customer pays | source of funds | amount |
//! | Mobile Loading | paid-with or Cash | customer pays | load source ("Reloader SIM" → Others) | amount |
//! | Skyro / Home Credit | paid-with or Cash | customer pays | payment method | amount |
//! | Cash Out | source of funds | customer pays | Cash | amount |
//! | Misc Payment | payment method | amount | none | none |

use rust_decimal::Decimal;
use tracing::info;

use super::types::{TransactionRequest, TransactionType};
use crate::ledger::{EntryStamp, LedgerError, LedgerKind, LedgerRegistry, Posting};

/// Load source name that always books to Others.
pub const RELOADER_SIM: &str = "Reloader SIM";

/// One side of a routed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leg {
    /// Target ledger.
    pub ledger: LedgerKind,
    /// Amount posted.
    pub amount: Decimal,
}

/// Where a request's entries go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Routing {
    /// Credit side.
    pub credit: Leg,
    /// Debit side, absent for Misc Payment.
    pub debit: Option<Leg>,
}

/// Stateless dispatcher; the only code path that posts ledger entries.
pub struct TransactionProcessor;

impl TransactionProcessor {
    /// Rejects requests that must not reach the ledgers.
    ///
    /// # Errors
    ///
    /// Returns `NegativeAmount` for a negative amount or customer total and
    /// `MissingPaidWith` when the override is checked without a ledger name.
    pub fn validate(request: &TransactionRequest) -> Result<(), LedgerError> {
        if request.amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount { field: "amount" });
        }
        if request.customer_pays < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount {
                field: "customer_pays",
            });
        }
        if request.is_paid_with_checked
            && request
                .paid_with
                .as_deref()
                .is_none_or(|name| name.trim().is_empty())
        {
            return Err(LedgerError::MissingPaidWith);
        }
        Ok(())
    }

    /// Works out the ledgers and amounts for a request.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`TransactionProcessor::validate`].
    pub fn route(request: &TransactionRequest) -> Result<Routing, LedgerError> {
        Self::validate(request)?;

        let source = LedgerKind::resolve(&request.source_of_funds);
        let paid_with = match (&request.paid_with, request.is_paid_with_checked) {
            (Some(name), true) => LedgerKind::resolve(name),
            _ => LedgerKind::Cash,
        };

        let collect = |ledger| Leg {
            ledger,
            amount: request.customer_pays,
        };
        let pay_out = |ledger| Leg {
            ledger,
            amount: request.amount,
        };

        let routing = match request.transaction_type {
            TransactionType::CashIn
            | TransactionType::SkyroPayment
            | TransactionType::HomeCreditPayment => Routing {
                credit: collect(paid_with),
                debit: Some(pay_out(source)),
            },
            TransactionType::MobileLoading => {
                let reloader = request.source_of_funds.trim().eq_ignore_ascii_case(RELOADER_SIM);
                let load_source = if reloader { LedgerKind::Others } else { source };
                Routing {
                    credit: collect(paid_with),
                    debit: Some(pay_out(load_source)),
                }
            }
            TransactionType::CashOut => Routing {
                credit: collect(source),
                debit: Some(pay_out(LedgerKind::Cash)),
            },
            TransactionType::MiscPayment => Routing {
                credit: pay_out(source),
                debit: None,
            },
        };
        Ok(routing)
    }

    /// Validates, allocates one transaction number, and posts the entries.
    ///
    /// Nothing is mutated when validation fails.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`TransactionProcessor::validate`], and
    /// `CounterExhausted` when no transaction number is left.
    pub fn process(
        registry: &mut LedgerRegistry,
        request: &TransactionRequest,
        stamp: EntryStamp,
    ) -> Result<u64, LedgerError> {
        let routing = Self::route(request)?;
        let number = registry.allocate_transaction_number()?;

        let posting = |amount| Posting {
            transaction_number: number,
            transaction_type: request.transaction_type.label().to_string(),
            amount,
            notes: request.notes.clone(),
            stamp,
        };

        registry
            .ledger_mut(routing.credit.ledger)
            .post_credit(posting(routing.credit.amount));
        if let Some(debit) = routing.debit {
            registry
                .ledger_mut(debit.ledger)
                .post_debit(posting(debit.amount));
        }

        info!(
            transaction_number = number,
            transaction_type = %request.transaction_type,
            credit_ledger = %routing.credit.ledger,
            debit_ledger = ?routing.debit.map(|d| d.ledger),
            "Transaction posted"
        );
        Ok(number)
    }
}
