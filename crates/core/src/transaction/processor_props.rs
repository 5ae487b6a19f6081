//! Property-based tests for TransactionProcessor.
//!
//! - Balances always equal the signed sum of entries
//! - Transaction numbers strictly increase and are never reused
//! - Deleting a transaction reverses exactly its own entries
//! - Ledgers without an override list entries by transaction number

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::processor::TransactionProcessor;
use super::types::{TransactionRequest, TransactionType};
use crate::ledger::{EntryStamp, LedgerKind, LedgerRegistry};

/// Strategy to generate non-negative amounts (0.00 to 50,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..5_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate any transaction type.
fn transaction_type() -> impl Strategy<Value = TransactionType> {
    proptest::sample::select(TransactionType::ALL.to_vec())
}

/// Strategy to generate ledger names, including ones that fall back to Others.
fn ledger_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Cash".to_string()),
        Just("GCash".to_string()),
        Just("PayMaya".to_string()),
        Just("Others".to_string()),
        Just("Reloader SIM".to_string()),
        "[a-z]{1,8}",
    ]
}

/// Strategy to generate valid requests.
fn request() -> impl Strategy<Value = TransactionRequest> {
    (
        transaction_type(),
        amount(),
        amount(),
        ledger_name(),
        proptest::option::of(ledger_name()),
        any::<bool>(),
    )
        .prop_map(
            |(transaction_type, amount, fee, source, paid_with, checked)| TransactionRequest {
                transaction_type,
                amount,
                customer_pays: amount + fee,
                source_of_funds: source,
                is_paid_with_checked: checked && paid_with.is_some(),
                paid_with,
                notes: String::new(),
            },
        )
}

fn stamp() -> EntryStamp {
    EntryStamp::now(chrono_tz::Asia::Manila)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_balances_match_entry_sums(requests in prop::collection::vec(request(), 1..30)) {
        let mut registry = LedgerRegistry::new();
        for req in &requests {
            TransactionProcessor::process(&mut registry, req, stamp()).unwrap();
        }

        prop_assert!(registry.verify().is_ok());
        for ledger in registry.ledgers() {
            let sum: Decimal = ledger.entries().iter().map(|e| e.signed_amount()).sum();
            prop_assert_eq!(ledger.balance(), sum);
        }
    }

    #[test]
    fn prop_numbers_strictly_increase(
        requests in prop::collection::vec(request(), 1..30),
        delete_every in 1usize..5,
    ) {
        let mut registry = LedgerRegistry::new();
        let mut last = 0;
        for (i, req) in requests.iter().enumerate() {
            let number = TransactionProcessor::process(&mut registry, req, stamp()).unwrap();
            prop_assert!(number > last);
            last = number;
            if i % delete_every == 0 {
                prop_assert!(registry.delete_transaction(number));
            }
        }
        prop_assert_eq!(registry.next_transaction_number(), last + 1);
    }

    #[test]
    fn prop_delete_reverses_exactly(
        requests in prop::collection::vec(request(), 2..20),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut registry = LedgerRegistry::new();
        let numbers: Vec<u64> = requests
            .iter()
            .map(|req| TransactionProcessor::process(&mut registry, req, stamp()).unwrap())
            .collect();
        let victim = numbers[pick.index(numbers.len())];

        let before: Vec<(LedgerKind, Decimal)> = registry
            .ledgers()
            .map(|l| {
                let own: Decimal = l
                    .entries()
                    .iter()
                    .filter(|e| e.transaction_number == victim)
                    .map(|e| e.signed_amount())
                    .sum();
                (l.kind(), l.balance() - own)
            })
            .collect();
        let others_before: usize = registry.ledgers().map(|l| l.entries().len()).sum::<usize>()
            - registry.transaction_details(victim).len();

        prop_assert!(registry.delete_transaction(victim));

        for (kind, expected) in before {
            prop_assert_eq!(registry.ledger(kind).balance(), expected);
        }
        prop_assert!(registry.transaction_details(victim).is_empty());
        let remaining: usize = registry.ledgers().map(|l| l.entries().len()).sum();
        prop_assert_eq!(remaining, others_before);
        prop_assert!(!registry.delete_transaction(victim));
    }

    #[test]
    fn prop_default_order_is_by_transaction_number(
        requests in prop::collection::vec(request(), 1..30),
    ) {
        let mut registry = LedgerRegistry::new();
        for req in &requests {
            TransactionProcessor::process(&mut registry, req, stamp()).unwrap();
        }

        for ledger in registry.ledgers() {
            let ordered = ledger.entries_ordered();
            prop_assert_eq!(ordered.len(), ledger.entries().len());
            prop_assert!(
                ordered
                    .windows(2)
                    .all(|w| w[0].transaction_number <= w[1].transaction_number)
            );
        }
    }

    #[test]
    fn prop_invalid_requests_mutate_nothing(
        mut req in request(),
        negative in 1i64..1_000_000i64,
    ) {
        req.amount = Decimal::new(-negative, 2);
        let mut registry = LedgerRegistry::new();

        prop_assert!(TransactionProcessor::process(&mut registry, &req, stamp()).is_err());
        prop_assert_eq!(registry.next_transaction_number(), 1);
        prop_assert!(registry.ledgers().all(|l| l.entries().is_empty()));
    }
}
