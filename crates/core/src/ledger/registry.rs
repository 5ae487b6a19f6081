//! The fixed set of four ledgers plus the shared transaction counter.

use std::collections::{BTreeMap, HashSet};

use chrono::Utc;
use pitaka_shared::types::LedgerEntryId;
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::book::{Ledger, LedgerView};
use super::entry::LedgerEntry;
use super::error::LedgerError;
use super::kind::LedgerKind;
use super::ordering::{self, ManualOrder};
use super::snapshot::{LedgerState, RegistrySnapshot, SNAPSHOT_VERSION};

/// Owns the Cash, GCash, PayMaya and Others ledgers.
///
/// The registry itself has no locking; [`crate::service::LedgerService`]
/// wraps it so that multi-ledger operations are applied atomically.
#[derive(Debug, Clone)]
pub struct LedgerRegistry {
    ledgers: [Ledger; 4],
    next_transaction_number: u64,
    all_credits_order: Option<ManualOrder>,
}

impl Default for LedgerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerRegistry {
    /// Creates a registry with four empty ledgers; numbering starts at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ledgers: LedgerKind::ALL.map(Ledger::new),
            next_transaction_number: 1,
            all_credits_order: None,
        }
    }

    /// Hands out the next transaction number.
    ///
    /// Numbers are never reused, even after the transaction is deleted.
    ///
    /// # Errors
    ///
    /// Returns `CounterExhausted` once the last representable number has
    /// been handed out; the counter is left unchanged.
    pub fn allocate_transaction_number(&mut self) -> Result<u64, LedgerError> {
        let number = self.next_transaction_number;
        self.next_transaction_number = number
            .checked_add(1)
            .ok_or(LedgerError::CounterExhausted)?;
        Ok(number)
    }

    /// The number the next allocation will return.
    #[must_use]
    pub fn next_transaction_number(&self) -> u64 {
        self.next_transaction_number
    }

    /// The ledger for `kind`.
    #[must_use]
    pub fn ledger(&self, kind: LedgerKind) -> &Ledger {
        &self.ledgers[kind.index()]
    }

    pub(crate) fn ledger_mut(&mut self, kind: LedgerKind) -> &mut Ledger {
        &mut self.ledgers[kind.index()]
    }

    /// The ledger named `name`; unknown names resolve to Others.
    #[must_use]
    pub fn ledger_by_name(&self, name: &str) -> &Ledger {
        self.ledger(LedgerKind::resolve(name))
    }

    /// All four ledgers in display order.
    pub fn ledgers(&self) -> impl Iterator<Item = &Ledger> {
        self.ledgers.iter()
    }

    /// Display copies of every ledger, keyed by kind.
    #[must_use]
    pub fn views(&self) -> BTreeMap<LedgerKind, LedgerView> {
        self.ledgers.iter().map(|l| (l.kind(), l.view())).collect()
    }

    /// Sum of the four balances.
    #[must_use]
    pub fn total_balance(&self) -> Decimal {
        self.ledgers.iter().map(Ledger::balance).sum()
    }

    /// Every credit entry across all ledgers, in display order.
    #[must_use]
    pub fn all_credits_ordered(&self) -> Vec<LedgerEntry> {
        let credits = self
            .ledgers
            .iter()
            .flat_map(|l| l.entries().iter())
            .filter(|e| e.is_credit());
        ordering::project(credits, self.all_credits_order.as_ref())
    }

    /// Replaces one ledger's display override.
    pub fn set_manual_order(&mut self, kind: LedgerKind, ids: &[LedgerEntryId]) {
        self.ledger_mut(kind).set_manual_order(ids);
        debug!(ledger = %kind, count = ids.len(), "Manual order updated");
    }

    /// Replaces the all-credits display override.
    ///
    /// Ids that are not credit entries are dropped.
    pub fn set_all_credits_order(&mut self, ids: &[LedgerEntryId]) {
        let credits: HashSet<LedgerEntryId> = self
            .ledgers
            .iter()
            .flat_map(|l| l.entries().iter())
            .filter(|e| e.is_credit())
            .map(|e| e.id)
            .collect();
        self.all_credits_order = Some(ManualOrder::new(
            ids.iter().copied().filter(|id| credits.contains(id)),
        ));
        debug!(count = ids.len(), "All-credits order updated");
    }

    /// Deletes transaction `number` from every ledger.
    ///
    /// Returns true if at least one ledger held a matching entry.
    pub fn delete_transaction(&mut self, number: u64) -> bool {
        let mut removed_ids = HashSet::new();
        for ledger in &mut self.ledgers {
            for entry in ledger.delete_by_transaction_number(number) {
                removed_ids.insert(entry.id);
            }
        }

        if removed_ids.is_empty() {
            return false;
        }

        if let Some(order) = self.all_credits_order.as_mut() {
            order.purge(&removed_ids);
        }

        info!(
            transaction_number = number,
            entries = removed_ids.len(),
            "Transaction deleted"
        );
        true
    }

    /// Every entry, in any ledger, carrying transaction `number`.
    #[must_use]
    pub fn transaction_details(&self, number: u64) -> Vec<LedgerEntry> {
        self.ledgers
            .iter()
            .flat_map(|l| l.entries().iter())
            .filter(|e| e.transaction_number == number)
            .cloned()
            .collect()
    }

    /// Clears every ledger and override and restarts numbering at 1.
    pub fn reset(&mut self) {
        for ledger in &mut self.ledgers {
            ledger.clear();
        }
        self.all_credits_order = None;
        self.next_transaction_number = 1;
        info!("Ledger registry reset");
    }

    /// Checks that every balance still equals its entry sum.
    pub fn verify(&self) -> Result<(), LedgerError> {
        for ledger in &self.ledgers {
            let computed = ledger.entry_sum();
            if ledger.balance() != computed {
                return Err(LedgerError::BalanceMismatch {
                    ledger: ledger.kind(),
                    recorded: ledger.balance(),
                    computed,
                });
            }
        }
        Ok(())
    }

    /// Serializable copy of the full state.
    #[must_use]
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            version: SNAPSHOT_VERSION,
            next_transaction_number: self.next_transaction_number,
            ledgers: self
                .ledgers
                .iter()
                .map(|l| {
                    (
                        l.kind(),
                        LedgerState {
                            balance: l.balance(),
                            entries: l.entries().to_vec(),
                            manual_order: l.manual_order().cloned(),
                        },
                    )
                })
                .collect(),
            all_credits_order: self.all_credits_order.clone(),
            taken_at: Utc::now(),
        }
    }

    /// Rebuilds a registry from a snapshot.
    ///
    /// Balances are recomputed from the entries and compared with the stored
    /// ones; any disagreement is reported, never repaired.
    pub fn restore(snapshot: RegistrySnapshot) -> Result<Self, LedgerError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(LedgerError::ConsistencyViolation(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        if snapshot.next_transaction_number == 0 {
            return Err(LedgerError::ConsistencyViolation(
                "transaction numbering must start at 1".to_string(),
            ));
        }
        if snapshot.next_transaction_number == u64::MAX {
            return Err(LedgerError::ConsistencyViolation(
                "transaction counter is exhausted".to_string(),
            ));
        }

        let mut registry = Self::new();
        let mut highest = 0;
        let mut seen = HashSet::new();

        for (kind, state) in snapshot.ledgers {
            for entry in &state.entries {
                if entry.ledger != kind {
                    return Err(LedgerError::ConsistencyViolation(format!(
                        "entry {} belongs to {} but was stored under {kind}",
                        entry.id, entry.ledger
                    )));
                }
                if entry.amount.is_sign_negative() {
                    return Err(LedgerError::ConsistencyViolation(format!(
                        "entry {} has a negative amount",
                        entry.id
                    )));
                }
                if !seen.insert(entry.id) {
                    return Err(LedgerError::ConsistencyViolation(format!(
                        "entry {} appears more than once",
                        entry.id
                    )));
                }
                highest = highest.max(entry.transaction_number);
            }

            let ledger = Ledger::from_parts(kind, state.entries, state.manual_order);
            if ledger.balance() != state.balance {
                return Err(LedgerError::BalanceMismatch {
                    ledger: kind,
                    recorded: state.balance,
                    computed: ledger.balance(),
                });
            }
            *registry.ledger_mut(kind) = ledger;
        }

        if snapshot.next_transaction_number <= highest {
            return Err(LedgerError::ConsistencyViolation(format!(
                "next transaction number {} is not above the highest recorded {highest}",
                snapshot.next_transaction_number
            )));
        }

        registry.next_transaction_number = snapshot.next_transaction_number;
        registry.all_credits_order = snapshot.all_credits_order;

        info!(
            next_transaction_number = registry.next_transaction_number,
            entries = seen.len(),
            "Ledger registry restored"
        );
        Ok(registry)
    }
}
