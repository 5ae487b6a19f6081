//! A single fund category's entries and running balance.

use std::collections::HashSet;

use pitaka_shared::types::LedgerEntryId;
use rust_decimal::Decimal;
use serde::Serialize;

use super::entry::{EntryDirection, LedgerEntry, Posting};
use super::kind::LedgerKind;
use super::ordering::{self, ManualOrder};

/// Entries and running balance for one [`LedgerKind`].
///
/// `balance` always equals Σ credits − Σ debits over `entries`. Entries can
/// only be posted from inside the crate, through the transaction processor.
#[derive(Debug, Clone)]
pub struct Ledger {
    kind: LedgerKind,
    entries: Vec<LedgerEntry>,
    balance: Decimal,
    manual_order: Option<ManualOrder>,
}

/// Read-only copy of a ledger in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerView {
    /// Ledger kind.
    pub kind: LedgerKind,
    /// Current balance.
    pub balance: Decimal,
    /// Entries in display order.
    pub entries: Vec<LedgerEntry>,
}

impl Ledger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new(kind: LedgerKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            balance: Decimal::ZERO,
            manual_order: None,
        }
    }

    /// Rebuilds a ledger from stored entries, recomputing the balance.
    pub(crate) fn from_parts(
        kind: LedgerKind,
        entries: Vec<LedgerEntry>,
        manual_order: Option<ManualOrder>,
    ) -> Self {
        let balance = entries.iter().map(LedgerEntry::signed_amount).sum();
        Self {
            kind,
            entries,
            balance,
            manual_order,
        }
    }

    /// The ledger's kind.
    #[must_use]
    pub fn kind(&self) -> LedgerKind {
        self.kind
    }

    /// Current balance.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// The current display override, if any.
    #[must_use]
    pub fn manual_order(&self) -> Option<&ManualOrder> {
        self.manual_order.as_ref()
    }

    /// Σ credits − Σ debits, computed from scratch.
    #[must_use]
    pub fn entry_sum(&self) -> Decimal {
        self.entries.iter().map(LedgerEntry::signed_amount).sum()
    }

    /// Appends a credit entry and raises the balance.
    pub(crate) fn post_credit(&mut self, posting: Posting) -> LedgerEntry {
        self.post(EntryDirection::Credit, posting)
    }

    /// Appends a debit entry and lowers the balance.
    pub(crate) fn post_debit(&mut self, posting: Posting) -> LedgerEntry {
        self.post(EntryDirection::Debit, posting)
    }

    fn post(&mut self, direction: EntryDirection, posting: Posting) -> LedgerEntry {
        let entry = LedgerEntry::new(self.kind, direction, posting);
        self.balance += entry.signed_amount();
        self.entries.push(entry.clone());
        debug_assert_eq!(self.balance, self.entry_sum());
        entry
    }

    /// Entries in display order.
    #[must_use]
    pub fn entries_ordered(&self) -> Vec<LedgerEntry> {
        ordering::project(&self.entries, self.manual_order.as_ref())
    }

    /// Replaces the display override.
    ///
    /// Ids that do not belong to this ledger are dropped.
    pub fn set_manual_order(&mut self, ids: &[LedgerEntryId]) {
        let owned: HashSet<LedgerEntryId> = self.entries.iter().map(|e| e.id).collect();
        self.manual_order = Some(ManualOrder::new(
            ids.iter().copied().filter(|id| owned.contains(id)),
        ));
    }

    /// Removes every entry of transaction `number`, reversing its effect on
    /// the balance and purging it from the override.
    ///
    /// Returns the removed entries; empty when nothing matched.
    pub(crate) fn delete_by_transaction_number(&mut self, number: u64) -> Vec<LedgerEntry> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| e.transaction_number == number);
        self.entries = kept;

        if removed.is_empty() {
            return removed;
        }

        for entry in &removed {
            self.balance -= entry.signed_amount();
        }

        if let Some(order) = self.manual_order.as_mut() {
            let ids: HashSet<LedgerEntryId> = removed.iter().map(|e| e.id).collect();
            order.purge(&ids);
        }

        debug_assert_eq!(self.balance, self.entry_sum());
        removed
    }

    /// Returns true if any entry carries transaction `number`.
    #[must_use]
    pub fn has_transaction(&self, number: u64) -> bool {
        self.entries.iter().any(|e| e.transaction_number == number)
    }

    /// Drops all entries, the balance, and the override.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.balance = Decimal::ZERO;
        self.manual_order = None;
    }

    /// Read-only copy in display order.
    #[must_use]
    pub fn view(&self) -> LedgerView {
        LedgerView {
            kind: self.kind,
            balance: self.balance,
            entries: self.entries_ordered(),
        }
    }
}
