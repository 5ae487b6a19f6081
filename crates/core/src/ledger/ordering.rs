//! Display ordering for entry lists.
//!
//! Stored entries keep their insertion order and are never rearranged. What
//! users see is a projection: entries named by a [`ManualOrder`] come first,
//! in the override's order, followed by every other entry in ascending
//! transaction-number order. Without an override the projection is plain
//! ascending transaction-number order.

use std::collections::{HashMap, HashSet};

use pitaka_shared::types::LedgerEntryId;
use serde::{Deserialize, Serialize};

use super::entry::LedgerEntry;

/// A user-chosen display order, as a sequence of entry identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManualOrder(Vec<LedgerEntryId>);

impl ManualOrder {
    /// Builds an override from ids in display order.
    ///
    /// Repeated ids keep their first position.
    #[must_use]
    pub fn new(ids: impl IntoIterator<Item = LedgerEntryId>) -> Self {
        let mut seen = HashSet::new();
        Self(ids.into_iter().filter(|id| seen.insert(*id)).collect())
    }

    /// The ids in display order.
    #[must_use]
    pub fn ids(&self) -> &[LedgerEntryId] {
        &self.0
    }

    /// Returns true if the override names no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drops every id in `removed`.
    pub fn purge(&mut self, removed: &HashSet<LedgerEntryId>) {
        self.0.retain(|id| !removed.contains(id));
    }
}

/// Projects `entries` into display order.
///
/// Override ids that match no entry are skipped. Entries that share a
/// transaction number keep their relative input order.
#[must_use]
pub fn project<'a, I>(entries: I, order: Option<&ManualOrder>) -> Vec<LedgerEntry>
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    let entries: Vec<&LedgerEntry> = entries.into_iter().collect();

    let mut pinned_ids: HashSet<LedgerEntryId> = HashSet::new();
    let pinned: Vec<&LedgerEntry> = match order {
        Some(order) if !order.is_empty() => {
            let mut by_id: HashMap<LedgerEntryId, &LedgerEntry> =
                HashMap::with_capacity(entries.len());
            for entry in &entries {
                by_id.entry(entry.id).or_insert(*entry);
            }
            order
                .ids()
                .iter()
                .filter_map(|id| by_id.get(id).copied())
                .filter(|e| pinned_ids.insert(e.id))
                .collect()
        }
        _ => Vec::new(),
    };

    let mut trailing: Vec<&LedgerEntry> = entries
        .into_iter()
        .filter(|e| !pinned_ids.contains(&e.id))
        .collect();
    trailing.sort_by_key(|e| e.transaction_number);

    pinned.into_iter().chain(trailing).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::entry::{EntryDirection, EntryStamp, Posting};
    use crate::ledger::kind::LedgerKind;
    use rust_decimal_macros::dec;

    fn entry(number: u64) -> LedgerEntry {
        LedgerEntry::new(
            LedgerKind::Cash,
            EntryDirection::Credit,
            Posting {
                transaction_number: number,
                transaction_type: "Misc Payment".to_string(),
                amount: dec!(10),
                notes: String::new(),
                stamp: EntryStamp::now(chrono_tz::Asia::Manila),
            },
        )
    }

    fn numbers(entries: &[LedgerEntry]) -> Vec<u64> {
        entries.iter().map(|e| e.transaction_number).collect()
    }

    #[test]
    fn test_no_override_sorts_by_number() {
        let entries = vec![entry(3), entry(1), entry(2)];
        assert_eq!(numbers(&project(&entries, None)), vec![1, 2, 3]);
    }

    #[test]
    fn test_override_first_then_trailing_by_number() {
        let entries = vec![entry(1), entry(2), entry(3), entry(4)];
        let order = ManualOrder::new([entries[2].id, entries[0].id]);
        assert_eq!(numbers(&project(&entries, Some(&order))), vec![3, 1, 2, 4]);
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        let entries = vec![entry(1), entry(2)];
        let order = ManualOrder::new([LedgerEntryId::new(), entries[1].id]);
        assert_eq!(numbers(&project(&entries, Some(&order))), vec![2, 1]);
    }

    #[test]
    fn test_duplicate_ids_keep_first_position() {
        let entries = vec![entry(1), entry(2), entry(3)];
        let order = ManualOrder::new([entries[1].id, entries[2].id, entries[1].id]);
        assert_eq!(order.ids().len(), 2);
        assert_eq!(numbers(&project(&entries, Some(&order))), vec![2, 3, 1]);
    }

    #[test]
    fn test_long_override_reverses_every_entry() {
        let entries: Vec<LedgerEntry> = (1..=500).map(entry).collect();
        let order = ManualOrder::new(entries.iter().rev().map(|e| e.id));
        let expected: Vec<u64> = (1..=500).rev().collect();
        assert_eq!(numbers(&project(&entries, Some(&order))), expected);
    }

    #[test]
    fn test_stored_duplicate_ids_pin_once() {
        let entries = vec![entry(1), entry(2)];
        let order: ManualOrder =
            serde_json::from_value(serde_json::json!([entries[1].id, entries[1].id])).unwrap();
        assert_eq!(numbers(&project(&entries, Some(&order))), vec![2, 1]);
    }

    #[test]
    fn test_purge_removes_ids() {
        let entries = vec![entry(1), entry(2)];
        let mut order = ManualOrder::new([entries[1].id, entries[0].id]);
        order.purge(&HashSet::from([entries[1].id]));
        assert_eq!(order.ids(), &[entries[0].id]);
    }
}
