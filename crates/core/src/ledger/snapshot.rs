//! Serializable copy of the full registry state.
//!
//! This is the document exchanged with durable storage: written whole on
//! every persist, read whole at startup.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::LedgerEntry;
use super::kind::LedgerKind;
use super::ordering::ManualOrder;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Full registry state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Format version.
    pub version: u32,
    /// Next transaction number to hand out.
    pub next_transaction_number: u64,
    /// Per-ledger state.
    pub ledgers: BTreeMap<LedgerKind, LedgerState>,
    /// Override for the all-credits view.
    #[serde(default)]
    pub all_credits_order: Option<ManualOrder>,
    /// When the snapshot was taken.
    pub taken_at: DateTime<Utc>,
}

/// One ledger's stored state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    /// Balance at the time of the snapshot.
    pub balance: Decimal,
    /// Entries in insertion order.
    pub entries: Vec<LedgerEntry>,
    /// Display override.
    #[serde(default)]
    pub manual_order: Option<ManualOrder>,
}
