//! Ledger entry domain types.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use pitaka_shared::types::LedgerEntryId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::kind::LedgerKind;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryDirection {
    /// Money coming into the ledger (increases the balance).
    Credit,
    /// Money leaving the ledger (decreases the balance).
    Debit,
}

/// Creation time of an entry together with its local display date and time.
///
/// The display pair is derived once, when the entry is created, and never
/// recomputed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryStamp {
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Local calendar date shown to users.
    pub date: NaiveDate,
    /// Local wall-clock time shown to users.
    pub time: NaiveTime,
}

impl EntryStamp {
    /// Stamps the given instant in `tz`.
    #[must_use]
    pub fn at(created_at: DateTime<Utc>, tz: Tz) -> Self {
        let local = created_at.with_timezone(&tz);
        Self {
            created_at,
            date: local.date_naive(),
            time: local.time(),
        }
    }

    /// Stamps the current instant in `tz`.
    #[must_use]
    pub fn now(tz: Tz) -> Self {
        Self::at(Utc::now(), tz)
    }
}

/// Input for posting one entry to a ledger.
#[derive(Debug, Clone)]
pub struct Posting {
    /// Shared transaction number.
    pub transaction_number: u64,
    /// Transaction type label, e.g. "Cash In".
    pub transaction_type: String,
    /// Non-negative amount.
    pub amount: Decimal,
    /// Free-text notes.
    pub notes: String,
    /// When the entry is created.
    pub stamp: EntryStamp,
}

/// A single credit or debit recorded in one ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier for this entry.
    pub id: LedgerEntryId,
    /// Number shared by every entry of the same logical transaction.
    pub transaction_number: u64,
    /// Transaction type label.
    pub transaction_type: String,
    /// Whether this is a credit or debit.
    pub direction: EntryDirection,
    /// Amount, never negative.
    pub amount: Decimal,
    /// The ledger that owns this entry.
    pub ledger: LedgerKind,
    /// Free-text notes.
    pub notes: String,
    /// Creation instant plus display date/time.
    #[serde(flatten)]
    pub stamp: EntryStamp,
}

impl LedgerEntry {
    /// Builds a new entry with a fresh identifier.
    #[must_use]
    pub fn new(ledger: LedgerKind, direction: EntryDirection, posting: Posting) -> Self {
        Self {
            id: LedgerEntryId::new(),
            transaction_number: posting.transaction_number,
            transaction_type: posting.transaction_type,
            direction,
            amount: posting.amount,
            ledger,
            notes: posting.notes,
            stamp: posting.stamp,
        }
    }

    /// Returns the signed effect on the owning ledger's balance
    /// (positive for credit, negative for debit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            EntryDirection::Credit => self.amount,
            EntryDirection::Debit => -self.amount,
        }
    }

    /// Returns true for credit entries.
    #[must_use]
    pub fn is_credit(&self) -> bool {
        self.direction == EntryDirection::Credit
    }
}
