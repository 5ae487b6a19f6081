//! The four kiosk ledgers.
//!
//! This module implements the bookkeeping core:
//! - Ledger entries (credits and debits) with local date and time
//! - Single-ledger books with running balances and display overrides
//! - The registry of all four ledgers and the shared transaction counter
//! - Snapshots for durable storage

pub mod book;
pub mod entry;
pub mod error;
pub mod kind;
pub mod ordering;
pub mod registry;
pub mod snapshot;

pub use book::{Ledger, LedgerView};
pub use entry::{EntryDirection, EntryStamp, LedgerEntry, Posting};
pub use error::LedgerError;
pub use kind::LedgerKind;
pub use ordering::ManualOrder;
pub use registry::LedgerRegistry;
pub use snapshot::{LedgerState, RegistrySnapshot, SNAPSHOT_VERSION};
