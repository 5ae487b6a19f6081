//! Durable storage for ledger snapshots using Apache OpenDAL.
//!
//! The full registry state is written as one JSON document on every
//! successful command and read back once at startup.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              LedgerStore (trait)              │
//! ├──────────────────────────────────────────────┤
//! │ SnapshotStore → OpenDAL Operator              │
//! │   S3-compatible │ local filesystem │ memory   │
//! └──────────────────────────────────────────────┘
//! ```

mod error;
mod service;

pub use error::StorageError;
pub use service::{LedgerStore, SnapshotStore};
