//! Core business logic for Pitaka.
//!
//! This crate holds the kiosk bookkeeping: ledgers, fees, transaction
//! routing, and the service that serializes access to them. It has no web
//! dependencies.
//!
//! # Modules
//!
//! - `ledger` - The four ledgers, entries, ordering and snapshots
//! - `transaction` - Transaction types, fee schedules and routing
//! - `service` - Locked access to the registry plus persistence
//! - `storage` - Snapshot storage on top of OpenDAL

pub mod ledger;
pub mod service;
pub mod storage;
pub mod transaction;

pub use service::{LedgerService, Mutation};
