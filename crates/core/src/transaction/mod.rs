//! Transaction types, fee schedules, and routing onto the ledgers.

pub mod fees;
pub mod processor;
pub mod types;

#[cfg(test)]
mod processor_props;

pub use fees::{FeeCalculator, FeeQuote};
pub use processor::{Leg, Routing, TransactionProcessor};
pub use types::{FeeOption, TransactionRequest, TransactionType};
