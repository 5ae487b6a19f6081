//! Fund categories a ledger can track.

use serde::{Deserialize, Serialize};

/// One of the four cash-equivalent fund categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LedgerKind {
    /// Physical cash drawer.
    Cash,
    /// GCash e-wallet.
    GCash,
    /// PayMaya e-wallet.
    PayMaya,
    /// Anything else (load wallets, bank apps, unknown methods).
    Others,
}

impl LedgerKind {
    /// Every kind, in display order.
    pub const ALL: [Self; 4] = [Self::Cash, Self::GCash, Self::PayMaya, Self::Others];

    /// Normalizes a free-text payment method.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Unrecognized text resolves to [`LedgerKind::Others`].
    #[must_use]
    pub fn resolve(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "cash" => Self::Cash,
            "gcash" => Self::GCash,
            "paymaya" => Self::PayMaya,
            _ => Self::Others,
        }
    }

    /// Display name, identical to the serialized form.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::GCash => "GCash",
            Self::PayMaya => "PayMaya",
            Self::Others => "Others",
        }
    }

    /// Position in [`LedgerKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Cash => 0,
            Self::GCash => 1,
            Self::PayMaya => 2,
            Self::Others => 3,
        }
    }
}

impl std::fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
