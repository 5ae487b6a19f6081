//! Ledger service: serialized access to the registry plus persistence.
//!
//! Every command takes the registry write lock for its whole in-memory
//! effect, so a multi-ledger post or delete is observed all-or-nothing.
//! Queries take the read lock and return owned copies. Storage I/O never
//! runs while the registry lock is held.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono_tz::Tz;
use pitaka_shared::types::LedgerEntryId;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info};

use crate::ledger::{EntryStamp, LedgerEntry, LedgerError, LedgerKind, LedgerRegistry, LedgerView};
use crate::storage::LedgerStore;
use crate::transaction::{TransactionProcessor, TransactionRequest};

/// Result of a command, plus whether the new state reached storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutation<T> {
    /// Command result.
    pub value: T,
    /// False when no store is attached or the write failed.
    pub persisted: bool,
}

/// Owns the ledger registry for the lifetime of the process.
pub struct LedgerService {
    registry: RwLock<LedgerRegistry>,
    tz: Tz,
    store: Option<Arc<dyn LedgerStore>>,
    persist_lock: Mutex<()>,
}

impl LedgerService {
    /// Creates a service over an empty registry with no durable storage.
    #[must_use]
    pub fn new(tz: Tz) -> Self {
        Self::from_registry(LedgerRegistry::new(), tz, None)
    }

    fn from_registry(
        registry: LedgerRegistry,
        tz: Tz,
        store: Option<Arc<dyn LedgerStore>>,
    ) -> Self {
        Self {
            registry: RwLock::new(registry),
            tz,
            store,
            persist_lock: Mutex::new(()),
        }
    }

    /// Restores the registry from `store`, or starts empty if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the snapshot cannot be read, and a consistency
    /// error if the stored state does not add up.
    pub async fn open(store: Arc<dyn LedgerStore>, tz: Tz) -> Result<Self, LedgerError> {
        let registry = match store.load().await? {
            Some(snapshot) => LedgerRegistry::restore(snapshot)?,
            None => {
                info!("No stored ledger state, starting empty");
                LedgerRegistry::new()
            }
        };
        Ok(Self::from_registry(registry, tz, Some(store)))
    }

    /// Records one transaction and returns its number.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the request is rejected; nothing is
    /// recorded in that case.
    pub async fn process_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<Mutation<u64>, LedgerError> {
        let number = {
            let mut registry = self.registry.write().await;
            TransactionProcessor::process(&mut registry, request, EntryStamp::now(self.tz))?
        };
        Ok(self.committed(number).await)
    }

    /// Removes every entry of transaction `number` from all ledgers.
    ///
    /// Returns false, without persisting, when no ledger held it.
    pub async fn delete_transaction(&self, number: u64) -> Mutation<bool> {
        let deleted = self.registry.write().await.delete_transaction(number);
        if deleted {
            self.committed(true).await
        } else {
            Mutation {
                value: false,
                persisted: false,
            }
        }
    }

    /// Replaces one ledger's display override.
    pub async fn set_manual_order(&self, kind: LedgerKind, ids: &[LedgerEntryId]) -> Mutation<()> {
        self.registry.write().await.set_manual_order(kind, ids);
        self.committed(()).await
    }

    /// Replaces the all-credits display override.
    pub async fn set_all_credits_order(&self, ids: &[LedgerEntryId]) -> Mutation<()> {
        self.registry.write().await.set_all_credits_order(ids);
        self.committed(()).await
    }

    /// Clears every ledger and restarts numbering at 1.
    pub async fn reset(&self) -> Mutation<()> {
        self.registry.write().await.reset();
        self.committed(()).await
    }

    /// Display copy of one ledger.
    pub async fn get_ledger(&self, kind: LedgerKind) -> LedgerView {
        self.registry.read().await.ledger(kind).view()
    }

    /// Display copies of all four ledgers.
    pub async fn get_all_ledgers(&self) -> BTreeMap<LedgerKind, LedgerView> {
        self.registry.read().await.views()
    }

    /// Sum of the four balances.
    pub async fn total_balance(&self) -> Decimal {
        self.registry.read().await.total_balance()
    }

    /// Every credit entry, in display order.
    pub async fn all_credits_ordered(&self) -> Vec<LedgerEntry> {
        self.registry.read().await.all_credits_ordered()
    }

    /// Every entry of transaction `number`, across ledgers.
    pub async fn transaction_details(&self, number: u64) -> Vec<LedgerEntry> {
        self.registry.read().await.transaction_details(number)
    }

    /// The number the next transaction will get.
    pub async fn next_transaction_number(&self) -> u64 {
        self.registry.read().await.next_transaction_number()
    }

    /// Checks every balance against its entries.
    ///
    /// # Errors
    ///
    /// Returns `BalanceMismatch` for the first ledger that disagrees.
    pub async fn verify(&self) -> Result<(), LedgerError> {
        self.registry.read().await.verify()
    }

    async fn committed<T>(&self, value: T) -> Mutation<T> {
        Mutation {
            value,
            persisted: self.persist().await,
        }
    }

    /// Writes the current state to the store.
    ///
    /// The snapshot is taken under the read lock and written after it is
    /// released. Writes are serialized so an older snapshot never lands after
    /// a newer one.
    async fn persist(&self) -> bool {
        let Some(store) = &self.store else {
            return false;
        };

        let _guard = self.persist_lock.lock().await;
        let snapshot = self.registry.read().await.snapshot();
        match store.persist(&snapshot).await {
            Ok(()) => true,
            Err(e) => {
                error!(
                    error = %e,
                    next_transaction_number = snapshot.next_transaction_number,
                    "Failed to persist ledger state"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::RegistrySnapshot;
    use crate::storage::{SnapshotStore, StorageError};
    use crate::transaction::TransactionType;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    fn cash_in(amount: Decimal, customer_pays: Decimal) -> TransactionRequest {
        TransactionRequest {
            transaction_type: TransactionType::CashIn,
            amount,
            customer_pays,
            source_of_funds: "GCash".to_string(),
            paid_with: None,
            is_paid_with_checked: false,
            notes: String::new(),
        }
    }

    fn memory_store() -> Arc<dyn LedgerStore> {
        Arc::new(SnapshotStore::in_memory("state.json").unwrap())
    }

    struct FailingStore;

    #[async_trait]
    impl LedgerStore for FailingStore {
        async fn load(&self) -> Result<Option<RegistrySnapshot>, StorageError> {
            Ok(None)
        }

        async fn persist(&self, _snapshot: &RegistrySnapshot) -> Result<(), StorageError> {
            Err(StorageError::Operation("disk full".to_string()))
        }
    }

    #[tokio::test]
    async fn test_process_and_query() {
        let service = LedgerService::new(chrono_tz::Asia::Manila);
        let result = service
            .process_transaction(&cash_in(dec!(1000), dec!(1015)))
            .await
            .unwrap();

        assert_eq!(result.value, 1);
        assert!(!result.persisted);
        assert_eq!(service.get_ledger(LedgerKind::Cash).await.balance, dec!(1015));
        assert_eq!(service.total_balance().await, dec!(15));
        assert_eq!(service.transaction_details(1).await.len(), 2);
        assert_eq!(service.all_credits_ordered().await.len(), 1);
        service.verify().await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_request_changes_nothing() {
        let service = LedgerService::new(chrono_tz::Asia::Manila);
        let err = service
            .process_transaction(&cash_in(dec!(-5), dec!(0)))
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(service.next_transaction_number().await, 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_is_not_persisted() {
        let service = LedgerService::open(memory_store(), chrono_tz::Asia::Manila)
            .await
            .unwrap();
        let outcome = service.delete_transaction(99).await;
        assert_eq!(
            outcome,
            Mutation {
                value: false,
                persisted: false
            }
        );
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let store = memory_store();
        let service = LedgerService::open(Arc::clone(&store), chrono_tz::Asia::Manila)
            .await
            .unwrap();
        let first = service
            .process_transaction(&cash_in(dec!(500), dec!(510)))
            .await
            .unwrap();
        assert!(first.persisted);
        let credit = service.get_ledger(LedgerKind::Cash).await.entries[0].id;
        assert!(service.set_all_credits_order(&[credit]).await.persisted);
        drop(service);

        let reopened = LedgerService::open(store, chrono_tz::Asia::Manila)
            .await
            .unwrap();
        assert_eq!(reopened.next_transaction_number().await, 2);
        assert_eq!(reopened.get_ledger(LedgerKind::GCash).await.balance, dec!(-500));
        assert_eq!(reopened.all_credits_ordered().await[0].id, credit);
    }

    #[tokio::test]
    async fn test_persist_failure_keeps_the_command() {
        let service = LedgerService::open(Arc::new(FailingStore), chrono_tz::Asia::Manila)
            .await
            .unwrap();
        let result = service
            .process_transaction(&cash_in(dec!(100), dec!(105)))
            .await
            .unwrap();

        assert!(!result.persisted);
        assert_eq!(service.transaction_details(result.value).await.len(), 2);
    }

    #[tokio::test]
    async fn test_reset_restarts_numbering() {
        let service = LedgerService::new(chrono_tz::Asia::Manila);
        service
            .process_transaction(&cash_in(dec!(100), dec!(105)))
            .await
            .unwrap();
        service.reset().await;

        assert_eq!(service.total_balance().await, Decimal::ZERO);
        let again = service
            .process_transaction(&cash_in(dec!(100), dec!(105)))
            .await
            .unwrap();
        assert_eq!(again.value, 1);
    }

    #[tokio::test]
    async fn test_open_rejects_inconsistent_state() {
        let store = memory_store();
        let mut registry = LedgerRegistry::new();
        registry.allocate_transaction_number().unwrap();
        let mut snapshot = registry.snapshot();
        snapshot.next_transaction_number = 0;
        store.persist(&snapshot).await.unwrap();

        let err = LedgerService::open(store, chrono_tz::Asia::Manila)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, LedgerError::ConsistencyViolation(_)));
    }
}
