//! Snapshot store implementation using Apache OpenDAL.

use async_trait::async_trait;
use opendal::{ErrorKind, Operator, OperatorBuilder, services};
use pitaka_shared::config::{StorageProvider, StorageSettings};
use tracing::debug;

use super::error::StorageError;
use crate::ledger::RegistrySnapshot;

/// Durable home of the registry state.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Reads the stored state, or `None` when nothing has been stored yet.
    async fn load(&self) -> Result<Option<RegistrySnapshot>, StorageError>;

    /// Replaces the stored state.
    async fn persist(&self, snapshot: &RegistrySnapshot) -> Result<(), StorageError>;
}

/// Stores the registry snapshot as a single JSON document.
pub struct SnapshotStore {
    operator: Operator,
    provider: &'static str,
    key: String,
}

impl SnapshotStore {
    /// Create a store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&settings.provider)?;
        Ok(Self {
            operator,
            provider: settings.provider.name(),
            key: settings.snapshot_key.clone(),
        })
    }

    /// Create a store backed by process memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory operator cannot be built.
    pub fn in_memory(key: impl Into<String>) -> Result<Self, StorageError> {
        Ok(Self {
            operator: Self::create_operator(&StorageProvider::Memory)?,
            provider: StorageProvider::Memory.name(),
            key: key.into(),
        })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        let operator = match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);
                Operator::new(builder).map(OperatorBuilder::finish)
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );
                Operator::new(builder).map(OperatorBuilder::finish)
            }
            StorageProvider::Memory => {
                Operator::new(services::Memory::default()).map(OperatorBuilder::finish)
            }
        };

        operator.map_err(|e| StorageError::configuration(e.to_string()))
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider
    }

    /// Key of the snapshot document.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl LedgerStore for SnapshotStore {
    async fn load(&self) -> Result<Option<RegistrySnapshot>, StorageError> {
        let buffer = match self.operator.read(&self.key).await {
            Ok(buffer) => buffer,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let snapshot = serde_json::from_slice(&buffer.to_vec())?;
        debug!(key = %self.key, provider = self.provider, "Snapshot loaded");
        Ok(Some(snapshot))
    }

    async fn persist(&self, snapshot: &RegistrySnapshot) -> Result<(), StorageError> {
        let body = serde_json::to_vec(snapshot)?;
        let size = body.len();
        self.operator.write(&self.key, body).await?;
        debug!(key = %self.key, provider = self.provider, bytes = size, "Snapshot persisted");
        Ok(())
    }
}
