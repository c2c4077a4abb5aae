//! In-memory secure store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use relay_application::ports::{SecureStore, StoreError, StoredRecord};
use relay_domain::keychain::ItemIdentity;
use tokio::sync::RwLock;

/// Secure store that forgets everything when dropped. Useful for tests and
/// for platforms without persistent storage.
#[derive(Debug, Default)]
pub struct MemorySecureStore {
    records: RwLock<BTreeMap<String, (ItemIdentity, StoredRecord)>>,
}

impl MemorySecureStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl SecureStore for MemorySecureStore {
    async fn fetch(&self, identity: &ItemIdentity) -> Result<Option<StoredRecord>, StoreError> {
        let records = self.records.read().await;
        let found = records
            .get(&identity.storage_key())
            .or_else(|| records.values().find(|(stored, _)| identity.matches(stored)));
        Ok(found.map(|(_, record)| record.clone()))
    }

    async fn put(&self, identity: &ItemIdentity, record: StoredRecord) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .insert(identity.storage_key(), (identity.clone(), record));
        Ok(())
    }

    async fn delete(&self, identity: &ItemIdentity) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, (stored, _)| !identity.matches(stored));
        Ok(records.len() < before)
    }
}
