//! Secure store port
//!
//! Defines the interface for credential persistence. Values are opaque bytes;
//! the keychain service owns their encoding.

use async_trait::async_trait;
use relay_domain::keychain::{Accessibility, ItemIdentity};

/// Errors that can occur during secure store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The backing store cannot be used.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// One stored value together with its access policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    /// Opaque item bytes.
    pub data: Vec<u8>,
    /// When the item may be read.
    pub accessibility: Accessibility,
}

/// Key-value store for credentials keyed by identity.
///
/// Writes file a record under the exact identity. Reads and deletes follow
/// [`ItemIdentity::matches`]: an identity without an account reaches items
/// under any account. A read prefers the exact item, then the first match
/// in storage-key order.
#[async_trait]
pub trait SecureStore: Send + Sync {
    /// Reads the record `identity` matches.
    ///
    /// # Returns
    /// `None` if nothing matches.
    async fn fetch(&self, identity: &ItemIdentity) -> Result<Option<StoredRecord>, StoreError>;

    /// Writes a record, replacing any existing one.
    ///
    /// # Errors
    /// Returns an error if the record cannot be persisted.
    async fn put(&self, identity: &ItemIdentity, record: StoredRecord) -> Result<(), StoreError>;

    /// Removes every record `identity` matches.
    ///
    /// # Returns
    /// Whether a record was removed. Removing a missing record is not an error.
    async fn delete(&self, identity: &ItemIdentity) -> Result<bool, StoreError>;

    /// Returns whether a record is filed under `identity`.
    async fn contains(&self, identity: &ItemIdentity) -> Result<bool, StoreError> {
        Ok(self.fetch(identity).await?.is_some())
    }
}
