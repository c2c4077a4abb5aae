//! Keychain service
//!
//! Stores [`StoredItem`]s in a [`SecureStore`] using their JSON encoding.

use std::sync::Arc;

use relay_domain::coding::TypeRegistry;
use relay_domain::error::EncodeError;
use relay_domain::keychain::{
    Accessibility, GenericCredentials, InternetCredentials, ItemIdentity, StoredItem,
};
use relay_domain::response::payload;
use relay_domain::wire::WireValue;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::ports::{SecureStore, StoreError, StoredRecord};

/// Keychain failures.
#[derive(Debug, Error)]
pub enum KeychainError {
    /// The service URL has no host to file credentials under.
    #[error("service URL has no host")]
    MissingHostInServiceUrl,

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The item could not be encoded.
    #[error("could not encode item: {0}")]
    Encode(#[from] EncodeError),

    /// Stored bytes do not decode into the requested item type.
    #[error("unexpected item data: {0}")]
    UnexpectedItemData(String),
}

/// Typed access to a secure store.
pub struct Keychain<S: SecureStore> {
    store: Arc<S>,
    registry: TypeRegistry,
}

impl<S: SecureStore> Keychain<S> {
    /// Creates a keychain over `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            registry: TypeRegistry::new(),
        }
    }

    /// Reads the item `identity` matches.
    ///
    /// # Errors
    ///
    /// Returns [`KeychainError::UnexpectedItemData`] if the stored bytes do
    /// not decode as `T`, or a store error.
    pub async fn fetch_item<T: StoredItem>(
        &self,
        identity: &ItemIdentity,
    ) -> Result<Option<T>, KeychainError> {
        let Some(record) = self.store.fetch(identity).await? else {
            return Ok(None);
        };
        payload::parse_object(Some(record.data.as_slice()), &self.registry, None)
            .map(Some)
            .map_err(|e| KeychainError::UnexpectedItemData(e.to_string()))
    }

    /// Files `item` under `identity`, replacing any existing item and its
    /// accessibility.
    ///
    /// # Errors
    ///
    /// Returns an error if the item cannot be encoded or stored.
    pub async fn put_item<T: StoredItem>(
        &self,
        item: &T,
        identity: &ItemIdentity,
        accessibility: Accessibility,
    ) -> Result<(), KeychainError> {
        let data = WireValue::Object(item.to_fields()?).to_json_vec()?;
        self.store
            .put(
                identity,
                StoredRecord {
                    data,
                    accessibility,
                },
            )
            .await?;
        debug!(item = T::TYPE_NAME, ?accessibility, "Stored keychain item");
        Ok(())
    }

    /// Removes the items `identity` matches.
    ///
    /// # Returns
    /// Whether an item was removed; a missing item is not an error.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn delete_item(&self, identity: &ItemIdentity) -> Result<bool, KeychainError> {
        Ok(self.store.delete(identity).await?)
    }

    /// Reads credentials stored for a service URL.
    ///
    /// Without an `account`, credentials filed under any account match.
    ///
    /// # Errors
    ///
    /// Returns [`KeychainError::MissingHostInServiceUrl`] if the URL has no
    /// host, or any [`Keychain::fetch_item`] error.
    pub async fn internet_credentials(
        &self,
        service_url: &Url,
        account: Option<&str>,
    ) -> Result<Option<InternetCredentials>, KeychainError> {
        self.fetch_item(&internet_identity(service_url, account)?)
            .await
    }

    /// Stores credentials for a service URL, filed under their account.
    ///
    /// # Errors
    ///
    /// Returns [`KeychainError::MissingHostInServiceUrl`] if the URL has no
    /// host, or any [`Keychain::put_item`] error.
    pub async fn save_internet_credentials(
        &self,
        credentials: &InternetCredentials,
        service_url: &Url,
        accessibility: Accessibility,
    ) -> Result<(), KeychainError> {
        let identity = internet_identity(service_url, Some(&credentials.account))?;
        self.put_item(credentials, &identity, accessibility).await
    }

    /// Removes credentials stored for a service URL.
    ///
    /// # Errors
    ///
    /// Returns [`KeychainError::MissingHostInServiceUrl`] if the URL has no
    /// host, or a store error.
    pub async fn delete_internet_credentials(
        &self,
        service_url: &Url,
        account: Option<&str>,
    ) -> Result<bool, KeychainError> {
        self.delete_item(&internet_identity(service_url, account)?)
            .await
    }

    /// Reads credentials stored for a named service.
    ///
    /// Without an `account`, credentials filed under any account match.
    ///
    /// # Errors
    ///
    /// See [`Keychain::fetch_item`].
    pub async fn generic_credentials(
        &self,
        service: &str,
        account: Option<&str>,
    ) -> Result<Option<GenericCredentials>, KeychainError> {
        self.fetch_item(&ItemIdentity::generic(service, account))
            .await
    }

    /// Stores credentials for a named service, filed under their account.
    ///
    /// # Errors
    ///
    /// See [`Keychain::put_item`].
    pub async fn save_generic_credentials(
        &self,
        credentials: &GenericCredentials,
        service: &str,
        accessibility: Accessibility,
    ) -> Result<(), KeychainError> {
        let identity = ItemIdentity::generic(service, Some(&credentials.account));
        self.put_item(credentials, &identity, accessibility).await
    }
}

fn internet_identity(url: &Url, account: Option<&str>) -> Result<ItemIdentity, KeychainError> {
    ItemIdentity::for_service_url(url, account).ok_or(KeychainError::MissingHostInServiceUrl)
}
