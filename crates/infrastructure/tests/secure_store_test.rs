//! File secure store behind the keychain service.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use relay_application::ports::{SecureStore, StoreError, StoredRecord};
use relay_application::{Keychain, KeychainError};
use relay_domain::keychain::{Accessibility, GenericCredentials, InternetCredentials, ItemIdentity};
use relay_infrastructure::FileSecureStore;
use url::Url;

fn credentials() -> InternetCredentials {
    InternetCredentials {
        account: "ada".into(),
        password: None,
        token: Some("access".into()),
        refresh_token: Some("refresh".into()),
    }
}

#[tokio::test]
async fn test_items_survive_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("keychain.json");
    let url = Url::parse("https://api.example.com/v1/").unwrap();

    let keychain = Keychain::new(Arc::new(FileSecureStore::new(&path)));
    keychain
        .save_internet_credentials(&credentials(), &url, Accessibility::AfterFirstUnlock)
        .await
        .unwrap();

    let reopened = Keychain::new(Arc::new(FileSecureStore::new(&path)));
    let fetched = reopened
        .internet_credentials(&url, Some("ada"))
        .await
        .unwrap();
    assert_eq!(fetched, Some(credentials()));
}

#[tokio::test]
async fn test_fetch_without_account_after_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keychain.json");
    let url = Url::parse("https://api.example.com/v1/").unwrap();

    Keychain::new(Arc::new(FileSecureStore::new(&path)))
        .save_internet_credentials(&credentials(), &url, Accessibility::Always)
        .await
        .unwrap();

    let reopened = Keychain::new(Arc::new(FileSecureStore::new(&path)));
    let fetched = reopened.internet_credentials(&url, None).await.unwrap();
    assert_eq!(fetched, Some(credentials()));

    assert!(reopened.delete_internet_credentials(&url, None).await.unwrap());
    assert_eq!(reopened.internet_credentials(&url, None).await.unwrap(), None);
}

#[tokio::test]
async fn test_file_layout_is_stable_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keychain.json");
    let store = FileSecureStore::new(&path);
    let identity = ItemIdentity::generic("deploy", Some("ops"));

    store
        .put(
            &identity,
            StoredRecord {
                data: br#"{"acc":"ops"}"#.to_vec(),
                accessibility: Accessibility::default(),
            },
        )
        .await
        .unwrap();

    let content = tokio::fs::read_to_string(&path).await.unwrap();
    assert!(content.ends_with('\n'));
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["schema_version"], 1);
    let entry = &json["items"]["generic:deploy#ops"];
    assert_eq!(entry["data"], "eyJhY2MiOiJvcHMifQ==");
    assert_eq!(entry["accessibility"], "when_unlocked");
    assert_eq!(entry["identity"]["service"], "deploy");
}

#[cfg(unix)]
#[tokio::test]
async fn test_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keychain.json");
    let keychain = Keychain::new(Arc::new(FileSecureStore::new(&path)));

    keychain
        .save_generic_credentials(
            &GenericCredentials {
                account: "ops".into(),
                ..GenericCredentials::default()
            },
            "deploy",
            Accessibility::Always,
        )
        .await
        .unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[tokio::test]
async fn test_delete_missing_and_existing() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileSecureStore::new(dir.path().join("keychain.json")));
    let keychain = Keychain::new(Arc::clone(&store));
    let identity = ItemIdentity::generic("deploy", Some("ops"));

    assert!(!keychain.delete_item(&identity).await.unwrap());

    keychain
        .put_item(&credentials(), &identity, Accessibility::Always)
        .await
        .unwrap();
    assert!(store.contains(&identity).await.unwrap());
    assert!(keychain.delete_item(&identity).await.unwrap());
    assert!(!store.contains(&identity).await.unwrap());
}

#[tokio::test]
async fn test_corrupt_file_is_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keychain.json");
    tokio::fs::write(&path, "not json").await.unwrap();

    let keychain = Keychain::new(Arc::new(FileSecureStore::new(&path)));
    let err = keychain
        .generic_credentials("deploy", None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        KeychainError::Store(StoreError::Serialization(_))
    ));
}
