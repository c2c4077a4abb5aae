//! File-based secure store implementation.
//!
//! Items live in a single JSON file, by default
//! `<data dir>/relay/keychain.json`. The file is written with owner-only
//! permissions on Unix; it is not encrypted.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use relay_application::ports::{SecureStore, StoreError, StoredRecord};
use relay_domain::keychain::{Accessibility, ItemIdentity};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

const SCHEMA_VERSION: u32 = 1;

/// On-disk layout:
/// ```json
/// {
///   "schema_version": 1,
///   "items": {
///     "generic:deploy#ops": {
///       "identity": { "kind": "generic", "service": "deploy", "account": "ops" },
///       "data": "eyJhY2MiOiJvcHMifQ==",
///       "accessibility": "when_unlocked"
///     }
///   }
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    schema_version: u32,
    #[serde(default)]
    items: BTreeMap<String, FileEntry>,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            items: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FileEntry {
    identity: ItemIdentity,
    data: String,
    #[serde(default)]
    accessibility: Accessibility,
}

/// Secure store persisted as a JSON file.
#[derive(Debug)]
pub struct FileSecureStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSecureStore {
    /// Creates a store backed by the file at `path`.
    ///
    /// The file and its parent directory are created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Creates a store in the platform's user data directory.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the platform has no data directory.
    pub fn in_data_dir() -> Result<Self, StoreError> {
        Self::default_path()
            .map(Self::new)
            .ok_or_else(|| StoreError::Unavailable("no user data directory".to_string()))
    }

    /// `<data dir>/relay/keychain.json`, if the platform has a data directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("relay").join("keychain.json"))
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<StoreFile, StoreError> {
        let content = match fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoreFile::default());
            }
            Err(e) => return Err(e.into()),
        };

        let file: StoreFile =
            from_json_bytes(&content).map_err(|e| StoreError::Serialization(e.to_string()))?;
        if file.schema_version > SCHEMA_VERSION {
            return Err(StoreError::Unavailable(format!(
                "unsupported schema version {}",
                file.schema_version
            )));
        }
        Ok(file)
    }

    async fn save(&self, file: &StoreFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content =
            to_json_stable_bytes(file).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, &content).await?;
        restrict_permissions(&staging).await?;
        fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[async_trait]
impl SecureStore for FileSecureStore {
    async fn fetch(&self, identity: &ItemIdentity) -> Result<Option<StoredRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        let file = self.load().await?;

        let found = file.items.get(&identity.storage_key()).or_else(|| {
            file.items
                .values()
                .find(|entry| identity.matches(&entry.identity))
        });
        let Some(entry) = found else {
            return Ok(None);
        };
        let data = STANDARD
            .decode(&entry.data)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        Ok(Some(StoredRecord {
            data,
            accessibility: entry.accessibility,
        }))
    }

    async fn put(&self, identity: &ItemIdentity, record: StoredRecord) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;

        file.items.insert(
            identity.storage_key(),
            FileEntry {
                identity: identity.clone(),
                data: STANDARD.encode(&record.data),
                accessibility: record.accessibility,
            },
        );
        self.save(&file).await?;
        debug!(path = %self.path.display(), items = file.items.len(), "Saved secure store");
        Ok(())
    }

    async fn delete(&self, identity: &ItemIdentity) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;

        let before = file.items.len();
        file.items.retain(|_, entry| !identity.matches(&entry.identity));
        if file.items.len() == before {
            return Ok(false);
        }
        self.save(&file).await?;
        Ok(true)
    }
}
