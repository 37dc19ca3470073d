//! Durable storage for the section mapping
//! Uses Apache Arrow object_store crate

use async_trait::async_trait;
use object_store::{ObjectStore, local::LocalFileSystem, path::Path as StoragePath};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{StorageConfig, StorageProvider};
use crate::sections::SectionMapping;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Stored sections are unreadable: {0}")]
    Corrupt(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Object store error: {0}")]
    ObjectStoreError(#[from] object_store::Error),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

/// Load/save contract for the persisted mapping blob.
#[async_trait]
pub trait SectionStore: Send + Sync {
    /// Returns `Ok(None)` when nothing has been stored yet.
    async fn load_sections(&self) -> Result<Option<SectionMapping>>;

    /// Overwrites the stored mapping wholesale.
    async fn save_sections(&self, mapping: &SectionMapping) -> Result<()>;
}

/// On-disk document: `{"sections": {"movies": 2, ...}}`
#[derive(Debug, Serialize, Deserialize)]
struct SectionsDocument {
    sections: SectionMapping,
}

/// Storage client wrapping object_store
#[derive(Clone)]
pub struct StorageClient {
    store: Arc<dyn ObjectStore>,
    key: String,
}

impl StorageClient {
    /// Create new storage client with any object_store backend
    pub fn new(store: Arc<dyn ObjectStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Create in-memory storage for testing/development
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(object_store::memory::InMemory::new()),
            "sections.json",
        )
    }

    /// Local directory rooted store; the directory is created if missing.
    pub fn local(root: &Path, key: impl Into<String>) -> Result<Self> {
        std::fs::create_dir_all(root)?;
        let store = LocalFileSystem::new_with_prefix(root)?;
        Ok(Self::new(Arc::new(store), key))
    }

    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        match config.provider {
            StorageProvider::Local => Self::local(&config.path, config.key.clone()),
            StorageProvider::Memory => Ok(Self::new(
                Arc::new(object_store::memory::InMemory::new()),
                config.key.clone(),
            )),
        }
    }

    /// Upload bytes to storage
    pub async fn upload(&self, key: &str, data: Vec<u8>) -> Result<()> {
        let path = StoragePath::from(key);
        let size = data.len();

        self.store
            .put(&path, data.into())
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        tracing::debug!(key, size, "Uploaded to storage");
        Ok(())
    }

    /// Download from storage
    pub async fn download(&self, key: &str) -> Result<Vec<u8>> {
        let path = StoragePath::from(key);

        let result = match self.store.get(&path).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => {
                return Err(StorageError::NotFound(key.to_string()));
            }
            Err(e) => return Err(StorageError::DownloadFailed(e.to_string())),
        };

        let bytes = result.bytes().await?;

        tracing::debug!(key, size = bytes.len(), "Downloaded from storage");

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SectionStore for StorageClient {
    async fn load_sections(&self) -> Result<Option<SectionMapping>> {
        let bytes = match self.download(&self.key).await {
            Ok(bytes) => bytes,
            Err(StorageError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        let document: SectionsDocument = serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;

        Ok(Some(document.sections))
    }

    async fn save_sections(&self, mapping: &SectionMapping) -> Result<()> {
        let document = SectionsDocument {
            sections: mapping.clone(),
        };
        let data = serde_json::to_vec_pretty(&document)
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        self.upload(&self.key, data).await?;
        tracing::info!(key = %self.key, sections = mapping.len(), "Persisted section mapping");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_blob_loads_as_none() {
        let storage = StorageClient::in_memory();
        assert!(storage.load_sections().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let storage = StorageClient::in_memory();
        let mapping = SectionMapping::from_pairs([("anime", 5), ("movies", 1)]).unwrap();

        storage.save_sections(&mapping).await.unwrap();

        let loaded = storage.load_sections().await.unwrap().unwrap();
        assert_eq!(loaded, mapping);
    }

    #[tokio::test]
    async fn test_corrupt_blob() {
        let storage = StorageClient::in_memory();
        storage
            .upload("sections.json", br#"{"sections": {"x": 0}}"#.to_vec())
            .await
            .unwrap();

        let err = storage.load_sections().await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt(_)));
    }

    #[tokio::test]
    async fn test_local_store_writes_document() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("state");
        let storage = StorageClient::local(&root, "sections.json").unwrap();

        let mapping = SectionMapping::from_pairs([("shows", 3)]).unwrap();
        storage.save_sections(&mapping).await.unwrap();

        let on_disk = std::fs::read_to_string(root.join("sections.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&on_disk).unwrap();
        assert_eq!(parsed, serde_json::json!({"sections": {"shows": 3}}));

        let reopened = StorageClient::local(&root, "sections.json").unwrap();
        assert_eq!(reopened.load_sections().await.unwrap(), Some(mapping));
    }
}
