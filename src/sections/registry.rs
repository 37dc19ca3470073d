use serde_json::{Map, Value};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::mapping::{SectionMapping, ValidationError};
use crate::storage::{SectionStore, StorageError};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid sections: {0}")]
    Validation(#[from] ValidationError),
    #[error("failed to persist sections: {0}")]
    Persistence(#[from] StorageError),
}

/// Live label -> section id mapping shared by every request.
///
/// Readers take an `Arc` snapshot and never observe a half-applied update.
/// Updates are persisted first and swapped in afterwards, so a failed write
/// leaves memory and storage on the previous mapping.
pub struct SectionRegistry {
    current: RwLock<Arc<SectionMapping>>,
    store: Arc<dyn SectionStore>,
    update_lock: Mutex<()>,
}

impl SectionRegistry {
    pub fn new(mapping: SectionMapping, store: Arc<dyn SectionStore>) -> Self {
        Self {
            current: RwLock::new(Arc::new(mapping)),
            store,
            update_lock: Mutex::new(()),
        }
    }

    /// Initial state from storage, or the built-in default when nothing is
    /// stored yet or the stored document is unreadable.
    pub async fn load(store: Arc<dyn SectionStore>) -> Result<Self, RegistryError> {
        let mapping = match store.load_sections().await {
            Ok(Some(mapping)) => {
                info!(sections = mapping.len(), "Loaded persisted section mapping");
                mapping
            }
            Ok(None) => {
                info!("No persisted section mapping, using built-in default");
                SectionMapping::builtin_default()
            }
            Err(StorageError::Corrupt(reason)) => {
                warn!(%reason, "Persisted section mapping is unreadable, using built-in default");
                SectionMapping::builtin_default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self::new(mapping, store))
    }

    /// Current mapping as a consistent read-only snapshot.
    pub fn snapshot(&self) -> Arc<SectionMapping> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn resolve(&self, label: &str) -> Option<u64> {
        self.snapshot().resolve(label)
    }

    /// Validates, persists and swaps in a complete replacement mapping.
    pub async fn replace_all(
        &self,
        raw: &Map<String, Value>,
    ) -> Result<Arc<SectionMapping>, RegistryError> {
        let mapping = SectionMapping::from_json(raw)?;

        let _guard = self.update_lock.lock().await;
        self.store.save_sections(&mapping).await?;

        let mapping = Arc::new(mapping);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = mapping.clone();

        info!(sections = mapping.len(), "Section mapping replaced");
        Ok(mapping)
    }
}
