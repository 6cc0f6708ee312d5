//! # Resource Store
//!
//! [`ResourceStore`] is the single entry point callers use. It hides which
//! backend is in play, derives storage keys (`type:id`) and forwards each
//! call to one [`StorageProvider`].
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized --(first op / initialize())--> Initialized --(close())--> Closed
//!       ^                                                                   |
//!       +---------------- next op re-opens a provider ---------------------+
//! ```
//!
//! Construction performs no I/O. The provider is built and opened on first
//! use and reused afterwards. `close()` only releases the current provider;
//! the next operation opens a fresh one.
//!
//! ## Semantics
//!
//! - `create_resource` and `update_resource` are both upserts.
//! - `get_resource` returns `Ok(None)` for a missing resource.
//! - `delete_resource` returns whether something was removed.
//! - Provider errors are returned unchanged: no retries, no fallback.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::config::StorageConfig;
use crate::durable::RedbProvider;
use crate::error::StorageResult;
use crate::memory::{MemoryContainer, MemoryProvider};
use crate::provider::StorageProvider;
use crate::resource::{resource_key, Resource};

/// Observable lifecycle state of a [`ResourceStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Uninitialized,
    Initialized,
    Closed,
}

enum Slot {
    Uninitialized,
    Open(Arc<dyn StorageProvider<Resource>>),
    Closed,
}

/// Façade over the configured storage backend.
///
/// # Example
///
/// ```rust
/// use resource_store::{Link, Resource, ResourceStore, StorageConfig};
///
/// #[tokio::main]
/// async fn main() {
///     let store = ResourceStore::new(StorageConfig::memory());
///
///     let mut task = Resource::new("task", "1");
///     task.set_property("title", "Write docs");
///     task.add_link("self", Link::new("/tasks/1"));
///     store.create_resource(&task).await.unwrap();
///
///     let found = store.get_resource("task", "1").await.unwrap().unwrap();
///     assert_eq!(found.property("title"), Some("Write docs".into()));
///     assert_eq!(store.list_resources("task").await.unwrap().len(), 1);
///
///     store.close().await.unwrap();
/// }
/// ```
pub struct ResourceStore {
    config: StorageConfig,
    // Backs every memory provider this store opens, so data survives close/re-open.
    memory: MemoryContainer<Resource>,
    slot: Mutex<Slot>,
}

impl ResourceStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            memory: MemoryContainer::new(),
            slot: Mutex::new(Slot::Uninitialized),
        }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub async fn state(&self) -> StoreState {
        match &*self.slot.lock().await {
            Slot::Uninitialized => StoreState::Uninitialized,
            Slot::Open(_) => StoreState::Initialized,
            Slot::Closed => StoreState::Closed,
        }
    }

    /// Opens the configured backend now instead of on first use.
    pub async fn initialize(&self) -> StorageResult<()> {
        self.provider().await.map(|_| ())
    }

    fn build_provider(&self) -> Arc<dyn StorageProvider<Resource>> {
        match &self.config {
            StorageConfig::Memory { namespace } => Arc::new(MemoryProvider::with_container(
                self.memory.clone(),
                namespace.clone(),
            )),
            StorageConfig::Durable { path, namespace } => {
                Arc::new(RedbProvider::new(path.clone(), namespace.clone()))
            }
            StorageConfig::Custom(provider) => provider.clone(),
        }
    }

    async fn provider(&self) -> StorageResult<Arc<dyn StorageProvider<Resource>>> {
        let mut slot = self.slot.lock().await;
        if let Slot::Open(provider) = &*slot {
            return Ok(provider.clone());
        }

        let provider = self.build_provider();
        provider.init().await?;
        info!(backend = provider.backend(), "Resource store initialized");
        *slot = Slot::Open(provider.clone());
        Ok(provider)
    }

    #[instrument(skip_all, fields(key = %resource.key()))]
    pub async fn create_resource(&self, resource: &Resource) -> StorageResult<()> {
        let provider = self.provider().await?;
        provider.create(&resource.key(), resource.clone()).await?;
        debug!("Created");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_resource(&self, kind: &str, id: &str) -> StorageResult<Option<Resource>> {
        let provider = self.provider().await?;
        let resource = provider.get(&resource_key(kind, id)).await?;
        debug!(found = resource.is_some(), "Get");
        Ok(resource)
    }

    #[instrument(skip_all, fields(key = %resource.key()))]
    pub async fn update_resource(&self, resource: &Resource) -> StorageResult<()> {
        let provider = self.provider().await?;
        provider.update(&resource.key(), resource.clone()).await?;
        debug!("Updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_resource(&self, kind: &str, id: &str) -> StorageResult<bool> {
        let provider = self.provider().await?;
        let deleted = provider.delete(&resource_key(kind, id)).await?;
        debug!(deleted, "Delete");
        Ok(deleted)
    }

    /// Every resource of `kind`; empty when there are none.
    #[instrument(skip(self))]
    pub async fn list_resources(&self, kind: &str) -> StorageResult<Vec<Resource>> {
        let provider = self.provider().await?;
        let resources = provider.list(&format!("{kind}:")).await?;
        debug!(count = resources.len(), "List");
        Ok(resources)
    }

    /// Releases the current provider. Does nothing if none is open.
    pub async fn close(&self) -> StorageResult<()> {
        let mut slot = self.slot.lock().await;
        let Slot::Open(provider) = &*slot else {
            return Ok(());
        };
        let provider = provider.clone();
        *slot = Slot::Closed;
        provider.close().await?;
        info!(backend = provider.backend(), "Resource store closed");
        Ok(())
    }
}
