//! In-memory storage provider.
//!
//! Values are kept as-is (no serialization) in a [`MemoryContainer`], a
//! cloneable handle to a single shared map. Several providers may share one
//! container; giving each a distinct namespace keeps their entries apart.
//! Nothing is persisted: the data lives as long as the container does.
//!
//! Entries are stored under `namespace + '\0' + key`, with an empty namespace
//! when none is set. As long as namespaces contain no NUL, one namespace
//! can never reach into another's entries, even when a name contains `:`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StorageResult;
use crate::provider::StorageProvider;

const NAMESPACE_END: char = '\0';

#[derive(Debug)]
struct Entries<T> {
    // Each value carries the sequence number of its first insert so `list`
    // can report insertion order.
    map: HashMap<String, (u64, T)>,
    next_seq: u64,
}

/// Shared map backing one or more [`MemoryProvider`]s.
#[derive(Debug, Clone)]
pub struct MemoryContainer<T> {
    entries: Arc<RwLock<Entries<T>>>,
}

impl<T> MemoryContainer<T> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Entries {
                map: HashMap::new(),
                next_seq: 0,
            })),
        }
    }

    /// Number of entries across every namespace.
    pub async fn len(&self) -> usize {
        self.entries.read().await.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<T> Default for MemoryContainer<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A [`StorageProvider`] over a [`MemoryContainer`].
#[derive(Debug, Clone)]
pub struct MemoryProvider<T> {
    container: MemoryContainer<T>,
    namespace: Option<String>,
}

impl<T> MemoryProvider<T> {
    /// A provider over its own fresh container.
    pub fn new() -> Self {
        Self::with_container(MemoryContainer::new(), None)
    }

    pub fn with_container(container: MemoryContainer<T>, namespace: Option<String>) -> Self {
        Self { container, namespace }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn full_key(&self, key: &str) -> String {
        let ns = self.namespace.as_deref().unwrap_or_default();
        format!("{ns}{NAMESPACE_END}{key}")
    }

    async fn put(&self, key: &str, value: T) {
        let key = self.full_key(key);
        let mut entries = self.container.entries.write().await;
        let existing = entries.map.get(&key).map(|(seq, _)| *seq);
        let seq = match existing {
            Some(seq) => seq,
            None => {
                entries.next_seq += 1;
                entries.next_seq
            }
        };
        entries.map.insert(key, (seq, value));
    }
}

impl<T> Default for MemoryProvider<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> StorageProvider<T> for MemoryProvider<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, key: &str, value: T) -> StorageResult<()> {
        self.put(key, value).await;
        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<Option<T>> {
        let key = self.full_key(key);
        let entries = self.container.entries.read().await;
        Ok(entries.map.get(&key).map(|(_, value)| value.clone()))
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<T>> {
        let prefix = self.full_key(prefix);
        let entries = self.container.entries.read().await;
        let mut matches: Vec<_> = entries
            .map
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(_, (seq, value))| (*seq, value.clone()))
            .collect();
        matches.sort_by_key(|(seq, _)| *seq);
        debug!(%prefix, count = matches.len(), "Memory list");
        Ok(matches.into_iter().map(|(_, value)| value).collect())
    }

    async fn update(&self, key: &str, value: T) -> StorageResult<()> {
        self.put(key, value).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<bool> {
        let key = self.full_key(key);
        let mut entries = self.container.entries.write().await;
        Ok(entries.map.remove(&key).is_some())
    }

    async fn close(&self) -> StorageResult<()> {
        Ok(())
    }
}
