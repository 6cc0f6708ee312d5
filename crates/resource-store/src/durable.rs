//! # Durable Storage Provider
//!
//! [`RedbProvider`] persists resources in a single [redb](https://docs.rs/redb)
//! database file, one table (`resources`) for every type.
//!
//! ## Key Layout
//!
//! The logical key `"type:id"` is split on its first `:` into segments and
//! prefixed with the namespace (empty when none is configured):
//!
//! ```text
//! [namespace, type, id]  ->  { "type": .., "id": .., "properties": .., "_links": .. }
//! ```
//!
//! Each segment is terminated by a NUL byte in the stored key. A list prefix
//! terminates only its complete segments, so `list("item:")` never returns
//! an `items` resource while `list("task:4")` still matches `task:42`.
//!
//! ## Values
//!
//! Values are the JSON wire record of the resource (see
//! [`Resource::to_record`]). Reads rebuild the resource through
//! [`Resource::from_record`], embedded children included.
//!
//! redb is a blocking API; every call runs on `tokio::task::spawn_blocking`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableTable, TableDefinition};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{RecordError, StorageError, StorageResult};
use crate::provider::StorageProvider;
use crate::resource::Resource;

const RESOURCES: TableDefinition<&str, &[u8]> = TableDefinition::new("resources");

const SEGMENT_END: char = '\0';

fn push_segment(key: &mut String, segment: &str) {
    key.push_str(segment);
    key.push(SEGMENT_END);
}

/// A [`StorageProvider`] backed by a redb database file.
///
/// [`StorageProvider::init`] must be called before any other operation;
/// until then every call fails with [`StorageError::NotInitialized`].
pub struct RedbProvider {
    path: PathBuf,
    namespace: Option<String>,
    db: RwLock<Option<Arc<Database>>>,
}

impl RedbProvider {
    pub fn new(path: impl Into<PathBuf>, namespace: Option<String>) -> Self {
        Self {
            path: path.into(),
            namespace,
            db: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub async fn is_open(&self) -> bool {
        self.db.read().await.is_some()
    }

    /// Encodes a logical `type:id` key into its stored form.
    fn storage_key(&self, logical: &str) -> String {
        let mut key = self.namespace_segment();
        match logical.split_once(':') {
            Some((kind, id)) => {
                push_segment(&mut key, kind);
                push_segment(&mut key, id);
            }
            None => push_segment(&mut key, logical),
        }
        key
    }

    /// Encodes a list prefix. Complete segments are terminated; the trailing
    /// partial segment is not, so the scan keeps plain string-prefix
    /// semantics within the namespace.
    fn storage_prefix(&self, prefix: &str) -> String {
        let mut key = self.namespace_segment();
        match prefix.split_once(':') {
            Some((kind, partial_id)) => {
                push_segment(&mut key, kind);
                key.push_str(partial_id);
            }
            None => key.push_str(prefix),
        }
        key
    }

    // Always present, empty without a namespace, so namespaced and plain
    // keys never share a prefix.
    fn namespace_segment(&self) -> String {
        let mut key = String::new();
        push_segment(&mut key, self.namespace.as_deref().unwrap_or_default());
        key
    }

    async fn handle(&self) -> StorageResult<Arc<Database>> {
        self.db
            .read()
            .await
            .clone()
            .ok_or(StorageError::NotInitialized { backend: "redb" })
    }

    /// Runs `op` against the open database on the blocking pool.
    async fn blocking<R, F>(&self, op: F) -> StorageResult<R>
    where
        F: FnOnce(&Database) -> StorageResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let db = self.handle().await?;
        tokio::task::spawn_blocking(move || op(&db)).await?
    }

    async fn put(&self, key: &str, resource: Resource) -> StorageResult<()> {
        let key = self.storage_key(key);
        let bytes = encode(&resource)?;
        self.blocking(move |db| {
            let txn = db.begin_write()?;
            {
                let mut table = txn.open_table(RESOURCES)?;
                table.insert(key.as_str(), bytes.as_slice())?;
            }
            txn.commit()?;
            Ok(())
        })
        .await
    }
}

fn encode(resource: &Resource) -> StorageResult<Vec<u8>> {
    Ok(serde_json::to_vec(&resource.to_record()).map_err(RecordError::Encode)?)
}

fn decode(bytes: &[u8]) -> StorageResult<Resource> {
    let record: serde_json::Value =
        serde_json::from_slice(bytes).map_err(RecordError::Malformed)?;
    Ok(Resource::from_record(record)?)
}

#[async_trait]
impl StorageProvider<Resource> for RedbProvider {
    fn backend(&self) -> &'static str {
        "redb"
    }

    async fn init(&self) -> StorageResult<()> {
        let mut slot = self.db.write().await;
        if slot.is_some() {
            return Ok(());
        }

        let path = self.path.clone();
        let db = tokio::task::spawn_blocking(move || -> StorageResult<Database> {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let db = Database::create(&path)?;
            // Make sure the table exists so read transactions can open it.
            let txn = db.begin_write()?;
            txn.open_table(RESOURCES)?;
            txn.commit()?;
            Ok(db)
        })
        .await??;

        info!(path = %self.path.display(), namespace = ?self.namespace, "Opened redb store");
        *slot = Some(Arc::new(db));
        Ok(())
    }

    async fn create(&self, key: &str, value: Resource) -> StorageResult<()> {
        self.put(key, value).await
    }

    async fn get(&self, key: &str) -> StorageResult<Option<Resource>> {
        let key = self.storage_key(key);
        let bytes = self
            .blocking(move |db| {
                let txn = db.begin_read()?;
                let table = txn.open_table(RESOURCES)?;
                let bytes = table.get(key.as_str())?.map(|guard| guard.value().to_vec());
                Ok(bytes)
            })
            .await?;
        bytes.as_deref().map(decode).transpose()
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<Resource>> {
        let prefix = self.storage_prefix(prefix);
        let rows = self
            .blocking(move |db| {
                let txn = db.begin_read()?;
                let table = txn.open_table(RESOURCES)?;
                let mut rows = Vec::new();
                for entry in table.range(prefix.as_str()..)? {
                    let (key, value) = entry?;
                    if !key.value().starts_with(prefix.as_str()) {
                        break;
                    }
                    rows.push(value.value().to_vec());
                }
                Ok(rows)
            })
            .await?;
        debug!(count = rows.len(), "Redb list");
        rows.iter().map(|bytes| decode(bytes)).collect()
    }

    async fn update(&self, key: &str, value: Resource) -> StorageResult<()> {
        self.put(key, value).await
    }

    async fn delete(&self, key: &str) -> StorageResult<bool> {
        let key = self.storage_key(key);
        self.blocking(move |db| {
            let txn = db.begin_write()?;
            let existed = {
                let mut table = txn.open_table(RESOURCES)?;
                let removed = table.remove(key.as_str())?;
                removed.is_some()
            };
            txn.commit()?;
            Ok(existed)
        })
        .await
    }

    async fn close(&self) -> StorageResult<()> {
        if self.db.write().await.take().is_some() {
            info!(path = %self.path.display(), "Closed redb store");
        }
        Ok(())
    }
}
