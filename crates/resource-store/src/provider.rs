//! # StorageProvider Trait
//!
//! The capability contract every storage backend satisfies. The
//! [`ResourceStore`](crate::ResourceStore) only ever talks to a
//! `dyn StorageProvider<Resource>`, so backends can be swapped without the
//! façade noticing.
//!
//! Keys are opaque strings built by the caller as `"type:id"`. `create` and
//! `update` are both upserts: neither fails because a key is present or
//! absent.
use async_trait::async_trait;

use crate::error::StorageResult;

/// Minimal async CRUD + list + close contract over values of type `T`.
///
/// # Example
///
/// ```rust
/// use resource_store::{MemoryProvider, StorageProvider};
///
/// #[tokio::main]
/// async fn main() {
///     let provider = MemoryProvider::<String>::new();
///     provider.create("note:1", "hello".to_string()).await.unwrap();
///
///     let notes = provider.list("note:").await.unwrap();
///     assert_eq!(notes, vec!["hello".to_string()]);
///     assert!(provider.delete("note:1").await.unwrap());
/// }
/// ```
#[async_trait]
pub trait StorageProvider<T: Send + 'static>: Send + Sync {
    /// Short backend name used in logs and errors.
    fn backend(&self) -> &'static str;

    /// Opens the backend. Backends with nothing to open keep the default.
    async fn init(&self) -> StorageResult<()> {
        Ok(())
    }

    /// Inserts `value` under `key`, overwriting any existing value.
    async fn create(&self, key: &str, value: T) -> StorageResult<()>;

    async fn get(&self, key: &str) -> StorageResult<Option<T>>;

    /// Every value whose key starts with `prefix`, in backend order.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<T>>;

    /// Same upsert semantics as [`StorageProvider::create`].
    async fn update(&self, key: &str, value: T) -> StorageResult<()>;

    /// Removes `key`, returning whether an entry was removed.
    async fn delete(&self, key: &str) -> StorageResult<bool>;

    /// Releases backend resources. Safe to call more than once, or before `init`.
    async fn close(&self) -> StorageResult<()>;
}
