//! # Resource Store
//!
//! Hypermedia (HATEOAS) resources and a pluggable async storage layer.
//!
//! ## Architecture Overview
//!
//! The crate separates concerns into three layers:
//!
//! 1. **Model Layer** ([`Resource`], [`Link`]) - typed entities with properties,
//!    hypermedia links, embedded children and a state label
//! 2. **Provider Layer** ([`StorageProvider`]) - the CRUD + list + close contract,
//!    implemented by [`MemoryProvider`], [`RedbProvider`] and any custom backend
//! 3. **Façade Layer** ([`ResourceStore`]) - key derivation (`type:id`), lazy
//!    initialization and forwarding
//!
//! ```text
//! caller -> ResourceStore::op -> ensure initialized -> StorageProvider::op
//! ```
//!
//! ## Choosing a Backend
//!
//! | [`StorageConfig`] | Provider | Persistence |
//! |-------------------|----------|-------------|
//! | `Memory { namespace }` | [`MemoryProvider`] | none |
//! | `Durable { path, namespace }` | [`RedbProvider`] | redb file |
//! | `Custom(provider)` | yours | yours |
//!
//! ## Errors
//!
//! Nothing in this crate swallows an error. Missing resources are not errors:
//! `get_resource` returns `Ok(None)` and `delete_resource` returns `Ok(false)`.
//! Backend failures surface as [`StorageError`]; bad configuration as
//! [`ConfigError`].
//!
//! ## Testing
//!
//! The [`mock`] module provides a [`MockProvider`](mock::MockProvider) with
//! queued expectations for testing error paths without a real backend.

pub mod config;
pub mod durable;
pub mod error;
pub mod memory;
pub mod mock;
pub mod provider;
pub mod resource;
pub mod store;

// Re-export core types for convenience
pub use config::{StorageConfig, StorageKind, StorageSettings, DEFAULT_DURABLE_PATH};
pub use durable::RedbProvider;
pub use error::{ConfigError, RecordError, StorageError, StorageResult};
pub use memory::{MemoryContainer, MemoryProvider};
pub use provider::StorageProvider;
pub use resource::{resource_key, Link, Resource, DEFAULT_LINK_METHOD};
pub use store::{ResourceStore, StoreState};
