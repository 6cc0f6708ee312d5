//! Storage configuration.
//!
//! [`StorageConfig`] is the typed backend selection handed to
//! [`ResourceStore::new`](crate::ResourceStore::new). Untyped settings (from
//! a CLI, env vars or a config file) arrive as [`StorageSettings`] and are
//! checked by [`StorageConfig::from_settings`], which is where an unknown
//! backend kind or a missing custom provider is rejected.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::provider::StorageProvider;
use crate::resource::Resource;

/// Database file used by the durable backend when no path is configured.
pub const DEFAULT_DURABLE_PATH: &str = "resources.redb";

/// Backend kinds accepted in [`StorageSettings::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    Durable,
    Custom,
}

impl FromStr for StorageKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(StorageKind::Memory),
            "durable" => Ok(StorageKind::Durable),
            "custom" => Ok(StorageKind::Custom),
            other => Err(ConfigError::UnsupportedKind(other.to_string())),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageKind::Memory => "memory",
            StorageKind::Durable => "durable",
            StorageKind::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Untyped storage settings: `{ kind, namespace?, path? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            kind: StorageKind::Memory.to_string(),
            namespace: None,
            path: None,
        }
    }
}

/// Backend selection for a [`ResourceStore`](crate::ResourceStore).
#[derive(Clone)]
pub enum StorageConfig {
    /// Process-local map; nothing is persisted.
    Memory { namespace: Option<String> },
    /// redb database file at `path`.
    Durable { path: PathBuf, namespace: Option<String> },
    /// Caller-supplied provider.
    Custom(Arc<dyn StorageProvider<Resource>>),
}

impl StorageConfig {
    pub fn memory() -> Self {
        StorageConfig::Memory { namespace: None }
    }

    pub fn durable(path: impl Into<PathBuf>) -> Self {
        StorageConfig::Durable {
            path: path.into(),
            namespace: None,
        }
    }

    pub fn custom(provider: Arc<dyn StorageProvider<Resource>>) -> Self {
        StorageConfig::Custom(provider)
    }

    pub fn kind(&self) -> StorageKind {
        match self {
            StorageConfig::Memory { .. } => StorageKind::Memory,
            StorageConfig::Durable { .. } => StorageKind::Durable,
            StorageConfig::Custom(_) => StorageKind::Custom,
        }
    }

    /// Validates `settings` into a typed config.
    ///
    /// `custom_provider` is only consulted for `kind = "custom"`, where it is
    /// required.
    pub fn from_settings(
        settings: StorageSettings,
        custom_provider: Option<Arc<dyn StorageProvider<Resource>>>,
    ) -> Result<Self, ConfigError> {
        let StorageSettings { kind, namespace, path } = settings;
        match kind.parse::<StorageKind>()? {
            StorageKind::Memory => Ok(StorageConfig::Memory { namespace }),
            StorageKind::Durable => Ok(StorageConfig::Durable {
                path: path.unwrap_or_else(|| PathBuf::from(DEFAULT_DURABLE_PATH)),
                namespace,
            }),
            StorageKind::Custom => custom_provider
                .map(StorageConfig::Custom)
                .ok_or(ConfigError::MissingCustomProvider),
        }
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageConfig::Memory { namespace } => f
                .debug_struct("Memory")
                .field("namespace", namespace)
                .finish(),
            StorageConfig::Durable { path, namespace } => f
                .debug_struct("Durable")
                .field("path", path)
                .field("namespace", namespace)
                .finish(),
            StorageConfig::Custom(provider) => {
                f.debug_tuple("Custom").field(&provider.backend()).finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryProvider;

    fn settings(kind: &str) -> StorageSettings {
        StorageSettings {
            kind: kind.to_string(),
            ..StorageSettings::default()
        }
    }

    #[test]
    fn test_memory_and_durable_settings() {
        let config = StorageConfig::from_settings(settings("memory"), None).unwrap();
        assert_eq!(config.kind(), StorageKind::Memory);

        let config = StorageConfig::from_settings(settings("durable"), None).unwrap();
        match config {
            StorageConfig::Durable { path, namespace } => {
                assert_eq!(path, PathBuf::from(DEFAULT_DURABLE_PATH));
                assert_eq!(namespace, None);
            }
            other => panic!("unexpected config: {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_kind() {
        let err = StorageConfig::from_settings(settings("postgres"), None).unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedKind("postgres".into()));
    }

    #[test]
    fn test_custom_requires_provider() {
        let err = StorageConfig::from_settings(settings("custom"), None).unwrap_err();
        assert_eq!(err, ConfigError::MissingCustomProvider);

        let provider: Arc<dyn StorageProvider<Resource>> = Arc::new(MemoryProvider::<Resource>::new());
        let config = StorageConfig::from_settings(settings("custom"), Some(provider)).unwrap();
        assert_eq!(config.kind(), StorageKind::Custom);
    }

    #[test]
    fn test_settings_deserialize() {
        let parsed: StorageSettings =
            serde_json::from_str(r#"{"kind":"durable","namespace":"app","path":"/tmp/x.redb"}"#)
                .unwrap();
        assert_eq!(parsed.namespace.as_deref(), Some("app"));
        assert_eq!(parsed.path, Some(PathBuf::from("/tmp/x.redb")));
    }
}
