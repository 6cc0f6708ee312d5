//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::Parser;
use resource_store::{ConfigError, StorageConfig, StorageSettings};

#[derive(Debug, Clone, Parser)]
#[command(name = "todo-sample")]
#[command(version, about = "Hypermedia todo store driven by JSON tool calls on stdin")]
pub struct Cli {
    /// Storage backend: memory or durable
    #[arg(long, env = "RESOURCE_STORAGE", default_value = "memory")]
    pub storage: String,

    /// Database file for the durable backend
    #[arg(long, env = "RESOURCE_STORE_PATH")]
    pub path: Option<PathBuf>,

    /// Namespace prefix for every stored key
    #[arg(long, env = "RESOURCE_NAMESPACE")]
    pub namespace: Option<String>,

    /// Print the available tools as JSON and exit
    #[arg(long)]
    pub list_tools: bool,
}

impl Cli {
    pub fn storage_settings(&self) -> StorageSettings {
        StorageSettings {
            kind: self.storage.clone(),
            namespace: self.namespace.clone(),
            path: self.path.clone(),
        }
    }

    /// The validated storage config. The CLI cannot supply a custom provider,
    /// so `--storage custom` is rejected here.
    pub fn storage_config(&self) -> Result<StorageConfig, ConfigError> {
        StorageConfig::from_settings(self.storage_settings(), None)
    }
}
