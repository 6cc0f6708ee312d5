use resource_store::{ResourceStore, StorageConfig, StorageError};
use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::handlers::{dispatch, ToolResult};
use crate::todo::TodoService;

/// One line of input: `{"tool": "...", "arguments": {...}}`.
#[derive(Debug, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Runtime orchestrator for the todo sample.
///
/// `TodoSystem` owns the [`ResourceStore`] and hands it by reference to the
/// handlers and the [`TodoService`]; nothing else holds a store.
///
/// # Example
///
/// ```ignore
/// let system = TodoSystem::new(StorageConfig::memory());
///
/// let result = system.call("create_todo", json!({"id": "1", "title": "Write docs"})).await;
/// assert!(!result.is_error);
///
/// system.shutdown().await?;
/// ```
pub struct TodoSystem {
    store: ResourceStore,
}

impl TodoSystem {
    /// Builds the system. No storage I/O happens until the first call.
    pub fn new(config: StorageConfig) -> Self {
        info!(?config, "Creating todo system");
        Self {
            store: ResourceStore::new(config),
        }
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    pub fn todos(&self) -> TodoService<'_> {
        TodoService::new(&self.store)
    }

    pub async fn call(&self, tool: &str, arguments: Value) -> ToolResult {
        dispatch(&self.store, tool, arguments).await
    }

    /// Reads one [`ToolCall`] per line and writes one [`ToolResult`] per line.
    ///
    /// Blank lines are skipped. A line that is not a valid tool call gets an
    /// error result; the loop keeps going until `reader` is exhausted.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let result = match serde_json::from_str::<ToolCall>(line) {
                Ok(call) => self.call(&call.tool, call.arguments).await,
                Err(e) => ToolResult::error(format!("Invalid tool call: {e}")),
            };
            debug!(is_error = result.is_error, "Writing tool result");

            let mut out = serde_json::to_string(&result)?;
            out.push('\n');
            writer.write_all(out.as_bytes()).await?;
            writer.flush().await?;
        }
        Ok(())
    }

    /// Closes the store.
    pub async fn shutdown(self) -> Result<(), StorageError> {
        info!("Shutting down todo system...");
        self.store.close().await?;
        info!("Todo system shutdown complete.");
        Ok(())
    }
}
