//! Reads one JSON tool call per stdin line and answers with one JSON
//! `ToolResult` per stdout line:
//!
//! ```text
//! {"tool": "create_todo", "arguments": {"id": "1", "title": "Write docs"}}
//! {"tool": "transition_todo", "arguments": {"id": "1", "action": "start"}}
//! ```
//!
//! Logs go to stderr. Ctrl-C stops the loop; the store is closed either way.

use clap::Parser;
use todo_sample::config::Cli;
use todo_sample::handlers::tool_descriptors;
use todo_sample::lifecycle::{setup_tracing, TodoSystem};
use tokio::io::BufReader;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();
    let cli = Cli::parse();

    if cli.list_tools {
        println!("{}", serde_json::to_string_pretty(&tool_descriptors())?);
        return Ok(());
    }

    let config = cli.storage_config()?;
    let system = TodoSystem::new(config);
    info!("Reading tool calls from stdin");

    let served = tokio::select! {
        result = system.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout()) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
            Ok(())
        }
    };
    if let Err(e) = &served {
        error!(error = %e, "Tool loop failed");
    }

    system.shutdown().await?;
    served?;
    Ok(())
}
