/// Initializes the tracing/logging infrastructure for the application.
///
/// This sets up structured logging using the `tracing` crate with:
/// - **Environment-based filtering**: Controlled via `RUST_LOG` environment variable
/// - **Compact format**: spans shown inline, module targets hidden
/// - **stderr output**: stdout is reserved for tool results
///
/// # Environment Variables
///
/// Set `RUST_LOG` to control log verbosity:
/// - `RUST_LOG=info` - Show info, warn, and error messages
/// - `RUST_LOG=debug` - Show every store operation
/// - `RUST_LOG=resource_store=debug` - Debug only for the storage layer
///
/// # Example
///
/// ```ignore
/// setup_tracing();
/// tracing::info!("Application started");
/// ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact() // spans inline, e.g. "dispatch:create: Todo created"
        .with_writer(std::io::stderr)
        .init();
}
