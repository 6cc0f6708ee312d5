//! # System Lifecycle & Orchestration
//!
//! Builds the application from its configuration, wires the store into the
//! handlers and tears everything down again.
//!
//! **Key Responsibilities:**
//! 1. **Store Creation** - One [`ResourceStore`](resource_store::ResourceStore)
//!    per process, built from [`StorageConfig`](resource_store::StorageConfig)
//! 2. **Dependency Injection** - The store is passed by reference to every
//!    handler and service; there is no global instance
//! 3. **Serving** - [`TodoSystem::serve`] runs the JSON-lines tool loop
//! 4. **Graceful Shutdown** - [`TodoSystem::shutdown`] closes the store
//! 5. **Observability Setup** - [`setup_tracing`]
//!
//! **Usage:**
//! ```bash
//! RUST_LOG=info cargo run -p todo-sample      # Compact logs
//! RUST_LOG=debug cargo run -p todo-sample     # Every store operation
//! ```

pub mod todo_system;
pub mod tracing;

pub use todo_system::*;
pub use self::tracing::*;
