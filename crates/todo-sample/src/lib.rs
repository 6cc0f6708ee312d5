//! # Todo Sample
//!
//! A hypermedia todo application on top of [`resource_store`], driven by
//! tool calls.
//!
//! ## Modules
//!
//! - **[handlers]**: CRUD tool handlers with a uniform [`ToolResult`](handlers::ToolResult),
//!   input validation and [`dispatch`](handlers::dispatch) by tool name.
//! - **[todo]**: Todo resources, their state machine and link generation.
//! - **[lifecycle]**: [`TodoSystem`](lifecycle::TodoSystem) wiring, the stdin tool loop
//!   and tracing setup.
//! - **[config]**: Command-line and environment configuration.

pub mod config;
pub mod handlers;
pub mod lifecycle;
pub mod todo;
