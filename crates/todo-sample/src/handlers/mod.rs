//! # Tool Handlers
//!
//! CRUD handlers exposed to a tool-calling protocol layer. Each handler takes
//! the [`ResourceStore`] it should use plus a typed input, and always answers
//! with a [`ToolResult`]: text content, flagged `isError` on failure.
//!
//! The store knows nothing about this wrapping. Translating store errors and
//! "not found" into error results happens here, in [`HandlerError`].
//!
//! ## Create / Update Policy
//!
//! The store treats create and update as upserts. The handlers keep the two
//! apart: `create_resource` fails if the resource exists and
//! `update_resource` fails if it does not.

pub mod input;

pub use input::*;

use resource_store::{ResourceStore, StorageError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::todo::{TodoAction, TodoError, TodoService};

/// One block of text content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// Uniform handler result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<TextContent>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextContent {
                kind: "text".into(),
                text: text.into(),
            }],
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::success(text)
        }
    }

    /// Pretty-printed JSON payload as a success result.
    pub fn json(value: &Value) -> Self {
        Self::success(format!("{value:#}"))
    }

    /// All text blocks, joined by newlines.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn from_result(result: Result<Value, HandlerError>) -> Self {
        match result {
            Ok(value) => Self::json(&value),
            Err(e) => Self::error(e.to_string()),
        }
    }
}

/// Everything a handler can fail with.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("Invalid arguments: {0}")]
    Arguments(#[from] serde_json::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Resource already exists: {0}")]
    AlreadyExists(String),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Todo(#[from] TodoError),
}

/// Name and description of one tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
}

/// Every tool [`dispatch`] understands.
pub fn tool_descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: "create_resource",
            description: "Create a resource from {type, id, properties?, links?, state?}",
        },
        ToolDescriptor {
            name: "get_resource",
            description: "Fetch a resource by {type, id}",
        },
        ToolDescriptor {
            name: "update_resource",
            description: "Merge properties, replace links or set state of an existing resource",
        },
        ToolDescriptor {
            name: "delete_resource",
            description: "Delete a resource by {type, id}",
        },
        ToolDescriptor {
            name: "list_resources",
            description: "List every resource of {type}",
        },
        ToolDescriptor {
            name: "create_todo",
            description: "Create a todo from {id, title}",
        },
        ToolDescriptor {
            name: "transition_todo",
            description: "Apply {action} (start, complete, cancel, reopen) to todo {id}",
        },
    ]
}

// --- Handlers ---

pub async fn create_resource(store: &ResourceStore, input: CreateInput) -> ToolResult {
    ToolResult::from_result(create(store, input).await)
}

pub async fn get_resource(store: &ResourceStore, input: ResourceRef) -> ToolResult {
    ToolResult::from_result(get(store, input).await)
}

pub async fn update_resource(store: &ResourceStore, input: UpdateInput) -> ToolResult {
    ToolResult::from_result(update(store, input).await)
}

pub async fn delete_resource(store: &ResourceStore, input: ResourceRef) -> ToolResult {
    ToolResult::from_result(delete(store, input).await)
}

pub async fn list_resources(store: &ResourceStore, input: ListInput) -> ToolResult {
    ToolResult::from_result(list(store, input).await)
}

async fn create(store: &ResourceStore, input: CreateInput) -> Result<Value, HandlerError> {
    input.validate()?;
    if store.get_resource(&input.kind, &input.id).await?.is_some() {
        return Err(HandlerError::AlreadyExists(resource_store::resource_key(
            &input.kind,
            &input.id,
        )));
    }
    let resource = input.into_resource();
    store.create_resource(&resource).await?;
    Ok(resource.to_record())
}

async fn get(store: &ResourceStore, input: ResourceRef) -> Result<Value, HandlerError> {
    input.validate()?;
    store
        .get_resource(&input.kind, &input.id)
        .await?
        .map(|resource| resource.to_record())
        .ok_or_else(|| HandlerError::NotFound(input.key()))
}

async fn update(store: &ResourceStore, input: UpdateInput) -> Result<Value, HandlerError> {
    input.validate()?;
    let mut resource = store
        .get_resource(&input.kind, &input.id)
        .await?
        .ok_or_else(|| {
            HandlerError::NotFound(resource_store::resource_key(&input.kind, &input.id))
        })?;
    input.apply_to(&mut resource);
    store.update_resource(&resource).await?;
    Ok(resource.to_record())
}

async fn delete(store: &ResourceStore, input: ResourceRef) -> Result<Value, HandlerError> {
    input.validate()?;
    if store.delete_resource(&input.kind, &input.id).await? {
        Ok(json!({ "deleted": input.key() }))
    } else {
        Err(HandlerError::NotFound(input.key()))
    }
}

async fn list(store: &ResourceStore, input: ListInput) -> Result<Value, HandlerError> {
    input.validate()?;
    let resources = store.list_resources(&input.kind).await?;
    Ok(Value::Array(resources.iter().map(|r| r.to_record()).collect()))
}

// --- Dispatch ---

#[derive(Debug, Deserialize)]
struct CreateTodoInput {
    id: String,
    title: String,
}

#[derive(Debug, Deserialize)]
struct TransitionInput {
    id: String,
    action: TodoAction,
}

/// Routes a named tool call with raw JSON arguments.
#[instrument(skip(store, arguments))]
pub async fn dispatch(store: &ResourceStore, tool: &str, arguments: Value) -> ToolResult {
    let result = route(store, tool, arguments).await;
    match &result {
        Ok(_) => info!(tool, "Tool call ok"),
        Err(e) => warn!(tool, error = %e, "Tool call failed"),
    }
    ToolResult::from_result(result)
}

async fn route(store: &ResourceStore, tool: &str, arguments: Value) -> Result<Value, HandlerError> {
    match tool {
        "create_resource" => create(store, serde_json::from_value(arguments)?).await,
        "get_resource" => get(store, serde_json::from_value(arguments)?).await,
        "update_resource" => update(store, serde_json::from_value(arguments)?).await,
        "delete_resource" => delete(store, serde_json::from_value(arguments)?).await,
        "list_resources" => list(store, serde_json::from_value(arguments)?).await,
        "create_todo" => {
            let input: CreateTodoInput = serde_json::from_value(arguments)?;
            let todo = TodoService::new(store).create(&input.id, &input.title).await?;
            Ok(todo.to_record())
        }
        "transition_todo" => {
            let input: TransitionInput = serde_json::from_value(arguments)?;
            let todo = TodoService::new(store).apply(&input.id, input.action).await?;
            Ok(todo.to_record())
        }
        other => Err(HandlerError::UnknownTool(other.to_string())),
    }
}
