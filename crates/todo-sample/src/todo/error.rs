//! Error types for the todo application.

use resource_store::StorageError;
use thiserror::Error;

use super::state::{TodoAction, TodoState};

/// Errors that can occur during todo operations.
#[derive(Debug, Error)]
pub enum TodoError {
    /// The requested todo was not found.
    #[error("Todo not found: {0}")]
    NotFound(String),

    /// A todo with the same id already exists.
    #[error("Todo already exists: {0}")]
    AlreadyExists(String),

    /// The todo data provided is invalid.
    #[error("Todo validation error: {0}")]
    ValidationError(String),

    /// The action is not allowed from the todo's current state.
    #[error("Cannot {action} a todo that is {from}")]
    InvalidTransition { from: TodoState, action: TodoAction },

    /// A stored todo has no state label at all.
    #[error("Todo has no state: {0}")]
    MissingState(String),

    /// A stored todo carries a state label this application does not know.
    #[error("Unknown todo state: {0}")]
    UnknownState(String),

    /// An underlying storage error occurred.
    #[error("Todo storage error: {0}")]
    Storage(#[from] StorageError),
}
