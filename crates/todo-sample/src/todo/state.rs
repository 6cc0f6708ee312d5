//! Todo lifecycle states and the actions that move between them.
//!
//! ```text
//!            start            complete
//! pending ---------> in_progress ---------> completed
//!    |  \                 |                     |
//!    |   +--complete------|-------------------->|
//!    |                    |                     |
//!    +------cancel--------+-------> cancelled   |
//!                                       |       |
//!            pending <------reopen------+-------+
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::TodoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoState {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoAction {
    Start,
    Complete,
    Cancel,
    Reopen,
}

impl TodoState {
    pub fn as_str(self) -> &'static str {
        match self {
            TodoState::Pending => "pending",
            TodoState::InProgress => "in_progress",
            TodoState::Completed => "completed",
            TodoState::Cancelled => "cancelled",
        }
    }

    /// Actions allowed from this state.
    pub fn actions(self) -> &'static [TodoAction] {
        match self {
            TodoState::Pending => &[TodoAction::Start, TodoAction::Complete, TodoAction::Cancel],
            TodoState::InProgress => &[TodoAction::Complete, TodoAction::Cancel],
            TodoState::Completed | TodoState::Cancelled => &[TodoAction::Reopen],
        }
    }

    pub fn apply(self, action: TodoAction) -> Result<TodoState, TodoError> {
        if !self.actions().contains(&action) {
            return Err(TodoError::InvalidTransition { from: self, action });
        }
        Ok(match action {
            TodoAction::Start => TodoState::InProgress,
            TodoAction::Complete => TodoState::Completed,
            TodoAction::Cancel => TodoState::Cancelled,
            TodoAction::Reopen => TodoState::Pending,
        })
    }
}

impl fmt::Display for TodoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoState {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TodoState::Pending),
            "in_progress" => Ok(TodoState::InProgress),
            "completed" => Ok(TodoState::Completed),
            "cancelled" => Ok(TodoState::Cancelled),
            other => Err(TodoError::UnknownState(other.to_string())),
        }
    }
}

impl TodoAction {
    pub fn as_str(self) -> &'static str {
        match self {
            TodoAction::Start => "start",
            TodoAction::Complete => "complete",
            TodoAction::Cancel => "cancel",
            TodoAction::Reopen => "reopen",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            TodoAction::Start => "Start working on this todo",
            TodoAction::Complete => "Mark this todo as completed",
            TodoAction::Cancel => "Cancel this todo",
            TodoAction::Reopen => "Reopen this todo",
        }
    }
}

impl fmt::Display for TodoAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        let state = TodoState::Pending;
        let state = state.apply(TodoAction::Start).unwrap();
        assert_eq!(state, TodoState::InProgress);
        let state = state.apply(TodoAction::Complete).unwrap();
        assert_eq!(state, TodoState::Completed);
        let state = state.apply(TodoAction::Reopen).unwrap();
        assert_eq!(state, TodoState::Pending);
        assert_eq!(state.apply(TodoAction::Cancel).unwrap(), TodoState::Cancelled);
    }

    #[test]
    fn test_invalid_transition() {
        let err = TodoState::Completed.apply(TodoAction::Start).unwrap_err();
        assert!(matches!(
            err,
            TodoError::InvalidTransition { from: TodoState::Completed, action: TodoAction::Start }
        ));
        assert!(TodoState::InProgress.apply(TodoAction::Start).is_err());
    }

    #[test]
    fn test_state_names_round_trip() {
        for state in [
            TodoState::Pending,
            TodoState::InProgress,
            TodoState::Completed,
            TodoState::Cancelled,
        ] {
            assert_eq!(state.as_str().parse::<TodoState>().unwrap(), state);
        }
        assert!("archived".parse::<TodoState>().is_err());
    }
}
