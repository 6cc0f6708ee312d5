//! Todo application built on [`Resource`]s.
//!
//! A todo is a resource of type [`TODO_KIND`] with a `title` property and a
//! [`TodoState`] label. Its links always describe what a client can do next:
//! `self`, `update`, `delete`, `collection`, plus one link per action that
//! is valid from the current state.

pub mod error;
pub mod state;

pub use error::*;
pub use state::*;

use resource_store::{Link, Resource, ResourceStore};
use tracing::{debug, info, instrument};

pub const TODO_KIND: &str = "todo";

/// Builds a fresh pending todo.
pub fn new_todo(id: &str, title: &str) -> Resource {
    let mut todo = Resource::new(TODO_KIND, id).with_state(TodoState::Pending.as_str());
    todo.set_property("title", title);
    refresh_links(&mut todo, TodoState::Pending);
    todo
}

/// Replaces the todo's links with the controls valid in `state`.
pub fn refresh_links(todo: &mut Resource, state: TodoState) {
    let href = format!("/todos/{}", todo.id());
    todo.clear_links();
    todo.add_link("self", Link::new(&href));
    todo.add_link("update", Link::new(&href).with_method("PUT"));
    todo.add_link("delete", Link::new(&href).with_method("DELETE"));
    todo.add_link("collection", Link::new("/todos"));
    for action in state.actions() {
        todo.add_link(
            action.as_str(),
            Link::new(format!("{href}/{action}"))
                .with_method("POST")
                .with_title(action.title()),
        );
    }
}

/// The todo's current state, read from its state label.
pub fn todo_state(todo: &Resource) -> Result<TodoState, TodoError> {
    todo.state()
        .ok_or_else(|| TodoError::MissingState(todo.id().to_string()))?
        .parse()
}

/// Todo operations over a borrowed [`ResourceStore`].
pub struct TodoService<'a> {
    store: &'a ResourceStore,
}

impl<'a> TodoService<'a> {
    pub fn new(store: &'a ResourceStore) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn create(&self, id: &str, title: &str) -> Result<Resource, TodoError> {
        if id.trim().is_empty() {
            return Err(TodoError::ValidationError("id must not be empty".into()));
        }
        if title.trim().is_empty() {
            return Err(TodoError::ValidationError("title must not be empty".into()));
        }
        if self.store.get_resource(TODO_KIND, id).await?.is_some() {
            return Err(TodoError::AlreadyExists(id.to_string()));
        }

        let todo = new_todo(id, title);
        self.store.create_resource(&todo).await?;
        info!(id, "Todo created");
        Ok(todo)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Resource>, TodoError> {
        Ok(self.store.get_resource(TODO_KIND, id).await?)
    }

    /// Applies `action`, regenerates the links and persists the todo.
    #[instrument(skip(self))]
    pub async fn apply(&self, id: &str, action: TodoAction) -> Result<Resource, TodoError> {
        let mut todo = self
            .get(id)
            .await?
            .ok_or_else(|| TodoError::NotFound(id.to_string()))?;

        let from = todo_state(&todo)?;
        let to = from.apply(action)?;
        todo.set_state(to.as_str());
        refresh_links(&mut todo, to);
        self.store.update_resource(&todo).await?;

        info!(id, %from, %to, "Todo transitioned");
        Ok(todo)
    }

    pub async fn list(&self) -> Result<Vec<Resource>, TodoError> {
        let todos = self.store.list_resources(TODO_KIND).await?;
        debug!(count = todos.len(), "Listed todos");
        Ok(todos)
    }

    /// Todos currently in `state`.
    pub async fn list_in(&self, state: TodoState) -> Result<Vec<Resource>, TodoError> {
        let todos = self.list().await?;
        Ok(todos
            .into_iter()
            .filter(|todo| todo.state() == Some(state.as_str()))
            .collect())
    }

    pub async fn delete(&self, id: &str) -> Result<bool, TodoError> {
        Ok(self.store.delete_resource(TODO_KIND, id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_todo_links() {
        let todo = new_todo("1", "Write docs");
        assert_eq!(todo.kind(), TODO_KIND);
        assert_eq!(todo.state(), Some("pending"));
        assert_eq!(todo.link("self").unwrap().href, "/todos/1");
        assert_eq!(todo.link("start").unwrap().href, "/todos/1/start");
        assert_eq!(todo.link("start").unwrap().method_or_default(), "POST");
        assert!(todo.link("reopen").is_none());
    }

    #[test]
    fn test_refresh_links_follows_state() {
        let mut todo = new_todo("1", "Write docs");
        refresh_links(&mut todo, TodoState::Completed);
        assert!(todo.link("start").is_none());
        assert!(todo.link("complete").is_none());
        assert!(todo.link("reopen").is_some());
        assert_eq!(todo.links().len(), 5);
    }

    #[test]
    fn test_todo_state_requires_label() {
        let mut todo = Resource::new(TODO_KIND, "1");
        let err = todo_state(&todo).unwrap_err();
        assert!(matches!(err, TodoError::MissingState(ref id) if id == "1"));
        assert_eq!(err.to_string(), "Todo has no state: 1");
        todo.set_state("archived");
        assert!(matches!(todo_state(&todo), Err(TodoError::UnknownState(_))));
        todo.set_state("in_progress");
        assert_eq!(todo_state(&todo).unwrap(), TodoState::InProgress);
    }
}
