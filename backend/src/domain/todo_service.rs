//! To-do use-cases scoped to the requesting user.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ownership::not_found;
use crate::domain::ports::{TodoCommand, TodoPersistenceError, TodoQuery, TodoRepository};
use crate::domain::{
    Error, OwnershipGuard, OwnershipPolicy, Todo, TodoId, TodoPatch, TodoText, UserId,
};

/// To-do service implementing the command and query driving ports.
#[derive(Clone)]
pub struct TodoService<R> {
    todos: Arc<R>,
    guard: OwnershipGuard,
    clock: Arc<dyn Clock>,
}

impl<R> TodoService<R> {
    pub fn new(todos: Arc<R>, guard: OwnershipGuard, clock: Arc<dyn Clock>) -> Self {
        Self {
            todos,
            guard,
            clock,
        }
    }
}

fn map_todo_error(error: TodoPersistenceError) -> Error {
    match error {
        TodoPersistenceError::Connection { message } => {
            Error::internal(format!("todo repository unavailable: {message}"))
        }
        TodoPersistenceError::Query { message } => {
            Error::internal(format!("todo repository error: {message}"))
        }
    }
}

impl<R: TodoRepository> TodoService<R> {
    async fn load(&self, id: &TodoId) -> Result<Todo, Error> {
        self.todos
            .find_by_id(id)
            .await
            .map_err(map_todo_error)?
            .ok_or_else(not_found)
    }
}

#[async_trait]
impl<R: TodoRepository> TodoQuery for TodoService<R> {
    async fn list(&self, requester: &UserId) -> Result<Vec<Todo>, Error> {
        self.todos
            .list_for_owner(requester)
            .await
            .map_err(map_todo_error)
    }

    async fn get(&self, requester: &UserId, id: &TodoId) -> Result<Todo, Error> {
        let item = self.load(id).await?;
        self.guard.authorize_read(item, requester)
    }
}

#[async_trait]
impl<R: TodoRepository> TodoCommand for TodoService<R> {
    async fn create(&self, owner: &UserId, text: TodoText) -> Result<Todo, Error> {
        let item = Todo::new(TodoId::random(), text, *owner, self.clock.utc());
        self.todos.insert(&item).await.map_err(map_todo_error)?;
        debug!(todo_id = %item.id(), user_id = %owner, "created todo");
        Ok(item)
    }

    async fn update(
        &self,
        requester: &UserId,
        id: &TodoId,
        patch: TodoPatch,
    ) -> Result<Todo, Error> {
        let item = self.load(id).await?;
        let item = self.guard.authorize_mutation(item, requester)?;
        let Some(text) = patch.text else {
            return Ok(item);
        };
        // A concurrent delete surfaces here as not found.
        self.todos
            .update_text(id, requester, &text, self.clock.utc())
            .await
            .map_err(map_todo_error)?
            .ok_or_else(not_found)
    }

    async fn delete(&self, requester: &UserId, id: &TodoId) -> Result<(), Error> {
        let removed = self
            .todos
            .delete_owned(id, requester)
            .await
            .map_err(map_todo_error)?;
        if removed {
            debug!(todo_id = %id, user_id = %requester, "deleted todo");
            return Ok(());
        }
        // Nothing matched (id, owner).
        match self.guard.policy() {
            OwnershipPolicy::Conceal => Err(not_found()),
            OwnershipPolicy::Explicit => {
                self.load(id).await?;
                Err(self.guard.foreign_item())
            }
        }
    }
}
