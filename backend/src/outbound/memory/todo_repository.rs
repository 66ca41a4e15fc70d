//! `TodoRepository` over a mutex-guarded vector kept in insertion order.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{TodoPersistenceError, TodoRepository};
use crate::domain::{Todo, TodoId, TodoPatch, TodoText, UserId};

use super::poisoned;

/// Items held in memory, oldest first.
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    items: Mutex<Vec<Todo>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Todo>>, TodoPersistenceError> {
        self.items
            .lock()
            .map_err(|_| TodoPersistenceError::query(poisoned()))
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Todo>, TodoPersistenceError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|item| item.is_owned_by(owner))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, TodoPersistenceError> {
        Ok(self.lock()?.iter().find(|item| item.id() == id).cloned())
    }

    async fn insert(&self, todo: &Todo) -> Result<(), TodoPersistenceError> {
        let mut items = self.lock()?;
        if items.iter().any(|item| item.id() == todo.id()) {
            return Err(TodoPersistenceError::query("duplicate todo id"));
        }
        items.push(todo.clone());
        Ok(())
    }

    async fn update_text(
        &self,
        id: &TodoId,
        owner: &UserId,
        text: &TodoText,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Todo>, TodoPersistenceError> {
        let mut items = self.lock()?;
        let Some(slot) = items
            .iter_mut()
            .find(|item| item.id() == id && item.is_owned_by(owner))
        else {
            return Ok(None);
        };
        let patch = TodoPatch {
            text: Some(text.clone()),
        };
        *slot = slot.clone().apply(patch, updated_at);
        Ok(Some(slot.clone()))
    }

    async fn delete_owned(
        &self,
        id: &TodoId,
        owner: &UserId,
    ) -> Result<bool, TodoPersistenceError> {
        let mut items = self.lock()?;
        let before = items.len();
        items.retain(|item| !(item.id() == id && item.is_owned_by(owner)));
        Ok(items.len() < before)
    }
}
