//! Driving port for to-do mutations.

use async_trait::async_trait;

use crate::domain::{Error, Todo, TodoId, TodoPatch, TodoText, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoCommand: Send + Sync {
    /// Create an item owned by `owner`.
    async fn create(&self, owner: &UserId, text: TodoText) -> Result<Todo, Error>;

    /// Apply `patch` to an item owned by `requester`.
    async fn update(&self, requester: &UserId, id: &TodoId, patch: TodoPatch)
    -> Result<Todo, Error>;

    /// Delete an item owned by `requester`.
    async fn delete(&self, requester: &UserId, id: &TodoId) -> Result<(), Error>;
}
