//! Port for persisting to-do items.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Todo, TodoId, TodoText, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by to-do repository adapters.
    pub enum TodoPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "todo repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "todo repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Items owned by `owner`, oldest first.
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Todo>, TodoPersistenceError>;

    /// Fetch an item regardless of owner.
    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, TodoPersistenceError>;

    /// Persist a new item.
    async fn insert(&self, todo: &Todo) -> Result<(), TodoPersistenceError>;

    /// Replace the text of the item matching both `id` and `owner`.
    ///
    /// Returns the updated item, or `None` when nothing matched.
    async fn update_text(
        &self,
        id: &TodoId,
        owner: &UserId,
        text: &TodoText,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Todo>, TodoPersistenceError>;

    /// Delete the item matching both `id` and `owner` in one operation.
    ///
    /// Returns whether a row was removed.
    async fn delete_owned(&self, id: &TodoId, owner: &UserId)
    -> Result<bool, TodoPersistenceError>;
}
