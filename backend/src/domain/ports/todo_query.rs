//! Driving port for to-do reads.

use async_trait::async_trait;

use crate::domain::{Error, Todo, TodoId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoQuery: Send + Sync {
    /// Items owned by `requester`, oldest first.
    async fn list(&self, requester: &UserId) -> Result<Vec<Todo>, Error>;

    /// A single item, provided `requester` owns it.
    async fn get(&self, requester: &UserId, id: &TodoId) -> Result<Todo, Error>;
}
