//! `UserRepository` over a mutex-guarded map keyed by email.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, User};

use super::poisoned;

/// Users held in memory. Email uniqueness is checked under the same lock
/// as the insert.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    by_email: Mutex<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self
            .by_email
            .lock()
            .map_err(|_| UserPersistenceError::query(poisoned()))?;
        match users.entry(user.email().as_ref().to_owned()) {
            Entry::Occupied(taken) => Err(UserPersistenceError::duplicate_email(taken.key())),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(())
            }
        }
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let users = self
            .by_email
            .lock()
            .map_err(|_| UserPersistenceError::query(poisoned()))?;
        Ok(users.get(email.as_ref()).cloned())
    }
}
