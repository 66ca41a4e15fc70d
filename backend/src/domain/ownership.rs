//! Per-item ownership checks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Error, Todo, UserId};

/// How a mutation on somebody else's item is reported.
///
/// Reads always answer "not found" for foreign items so their existence is
/// never revealed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnershipPolicy {
    /// Foreign items look absent.
    #[default]
    Conceal,
    /// Foreign items are reported as forbidden.
    Explicit,
}

impl FromStr for OwnershipPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conceal" => Ok(Self::Conceal),
            "explicit" => Ok(Self::Explicit),
            other => Err(format!(
                "unknown ownership policy `{other}` (expected `conceal` or `explicit`)"
            )),
        }
    }
}

impl fmt::Display for OwnershipPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Conceal => "conceal",
            Self::Explicit => "explicit",
        })
    }
}

/// Applies an [`OwnershipPolicy`] to items fetched for a requester.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use todo_backend::domain::{
///     ErrorCode, OwnershipGuard, OwnershipPolicy, Todo, TodoId, TodoText, UserId,
/// };
///
/// let owner = UserId::random();
/// let item = Todo::new(TodoId::random(), TodoText::new("x").unwrap(), owner, Utc::now());
/// let guard = OwnershipGuard::new(OwnershipPolicy::Explicit);
/// let err = guard.authorize_mutation(item, &UserId::random()).unwrap_err();
/// assert_eq!(err.code(), ErrorCode::Forbidden);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnershipGuard {
    policy: OwnershipPolicy,
}

impl OwnershipGuard {
    pub fn new(policy: OwnershipPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> OwnershipPolicy {
        self.policy
    }

    /// Release `item` to its owner; everyone else gets "not found".
    pub fn authorize_read(&self, item: Todo, requester: &UserId) -> Result<Todo, Error> {
        if item.is_owned_by(requester) {
            Ok(item)
        } else {
            Err(not_found())
        }
    }

    /// Release `item` for modification by its owner.
    pub fn authorize_mutation(&self, item: Todo, requester: &UserId) -> Result<Todo, Error> {
        if item.is_owned_by(requester) {
            return Ok(item);
        }
        Err(self.foreign_item())
    }

    /// Error reported when a requester targets an item they do not own.
    pub fn foreign_item(&self) -> Error {
        match self.policy {
            OwnershipPolicy::Conceal => not_found(),
            OwnershipPolicy::Explicit => Error::forbidden("Not authorised to modify this todo"),
        }
    }
}

/// Error for an item that does not exist for the requester.
pub fn not_found() -> Error {
    Error::not_found("Todo not found")
}
