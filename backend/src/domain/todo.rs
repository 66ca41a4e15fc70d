//! To-do items owned by a single user.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::UserId;

/// Validation errors raised when building to-do value types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    /// The identifier was not a UUID.
    InvalidId,
    /// The text was blank once trimmed.
    EmptyText,
}

impl fmt::Display for TodoValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "todo id must be a valid UUID"),
            Self::EmptyText => write!(f, "text must not be empty"),
        }
    }
}

impl std::error::Error for TodoValidationError {}

/// Stable to-do identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TodoId(Uuid);

impl TodoId {
    /// Parse an identifier from its textual form.
    ///
    /// # Examples
    /// ```
    /// use todo_backend::domain::TodoId;
    ///
    /// assert!(TodoId::new("6b0d7f2e-8f0e-4c5e-9d59-0a4c0b6d1e55").is_ok());
    /// assert!(TodoId::new("507f1f77bcf86cd799439011").is_err());
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, TodoValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| TodoValidationError::InvalidId)
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for TodoId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Non-empty item text, stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoText(String);

impl TodoText {
    pub fn new(value: impl AsRef<str>) -> Result<Self, TodoValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TodoValidationError::EmptyText);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for TodoText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A to-do item.
///
/// ## Invariants
/// - `owner` is fixed at creation and never changes.
/// - `updated_at` is never earlier than `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    id: TodoId,
    text: TodoText,
    owner: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Todo {
    /// Create a brand new item owned by `owner`.
    pub fn new(id: TodoId, text: TodoText, owner: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text,
            owner,
            created_at,
            updated_at: created_at,
        }
    }

    /// Rebuild an item read back from a store.
    pub fn from_parts(
        id: TodoId,
        text: TodoText,
        owner: UserId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            text,
            owner,
            created_at,
            updated_at: updated_at.max(created_at),
        }
    }

    pub fn id(&self) -> &TodoId {
        &self.id
    }

    pub fn text(&self) -> &TodoText {
        &self.text
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether `user` owns this item.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner == user
    }

    /// Apply `patch`, moving `updated_at` forward when anything changed.
    #[must_use]
    pub fn apply(mut self, patch: TodoPatch, at: DateTime<Utc>) -> Self {
        if let Some(text) = patch.text {
            self.text = text;
            self.updated_at = at.max(self.created_at);
        }
        self
    }
}

/// Partial update for an item. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub text: Option<TodoText>,
}

impl TodoPatch {
    /// Build a patch from optional raw text.
    ///
    /// Present text must be non-empty once trimmed.
    pub fn try_from_text(text: Option<&str>) -> Result<Self, TodoValidationError> {
        let text = text.map(TodoText::new).transpose()?;
        Ok(Self { text })
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none()
    }
}
