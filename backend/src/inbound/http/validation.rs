//! Request field validation shared by the to-do handlers.

use crate::domain::{Error, TodoId, TodoPatch, TodoText};

/// Wire name of a request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const TEXT: FieldName = FieldName::new("text");

/// Parse a path segment as an item id, echoing the raw value on failure.
pub(crate) fn parse_todo_id(raw: &str) -> Result<TodoId, Error> {
    TodoId::new(raw).map_err(|_| Error::invalid_id(raw))
}

/// Require a non-blank text field.
pub(crate) fn required_text(value: Option<&str>, field: FieldName) -> Result<TodoText, Error> {
    value
        .and_then(|raw| TodoText::new(raw).ok())
        .ok_or_else(|| Error::missing_field(field.as_str()))
}

/// Build a patch; a present field must still be non-blank.
pub(crate) fn text_patch(value: Option<&str>, field: FieldName) -> Result<TodoPatch, Error> {
    TodoPatch::try_from_text(value).map_err(|_| Error::missing_field(field.as_str()))
}
