//! Whole-list document persisted to disk.
//!
//! # Responsibility
//! - Hold the pending (`todo`) and completed (`done`) partitions.
//! - Own the JSON wire shape and its validation.
//!
//! # Invariants
//! - An id appears at most once across `todo` and `done` combined.
//! - Both list fields are required on read; a file missing either is invalid.

use super::item::{ItemId, ItemValidationError, TodoItem};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const TODO_FIELD: &str = "todo";
pub const DONE_FIELD: &str = "done";

/// Which list an item lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Todo,
    Done,
}

impl ListKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => TODO_FIELD,
            Self::Done => DONE_FIELD,
        }
    }
}

/// Document parse and validation errors.
#[derive(Debug)]
pub enum DocumentError {
    /// Input is not valid JSON, or an item is malformed.
    Malformed(String),
    /// Top-level value is not an object.
    NotAnObject,
    /// A required list field is absent.
    MissingField(&'static str),
    /// A list field is present but not an array.
    NotAList(&'static str),
    /// Two items share one id.
    DuplicateId(ItemId),
    Item(ItemValidationError),
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(message) => write!(f, "malformed document: {message}"),
            Self::NotAnObject => write!(f, "document must be a JSON object"),
            Self::MissingField(field) => write!(f, "document is missing the `{field}` list"),
            Self::NotAList(field) => write!(f, "document field `{field}` must be a list"),
            Self::DuplicateId(id) => write!(f, "duplicate item id: {id}"),
            Self::Item(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DocumentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Item(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ItemValidationError> for DocumentError {
    fn from(value: ItemValidationError) -> Self {
        Self::Item(value)
    }
}

/// Both task lists, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoDocument {
    pub todo: Vec<TodoItem>,
    pub done: Vec<TodoItem>,
}

impl TodoDocument {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.todo.is_empty() && self.done.is_empty()
    }

    pub fn len(&self) -> usize {
        self.todo.len() + self.done.len()
    }

    pub fn list(&self, kind: ListKind) -> &[TodoItem] {
        match kind {
            ListKind::Todo => &self.todo,
            ListKind::Done => &self.done,
        }
    }

    pub fn list_mut(&mut self, kind: ListKind) -> &mut Vec<TodoItem> {
        match kind {
            ListKind::Todo => &mut self.todo,
            ListKind::Done => &mut self.done,
        }
    }

    /// Returns the list and index holding `id`.
    pub fn locate(&self, id: &ItemId) -> Option<(ListKind, usize)> {
        [ListKind::Todo, ListKind::Done]
            .into_iter()
            .find_map(|kind| {
                self.list(kind)
                    .iter()
                    .position(|item| &item.id == id)
                    .map(|index| (kind, index))
            })
    }

    pub fn get(&self, id: &ItemId) -> Option<&TodoItem> {
        self.locate(id).map(|(kind, index)| &self.list(kind)[index])
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.locate(id).is_some()
    }

    /// Removes and returns the item with `id` from whichever list holds it.
    pub fn remove(&mut self, id: &ItemId) -> Option<(ListKind, TodoItem)> {
        let (kind, index) = self.locate(id)?;
        Some((kind, self.list_mut(kind).remove(index)))
    }

    /// Checks item invariants and id uniqueness across both lists.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut seen = HashSet::with_capacity(self.len());
        for item in self.todo.iter().chain(self.done.iter()) {
            item.validate()?;
            if !seen.insert(&item.id) {
                return Err(DocumentError::DuplicateId(item.id.clone()));
            }
        }
        Ok(())
    }

    /// Parses and validates a document from JSON text.
    ///
    /// Field presence is checked before item decoding so a missing list is
    /// reported as such rather than as a generic decode error.
    pub fn from_json_str(raw: &str) -> Result<Self, DocumentError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|err| DocumentError::Malformed(err.to_string()))?;
        let object = value.as_object().ok_or(DocumentError::NotAnObject)?;
        for field in [TODO_FIELD, DONE_FIELD] {
            match object.get(field) {
                None | Some(Value::Null) => return Err(DocumentError::MissingField(field)),
                Some(Value::Array(_)) => {}
                Some(_) => return Err(DocumentError::NotAList(field)),
            }
        }

        let document: Self = serde_json::from_value(value)
            .map_err(|err| DocumentError::Malformed(err.to_string()))?;
        document.validate()?;
        Ok(document)
    }

    /// Serializes as 2-space indented JSON.
    pub fn to_pretty_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(|err| DocumentError::Malformed(err.to_string()))
    }
}
