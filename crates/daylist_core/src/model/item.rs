//! Todo item domain model.
//!
//! # Responsibility
//! - Define the single record shape shared by the pending and completed lists.
//! - Validate item fields before they reach a list or the data file.
//!
//! # Invariants
//! - `id` is stable for the item lifetime and never reused.
//! - `text` is never empty for a stored item.
//! - Completion state is not a field: it is list membership.

use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque item identifier.
///
/// New items get a UUID v4 string. Older data files used a millisecond
/// timestamp, sometimes written as a JSON number, so numbers are accepted on
/// read and kept in their decimal string form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps a caller-provided identifier, rejecting blank values.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ItemValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ItemValidationError::EmptyId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        let raw = match RawId::deserialize(deserializer)? {
            RawId::Text(value) => value,
            RawId::Number(value) => value.to_string(),
        };
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}

/// Validation failures for item fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyId,
    EmptyDate,
    EmptyText,
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "item id cannot be empty"),
            Self::EmptyDate => write!(f, "date cannot be empty"),
            Self::EmptyText => write!(f, "text cannot be empty"),
        }
    }
}

impl Error for ItemValidationError {}

/// One dated task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoItem {
    pub id: ItemId,
    /// Free-form calendar date, `YYYY-MM-DD` when entered through the UI.
    pub date: String,
    pub text: String,
}

impl TodoItem {
    /// Creates a new item with a generated id.
    ///
    /// Both fields are trimmed; an empty date or text is rejected.
    pub fn new(
        date: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self, ItemValidationError> {
        Self::with_id(ItemId::generate(), date, text)
    }

    /// Creates an item with a caller-provided id (import/load paths).
    pub fn with_id(
        id: ItemId,
        date: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self, ItemValidationError> {
        let item = Self {
            id,
            date: date.into().trim().to_string(),
            text: text.into().trim().to_string(),
        };
        item.validate()?;
        Ok(item)
    }

    /// Replaces date and text in place. Identity is unchanged.
    pub fn rewrite(
        &mut self,
        date: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<(), ItemValidationError> {
        let date = date.into().trim().to_string();
        let text = text.into().trim().to_string();
        check_fields(&date, &text)?;
        self.date = date;
        self.text = text;
        Ok(())
    }

    /// Checks stored-item invariants.
    ///
    /// Stored dates may be empty (hand-edited files); only text is required.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(ItemValidationError::EmptyId);
        }
        if self.text.trim().is_empty() {
            return Err(ItemValidationError::EmptyText);
        }
        Ok(())
    }
}

/// Validates user-entered fields for add/update.
pub fn check_fields(date: &str, text: &str) -> Result<(), ItemValidationError> {
    if date.trim().is_empty() {
        return Err(ItemValidationError::EmptyDate);
    }
    if text.trim().is_empty() {
        return Err(ItemValidationError::EmptyText);
    }
    Ok(())
}

impl<'de> Deserialize<'de> for TodoItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawItem {
            id: ItemId,
            #[serde(default)]
            date: String,
            text: String,
        }

        let raw = RawItem::deserialize(deserializer)?;
        let item = Self {
            id: raw.id,
            date: raw.date,
            text: raw.text,
        };
        item.validate().map_err(serde::de::Error::custom)?;
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::{ItemId, ItemValidationError, TodoItem};

    #[test]
    fn numeric_ids_from_legacy_files_become_strings() {
        let item: TodoItem =
            serde_json::from_str(r#"{"id": 1704067200000, "date": "2024-01-01", "text": "a"}"#)
                .unwrap();
        assert_eq!(item.id.as_str(), "1704067200000");
    }

    #[test]
    fn new_trims_and_rejects_blank_fields() {
        let item = TodoItem::new(" 2024-01-01 ", "  buy milk ").unwrap();
        assert_eq!(item.date, "2024-01-01");
        assert_eq!(item.text, "buy milk");

        assert_eq!(
            TodoItem::new("", "x").unwrap_err(),
            ItemValidationError::EmptyDate
        );
        assert_eq!(
            TodoItem::new("2024-01-01", "   ").unwrap_err(),
            ItemValidationError::EmptyText
        );
    }

    #[test]
    fn rewrite_keeps_identity_and_rejects_empty_text() {
        let mut item = TodoItem::new("2024-01-01", "draft").unwrap();
        let id = item.id.clone();

        item.rewrite("2024-02-02", "final").unwrap();
        assert_eq!(item.id, id);
        assert_eq!(item.text, "final");

        assert!(item.rewrite("2024-02-02", "").is_err());
        assert_eq!(item.text, "final");
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(ItemId::generate(), ItemId::generate());
        assert_eq!(ItemId::parse("  ").unwrap_err(), ItemValidationError::EmptyId);
    }
}
