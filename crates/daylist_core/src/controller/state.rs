//! Controller-owned state.
//!
//! # Invariants
//! - `editing`, when set, names an item in `document.todo`.
//! - `selection` only names items present in `document`.

use super::selection::Selection;
use crate::model::document::TodoDocument;
use crate::model::item::ItemId;

/// Today's local date as `YYYY-MM-DD`, the default for the date field.
pub fn today() -> String {
    chrono::Local::now()
        .date_naive()
        .format("%Y-%m-%d")
        .to_string()
}

/// Contents of the date/text input fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFields {
    pub date: String,
    pub text: String,
}

impl InputFields {
    pub fn fresh() -> Self {
        Self {
            date: today(),
            text: String::new(),
        }
    }

    /// Empties the text field and resets the date to today.
    pub fn reset(&mut self) {
        *self = Self::fresh();
    }
}

impl Default for InputFields {
    fn default() -> Self {
        Self::fresh()
    }
}

/// Everything the list controller mutates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    pub document: TodoDocument,
    pub inputs: InputFields,
    pub editing: Option<ItemId>,
    pub selection: Selection,
}

impl ListState {
    pub fn with_document(document: TodoDocument) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    /// Drops selection and edit references to items that no longer qualify.
    pub(crate) fn prune(&mut self) {
        let document = &self.document;
        self.selection.retain(|id| document.contains(id));
        if let Some(id) = &self.editing {
            if !document.todo.iter().any(|item| &item.id == id) {
                self.editing = None;
            }
        }
    }
}
