//! Render model projected from controller state.
//!
//! The view is rebuilt from the model on every change and never read back.

use super::selection::SelectionMode;
use super::state::{InputFields, ListState};
use crate::model::item::{ItemId, TodoItem};

pub const SUBMIT_ADD_LABEL: &str = "Add";
pub const SUBMIT_EDIT_LABEL: &str = "Save edit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckboxView {
    pub checked: bool,
    pub enabled: bool,
}

impl CheckboxView {
    fn selectable(checked: bool) -> Self {
        Self {
            checked,
            enabled: true,
        }
    }

    /// Shown checked and greyed out.
    fn locked() -> Self {
        Self {
            checked: true,
            enabled: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: ItemId,
    pub date: String,
    pub text: String,
    pub checkbox: CheckboxView,
    /// Highlight for tap-selected completed rows.
    pub selected: bool,
    /// Edit/delete controls; hidden for completed rows.
    pub controls_visible: bool,
    pub editing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub todo: Vec<RowView>,
    pub done: Vec<RowView>,
    pub inputs: InputFields,
    pub submit_label: &'static str,
    pub editing: bool,
}

pub(crate) fn project(state: &ListState, mode: SelectionMode) -> ListView {
    let todo = state
        .document
        .todo
        .iter()
        .map(|item| {
            let selected = state.selection.contains(&item.id);
            row(item, CheckboxView::selectable(selected), false, true, state)
        })
        .collect();

    let done = state
        .document
        .done
        .iter()
        .map(|item| {
            let selected = state.selection.contains(&item.id);
            match mode {
                SelectionMode::Checkbox => {
                    row(item, CheckboxView::selectable(selected), false, false, state)
                }
                SelectionMode::TapToggle => {
                    row(item, CheckboxView::locked(), selected, false, state)
                }
            }
        })
        .collect();

    let editing = state.editing.is_some();
    ListView {
        todo,
        done,
        inputs: state.inputs.clone(),
        submit_label: if editing { SUBMIT_EDIT_LABEL } else { SUBMIT_ADD_LABEL },
        editing,
    }
}

fn row(
    item: &TodoItem,
    checkbox: CheckboxView,
    selected: bool,
    controls_visible: bool,
    state: &ListState,
) -> RowView {
    RowView {
        id: item.id.clone(),
        date: item.date.clone(),
        text: item.text.clone(),
        checkbox,
        selected,
        controls_visible,
        editing: state.editing.as_ref() == Some(&item.id),
    }
}
