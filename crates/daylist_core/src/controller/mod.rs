//! List controller: the display-side owner of the two task lists.
//!
//! # Responsibility
//! - Apply user actions (add, edit, delete, complete, restore) to the model.
//! - Request a full save after every mutation (write-through).
//! - Project the model into a render model.
//!
//! # Invariants
//! - Ids stay unique across `todo` and `done`.
//! - At most one item is under edit, and it is always a pending item.
//! - A refused action leaves state untouched and issues no save.
//! - Pending order is insertion order; completed and restored items are
//!   appended to the end of their new list.

pub mod prompt;
pub mod selection;
pub mod state;
pub mod view;

use crate::model::document::{ListKind, TodoDocument};
use crate::model::item::{check_fields, ItemId, ItemValidationError, TodoItem};
use crate::store::boundary::{ExportResult, ImportResult, PersistenceBoundary, SaveResult};
use log::{debug, info, warn};
use prompt::{Confirm, DELETE_PROMPT};
use selection::SelectionMode;
use state::ListState;
use std::error::Error;
use std::fmt::{Display, Formatter};
use view::ListView;

/// Why the controller refused an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    Validation(ItemValidationError),
    NotFound(ItemId),
    /// Completed items cannot be edited.
    NotEditable(ItemId),
    /// Another item is already under edit.
    EditInProgress { editing: ItemId },
    /// The item's list does not accept this selection gesture in this mode.
    SelectionUnsupported { id: ItemId, mode: SelectionMode },
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::NotEditable(id) => write!(f, "completed item cannot be edited: {id}"),
            Self::EditInProgress { editing } => {
                write!(f, "finish or cancel the edit of {editing} first")
            }
            Self::SelectionUnsupported { id, mode } => {
                write!(f, "item {id} cannot be selected that way in {mode} mode")
            }
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ItemValidationError> for ControllerError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type ControllerResult<T> = Result<T, ControllerError>;

/// Result of an accepted action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// State changed and a save was issued.
    Applied(SaveResult),
    /// Nothing to do (declined prompt, empty selection); no save was issued.
    Unchanged,
}

impl ActionOutcome {
    pub fn save_result(&self) -> Option<&SaveResult> {
        match self {
            Self::Applied(result) => Some(result),
            Self::Unchanged => None,
        }
    }
}

/// Owns list state and mediates between user actions and storage.
pub struct ListController<S, C> {
    store: S,
    confirm: C,
    mode: SelectionMode,
    state: ListState,
}

impl<S: PersistenceBoundary, C: Confirm> ListController<S, C> {
    /// Creates a controller over an already loaded document.
    pub fn new(store: S, confirm: C, mode: SelectionMode, document: TodoDocument) -> Self {
        Self {
            store,
            confirm,
            mode,
            state: ListState::with_document(document),
        }
    }

    /// Loads the persisted document once and builds the controller.
    pub fn start(store: S, confirm: C, mode: SelectionMode) -> Self {
        let document = store.load();
        info!(
            "event=controller_start module=controller status=ok mode={} todo={} done={}",
            mode,
            document.todo.len(),
            document.done.len()
        );
        Self::new(store, confirm, mode, document)
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn document(&self) -> &TodoDocument {
        &self.state.document
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn confirm(&self) -> &C {
        &self.confirm
    }

    pub fn render(&self) -> ListView {
        view::project(&self.state, self.mode)
    }

    /// Updates the text field as the user types.
    pub fn set_text_input(&mut self, text: impl Into<String>) {
        self.state.inputs.text = text.into();
    }

    /// Updates the date field.
    pub fn set_date_input(&mut self, date: impl Into<String>) {
        self.state.inputs.date = date.into();
    }

    /// Submits the current input fields.
    pub fn submit(&mut self) -> ControllerResult<ActionOutcome> {
        let date = self.state.inputs.date.clone();
        let text = self.state.inputs.text.clone();
        self.add_or_update(&date, &text)
    }

    /// Saves the item under edit, or appends a new pending item.
    pub fn add_or_update(&mut self, date: &str, text: &str) -> ControllerResult<ActionOutcome> {
        check_fields(date, text)?;

        match self.state.editing.clone() {
            Some(id) => {
                let item = self
                    .state
                    .document
                    .todo
                    .iter_mut()
                    .find(|item| item.id == id)
                    .ok_or_else(|| ControllerError::NotFound(id.clone()))?;
                item.rewrite(date, text)?;
                self.state.editing = None;
                debug!("event=item_update module=controller status=ok id={id}");
            }
            None => {
                let item = TodoItem::new(date, text)?;
                debug!("event=item_add module=controller status=ok id={}", item.id);
                self.state.document.todo.push(item);
            }
        }

        self.state.inputs.reset();
        Ok(self.persist())
    }

    /// Puts a pending item under edit and pre-fills the input fields.
    pub fn begin_edit(&mut self, id: &ItemId) -> ControllerResult<()> {
        if let Some(editing) = &self.state.editing {
            if editing == id {
                return Ok(());
            }
            return Err(ControllerError::EditInProgress {
                editing: editing.clone(),
            });
        }

        let item = match self.state.document.locate(id) {
            Some((ListKind::Todo, index)) => &self.state.document.todo[index],
            Some((ListKind::Done, _)) => return Err(ControllerError::NotEditable(id.clone())),
            None => return Err(ControllerError::NotFound(id.clone())),
        };
        self.state.inputs.date = item.date.clone();
        self.state.inputs.text = item.text.clone();
        self.state.editing = Some(id.clone());
        Ok(())
    }

    /// Abandons the current edit without touching any item.
    pub fn cancel_edit(&mut self) {
        if self.state.editing.take().is_some() {
            self.state.inputs.reset();
        }
    }

    /// Removes an item after the user confirms.
    pub fn delete(&mut self, id: &ItemId) -> ControllerResult<ActionOutcome> {
        if !self.state.document.contains(id) {
            return Err(ControllerError::NotFound(id.clone()));
        }
        if !self.confirm.confirm(DELETE_PROMPT) {
            debug!("event=item_delete module=controller status=declined id={id}");
            return Ok(ActionOutcome::Unchanged);
        }

        if self.state.editing.as_ref() == Some(id) {
            self.state.editing = None;
            self.state.inputs.reset();
        }
        if let Some((kind, _)) = self.state.document.remove(id) {
            debug!(
                "event=item_delete module=controller status=ok id={id} list={}",
                kind.as_str()
            );
        }
        self.state.prune();
        Ok(self.persist())
    }

    /// Checks or unchecks an item's checkbox.
    pub fn set_checked(&mut self, id: &ItemId, checked: bool) -> ControllerResult<()> {
        match self.state.document.locate(id) {
            None => Err(ControllerError::NotFound(id.clone())),
            Some((ListKind::Done, _)) if self.mode == SelectionMode::TapToggle => {
                Err(ControllerError::SelectionUnsupported {
                    id: id.clone(),
                    mode: self.mode,
                })
            }
            Some(_) => {
                self.state.selection.set(id.clone(), checked);
                Ok(())
            }
        }
    }

    /// Toggles a completed row in tap-toggle mode; returns the new state.
    pub fn tap(&mut self, id: &ItemId) -> ControllerResult<bool> {
        match self.state.document.locate(id) {
            None => Err(ControllerError::NotFound(id.clone())),
            Some((ListKind::Done, _)) if self.mode == SelectionMode::TapToggle => {
                Ok(self.state.selection.toggle(id.clone()))
            }
            Some(_) => Err(ControllerError::SelectionUnsupported {
                id: id.clone(),
                mode: self.mode,
            }),
        }
    }

    /// Moves every selected pending item to the completed list.
    pub fn complete(&mut self) -> ActionOutcome {
        self.move_selected(ListKind::Todo, ListKind::Done)
    }

    /// Moves every selected completed item back to the pending list.
    pub fn restore(&mut self) -> ActionOutcome {
        self.move_selected(ListKind::Done, ListKind::Todo)
    }

    /// Asks storage to write the whole document to a user-chosen file.
    pub fn export_document(&self) -> ExportResult {
        self.store.export(&self.state.document)
    }

    /// Asks storage for a user-chosen file and adopts it wholesale.
    pub fn import_document(&mut self) -> ImportResult {
        let document = match self.store.import() {
            ImportResult::Imported { document } => document,
            other => return other,
        };
        if let Err(err) = document.validate() {
            warn!("event=document_import module=controller status=rejected error={err}");
            return ImportResult::Failed {
                error: err.to_string(),
            };
        }

        self.state = ListState::with_document(document.clone());
        info!(
            "event=document_import module=controller status=ok todo={} done={}",
            document.todo.len(),
            document.done.len()
        );
        ImportResult::Imported { document }
    }

    fn move_selected(&mut self, from: ListKind, to: ListKind) -> ActionOutcome {
        let selection = &self.state.selection;
        let (moving, staying): (Vec<TodoItem>, Vec<TodoItem>) = self
            .state
            .document
            .list_mut(from)
            .drain(..)
            .partition(|item| selection.contains(&item.id));
        *self.state.document.list_mut(from) = staying;

        if moving.is_empty() {
            return ActionOutcome::Unchanged;
        }

        for item in &moving {
            self.state.selection.remove(&item.id);
        }
        debug!(
            "event=items_move module=controller status=ok from={} to={} count={}",
            from.as_str(),
            to.as_str(),
            moving.len()
        );
        self.state.document.list_mut(to).extend(moving);
        self.state.prune();
        self.persist()
    }

    fn persist(&mut self) -> ActionOutcome {
        debug_assert!(self.state.document.validate().is_ok());
        let result = self.store.save(&self.state.document);
        if !result.success {
            warn!(
                "event=document_save module=controller status=error kept_in_memory=true items={}",
                self.state.document.len()
            );
        }
        ActionOutcome::Applied(result)
    }
}
