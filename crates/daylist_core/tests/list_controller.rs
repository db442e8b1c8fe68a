use daylist_core::{
    today, ActionOutcome, ControllerError, ExportResult, FixedAnswer, ImportResult, ItemId,
    ItemValidationError, ListController, PersistenceBoundary, SaveResult, SelectionMode,
    TodoDocument, TodoItem,
};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::path::PathBuf;

/// Records every save and answers import/export from canned results.
#[derive(Default)]
struct RecordingStore {
    initial: TodoDocument,
    saves: RefCell<Vec<TodoDocument>>,
    fail_saves: Cell<bool>,
    import_result: RefCell<Option<ImportResult>>,
}

impl RecordingStore {
    fn save_count(&self) -> usize {
        self.saves.borrow().len()
    }

    fn last_saved(&self) -> TodoDocument {
        self.saves.borrow().last().cloned().expect("at least one save")
    }
}

impl PersistenceBoundary for RecordingStore {
    fn save(&self, document: &TodoDocument) -> SaveResult {
        self.saves.borrow_mut().push(document.clone());
        if self.fail_saves.get() {
            SaveResult::failed("disk full")
        } else {
            SaveResult::saved()
        }
    }

    fn load(&self) -> TodoDocument {
        self.initial.clone()
    }

    fn export(&self, _document: &TodoDocument) -> ExportResult {
        ExportResult::Exported {
            path: PathBuf::from("/tmp/export.json"),
        }
    }

    fn import(&self) -> ImportResult {
        self.import_result
            .borrow_mut()
            .take()
            .unwrap_or(ImportResult::Canceled)
    }
}

fn controller(
    store: &RecordingStore,
    mode: SelectionMode,
) -> ListController<&RecordingStore, FixedAnswer> {
    ListController::start(store, FixedAnswer(true), mode)
}

fn assert_ids_unique(document: &TodoDocument) {
    let mut seen = HashSet::new();
    for item in document.todo.iter().chain(document.done.iter()) {
        assert!(seen.insert(item.id.clone()), "duplicate id {}", item.id);
    }
}

#[test]
fn add_persists_single_pending_entry() {
    let store = RecordingStore::default();
    let mut list = controller(&store, SelectionMode::Checkbox);

    let outcome = list.add_or_update("2024-01-01", "buy milk").unwrap();
    assert_eq!(outcome, ActionOutcome::Applied(SaveResult::saved()));

    let saved = store.last_saved();
    assert_eq!(saved.todo.len(), 1);
    assert_eq!(saved.todo[0].date, "2024-01-01");
    assert_eq!(saved.todo[0].text, "buy milk");
    assert!(!saved.todo[0].id.as_str().is_empty());
    assert!(saved.done.is_empty());

    let view = list.render();
    assert!(view.inputs.text.is_empty());
    assert_eq!(view.inputs.date, today());
}

#[test]
fn add_with_empty_fields_is_refused_without_saving() {
    let store = RecordingStore::default();
    let mut list = controller(&store, SelectionMode::Checkbox);

    let err = list.add_or_update("", "text").unwrap_err();
    assert_eq!(err, ControllerError::Validation(ItemValidationError::EmptyDate));
    let err = list.add_or_update("2024-01-01", "   ").unwrap_err();
    assert_eq!(err, ControllerError::Validation(ItemValidationError::EmptyText));

    assert_eq!(store.save_count(), 0);
    assert!(list.document().is_empty());
}

#[test]
fn completing_first_of_two_moves_it_and_hides_controls() {
    let store = RecordingStore::default();
    let mut list = controller(&store, SelectionMode::Checkbox);
    list.add_or_update("2024-01-01", "first").unwrap();
    list.add_or_update("2024-01-02", "second").unwrap();
    let first = list.document().todo[0].clone();
    let second = list.document().todo[1].clone();

    list.set_checked(&first.id, true).unwrap();
    let saves_before = store.save_count();
    let outcome = list.complete();
    assert!(matches!(outcome, ActionOutcome::Applied(_)));
    assert_eq!(store.save_count(), saves_before + 1);

    assert_eq!(list.document().todo, vec![second]);
    assert_eq!(list.document().done, vec![first.clone()]);

    let view = list.render();
    assert_eq!(view.done.len(), 1);
    assert_eq!(view.done[0].id, first.id);
    assert!(!view.done[0].controls_visible);
    assert!(!view.done[0].checkbox.checked);
    assert!(view.todo[0].controls_visible);
}

#[test]
fn restore_appends_to_end_of_pending() {
    let store = RecordingStore::default();
    let mut list = controller(&store, SelectionMode::Checkbox);
    list.add_or_update("2024-01-01", "a").unwrap();
    list.add_or_update("2024-01-02", "b").unwrap();
    let a = list.document().todo[0].clone();
    let b = list.document().todo[1].clone();

    list.set_checked(&a.id, true).unwrap();
    list.complete();
    list.set_checked(&a.id, true).unwrap();
    list.restore();

    assert_eq!(list.document().todo, vec![b, a]);
    assert!(list.document().done.is_empty());
    assert_ids_unique(&store.last_saved());
}

#[test]
fn complete_with_empty_selection_does_not_save() {
    let store = RecordingStore::default();
    let mut list = controller(&store, SelectionMode::Checkbox);
    list.add_or_update("2024-01-01", "a").unwrap();
    let saves = store.save_count();

    assert_eq!(list.complete(), ActionOutcome::Unchanged);
    assert_eq!(list.restore(), ActionOutcome::Unchanged);
    assert_eq!(store.save_count(), saves);
}

#[test]
fn declined_delete_changes_nothing_and_skips_save() {
    let store = RecordingStore::default();
    let mut list = ListController::start(&store, |_: &str| false, SelectionMode::Checkbox);
    list.add_or_update("2024-01-01", "keep me").unwrap();
    let before = list.document().clone();
    let saves = store.save_count();

    let id = before.todo[0].id.clone();
    assert_eq!(list.delete(&id).unwrap(), ActionOutcome::Unchanged);
    assert_eq!(list.document(), &before);
    assert_eq!(store.save_count(), saves);
}

#[test]
fn confirmed_delete_removes_from_either_list() {
    let store = RecordingStore::default();
    let mut list = controller(&store, SelectionMode::Checkbox);
    list.add_or_update("2024-01-01", "pending").unwrap();
    list.add_or_update("2024-01-01", "finished").unwrap();
    let finished = list.document().todo[1].id.clone();
    list.set_checked(&finished, true).unwrap();
    list.complete();

    list.delete(&finished).unwrap();
    assert!(list.document().done.is_empty());
    assert_eq!(store.last_saved().todo.len(), 1);

    let missing = ItemId::generate();
    assert_eq!(
        list.delete(&missing).unwrap_err(),
        ControllerError::NotFound(missing)
    );
}

#[test]
fn edit_rewrites_in_place_and_keeps_identity() {
    let store = RecordingStore::default();
    let mut list = controller(&store, SelectionMode::Checkbox);
    list.add_or_update("2024-01-01", "draft").unwrap();
    list.add_or_update("2024-01-02", "other").unwrap();
    let id = list.document().todo[0].id.clone();

    list.begin_edit(&id).unwrap();
    let view = list.render();
    assert_eq!(view.inputs.text, "draft");
    assert_eq!(view.inputs.date, "2024-01-01");
    assert_eq!(view.submit_label, "Save edit");
    assert!(view.todo[0].editing);

    list.set_text_input("final");
    list.submit().unwrap();

    let saved = store.last_saved();
    assert_eq!(saved.todo.len(), 2);
    assert_eq!(saved.todo[0].id, id);
    assert_eq!(saved.todo[0].text, "final");
    assert_eq!(list.render().submit_label, "Add");
    assert!(list.state().editing.is_none());
}

#[test]
fn begin_edit_twice_is_idempotent() {
    let store = RecordingStore::default();
    let mut list = controller(&store, SelectionMode::Checkbox);
    list.add_or_update("2024-01-01", "x").unwrap();
    let id = list.document().todo[0].id.clone();

    list.begin_edit(&id).unwrap();
    let once = list.state().clone();
    list.begin_edit(&id).unwrap();
    assert_eq!(list.state(), &once);
}

#[test]
fn begin_edit_rejects_second_item_and_completed_items() {
    let store = RecordingStore::default();
    let mut list = controller(&store, SelectionMode::Checkbox);
    list.add_or_update("2024-01-01", "a").unwrap();
    list.add_or_update("2024-01-01", "b").unwrap();
    list.add_or_update("2024-01-01", "c").unwrap();
    let a = list.document().todo[0].id.clone();
    let b = list.document().todo[1].id.clone();
    let c = list.document().todo[2].id.clone();

    list.set_checked(&c, true).unwrap();
    list.complete();
    assert_eq!(
        list.begin_edit(&c).unwrap_err(),
        ControllerError::NotEditable(c.clone())
    );

    list.begin_edit(&a).unwrap();
    assert_eq!(
        list.begin_edit(&b).unwrap_err(),
        ControllerError::EditInProgress { editing: a.clone() }
    );

    list.cancel_edit();
    list.begin_edit(&b).unwrap();
}

#[test]
fn cancel_edit_leaves_items_untouched() {
    let store = RecordingStore::default();
    let mut list = controller(&store, SelectionMode::Checkbox);
    list.add_or_update("2024-01-01", "original").unwrap();
    let id = list.document().todo[0].id.clone();
    let saves = store.save_count();

    list.begin_edit(&id).unwrap();
    list.set_text_input("changed");
    list.cancel_edit();

    assert_eq!(list.document().todo[0].text, "original");
    assert!(list.state().editing.is_none());
    assert!(list.render().inputs.text.is_empty());
    assert_eq!(store.save_count(), saves);

    list.add_or_update("2024-01-03", "fresh").unwrap();
    assert_eq!(list.document().todo.len(), 2);
}

#[test]
fn deleting_item_under_edit_clears_edit_state() {
    let store = RecordingStore::default();
    let mut list = controller(&store, SelectionMode::Checkbox);
    list.add_or_update("2024-01-01", "x").unwrap();
    let id = list.document().todo[0].id.clone();

    list.begin_edit(&id).unwrap();
    list.delete(&id).unwrap();
    assert!(list.state().editing.is_none());
    assert!(!list.render().editing);
}

#[test]
fn tap_toggle_mode_selects_completed_rows_by_tap() {
    let store = RecordingStore::default();
    let mut list = controller(&store, SelectionMode::TapToggle);
    list.add_or_update("2024-01-01", "a").unwrap();
    let id = list.document().todo[0].id.clone();

    assert!(matches!(
        list.tap(&id).unwrap_err(),
        ControllerError::SelectionUnsupported { .. }
    ));
    list.set_checked(&id, true).unwrap();
    list.complete();

    assert!(matches!(
        list.set_checked(&id, true).unwrap_err(),
        ControllerError::SelectionUnsupported { .. }
    ));
    let row = &list.render().done[0];
    assert!(row.checkbox.checked);
    assert!(!row.checkbox.enabled);
    assert!(!row.selected);

    assert!(list.tap(&id).unwrap());
    assert!(list.render().done[0].selected);
    assert!(!list.tap(&id).unwrap());
    assert_eq!(list.restore(), ActionOutcome::Unchanged);

    list.tap(&id).unwrap();
    list.restore();
    assert_eq!(list.document().todo.len(), 1);
    assert!(list.document().done.is_empty());
}

#[test]
fn checkbox_mode_rejects_tap() {
    let store = RecordingStore::default();
    let mut list = controller(&store, SelectionMode::Checkbox);
    list.add_or_update("2024-01-01", "a").unwrap();
    let id = list.document().todo[0].id.clone();
    list.set_checked(&id, true).unwrap();
    list.complete();

    assert!(list.tap(&id).is_err());
    list.set_checked(&id, true).unwrap();
    assert!(list.render().done[0].checkbox.checked);
}

#[test]
fn failed_save_keeps_in_memory_state() {
    let store = RecordingStore::default();
    store.fail_saves.set(true);
    let mut list = controller(&store, SelectionMode::Checkbox);

    let outcome = list.add_or_update("2024-01-01", "survives").unwrap();
    let result = outcome.save_result().unwrap();
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("disk full"));
    assert_eq!(list.document().todo.len(), 1);
}

#[test]
fn import_replaces_lists_wholesale() {
    let store = RecordingStore::default();
    let mut list = controller(&store, SelectionMode::Checkbox);
    list.add_or_update("2024-01-01", "old").unwrap();
    let old = list.document().todo[0].id.clone();
    list.begin_edit(&old).unwrap();

    let mut imported = TodoDocument::empty();
    imported.done.push(TodoItem::new("2023-12-31", "imported").unwrap());
    *store.import_result.borrow_mut() = Some(ImportResult::Imported {
        document: imported.clone(),
    });

    assert!(list.import_document().success());
    assert_eq!(list.document(), &imported);
    assert!(list.state().editing.is_none());
}

#[test]
fn failed_or_canceled_import_leaves_state() {
    let store = RecordingStore::default();
    let mut list = controller(&store, SelectionMode::Checkbox);
    list.add_or_update("2024-01-01", "stay").unwrap();
    let before = list.document().clone();

    *store.import_result.borrow_mut() = Some(ImportResult::Failed {
        error: "document is missing the `done` list".to_string(),
    });
    assert!(matches!(list.import_document(), ImportResult::Failed { .. }));
    assert_eq!(list.document(), &before);

    assert!(list.import_document().canceled());
    assert_eq!(list.document(), &before);
}

#[test]
fn import_with_duplicate_ids_is_rejected_by_controller() {
    let store = RecordingStore::default();
    let mut list = controller(&store, SelectionMode::Checkbox);
    let item = TodoItem::new("2024-01-01", "twin").unwrap();
    let document = TodoDocument {
        todo: vec![item.clone()],
        done: vec![item],
    };
    *store.import_result.borrow_mut() = Some(ImportResult::Imported { document });

    assert!(matches!(list.import_document(), ImportResult::Failed { .. }));
    assert!(list.document().is_empty());
}

#[test]
fn start_loads_initial_document() {
    let mut initial = TodoDocument::empty();
    initial.todo.push(TodoItem::new("2024-01-01", "loaded").unwrap());
    let store = RecordingStore {
        initial: initial.clone(),
        ..RecordingStore::default()
    };

    let list = controller(&store, SelectionMode::Checkbox);
    assert_eq!(list.document(), &initial);
    assert_eq!(store.save_count(), 0);
    assert!(list.export_document().success());
}

#[test]
fn ids_stay_unique_through_mixed_actions() {
    let store = RecordingStore::default();
    let mut list = controller(&store, SelectionMode::Checkbox);
    for n in 0..6 {
        list.add_or_update("2024-01-01", &format!("task {n}")).unwrap();
    }
    let ids: Vec<ItemId> = list.document().todo.iter().map(|i| i.id.clone()).collect();
    for id in ids.iter().step_by(2) {
        list.set_checked(id, true).unwrap();
    }
    list.complete();
    list.delete(&ids[1]).unwrap();
    list.set_checked(&ids[0], true).unwrap();
    list.restore();
    list.begin_edit(&ids[3]).unwrap();
    list.add_or_update("2024-02-02", "edited").unwrap();

    for saved in store.saves.borrow().iter() {
        assert_ids_unique(saved);
    }
    assert_eq!(list.document().len(), 5);
}
