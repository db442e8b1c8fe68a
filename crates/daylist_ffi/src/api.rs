//! FFI persistence API for the Flutter host.
//!
//! # Responsibility
//! - Expose the four storage operations (save, load, export, import) to Dart.
//! - Map core envelopes to plain DTOs with string paths and errors.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - File dialogs run on the host; a `None` path means the user cancelled.
//! - Storage calls from this process are serialized by one gate.

use daylist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, AppConfig,
    ExportResult, ImportResult, ItemId, PersistenceBoundary, PersistenceService, PresetPath,
    StorePaths, TodoDocument, TodoItem,
};
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static STORE_PATHS: OnceLock<StorePaths> = OnceLock::new();
static STORE_GATE: Mutex<()> = Mutex::new(());

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: `trace|debug|info|warn|error`, case-insensitive.
/// - `log_dir`: absolute directory for rolling logs.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the data directory (and optional fallback) for this process.
///
/// Without this call, locations come from `DAYLIST_*` environment variables.
///
/// # FFI contract
/// - Directories must be absolute.
/// - Repeating the same directories is accepted; different ones are rejected.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_store(data_dir: String, fallback_dir: Option<String>) -> String {
    let data_dir = PathBuf::from(data_dir.trim());
    let fallback_dir = fallback_dir
        .map(|dir| PathBuf::from(dir.trim()))
        .filter(|dir| !dir.as_os_str().is_empty());
    if !data_dir.is_absolute() || fallback_dir.as_ref().is_some_and(|dir| !dir.is_absolute()) {
        return "store directories must be absolute paths".to_string();
    }

    let requested = StorePaths::in_dirs(&data_dir, fallback_dir.as_deref());
    let active = STORE_PATHS.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "store already initialized at `{}`; refusing to switch to `{}`",
            active.primary.display(),
            requested.primary.display()
        )
    }
}

/// Item shape shared with Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItemDto {
    pub id: String,
    pub date: String,
    pub text: String,
}

/// Both lists, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoDocumentDto {
    pub todo: Vec<TodoItemDto>,
    pub done: Vec<TodoItemDto>,
}

/// `save` response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveResponse {
    pub success: bool,
    pub error: Option<String>,
    /// Set when data landed in the fallback location.
    pub fallback_path: Option<String>,
}

/// `export` response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    pub success: bool,
    pub canceled: bool,
    pub path: Option<String>,
    pub error: Option<String>,
}

/// `import` response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResponse {
    pub success: bool,
    pub canceled: bool,
    pub data: Option<TodoDocumentDto>,
    pub error: Option<String>,
}

impl SaveResponse {
    fn failure(error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
            fallback_path: None,
        }
    }
}

impl ExportResponse {
    fn from_result(result: ExportResult) -> Self {
        match result {
            ExportResult::Exported { path } => Self {
                success: true,
                canceled: false,
                path: Some(path.display().to_string()),
                error: None,
            },
            ExportResult::Canceled => Self {
                success: false,
                canceled: true,
                path: None,
                error: None,
            },
            ExportResult::Failed { error } => Self::failure(error),
        }
    }

    fn failure(error: String) -> Self {
        Self {
            success: false,
            canceled: false,
            path: None,
            error: Some(error),
        }
    }
}

impl ImportResponse {
    fn from_result(result: ImportResult) -> Self {
        match result {
            ImportResult::Imported { document } => Self {
                success: true,
                canceled: false,
                data: Some(to_dto(&document)),
                error: None,
            },
            ImportResult::Canceled => Self {
                success: false,
                canceled: true,
                data: None,
                error: None,
            },
            ImportResult::Failed { error } => Self::failure(error),
        }
    }

    fn failure(error: String) -> Self {
        Self {
            success: false,
            canceled: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Persists the full document to the primary data file.
///
/// # FFI contract
/// - Sync call, file-backed execution.
/// - Never panics; invalid documents are reported in `error`.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_save(document: TodoDocumentDto) -> SaveResponse {
    let document = match from_dto(document) {
        Ok(document) => document,
        Err(err) => return SaveResponse::failure(format!("todo_save failed: {err}")),
    };
    match with_service(None, |service| service.save(&document)) {
        Ok(result) => SaveResponse {
            success: result.success,
            error: result.error,
            fallback_path: result.fallback_path.map(|path| path.display().to_string()),
        },
        Err(err) => SaveResponse::failure(format!("todo_save failed: {err}")),
    }
}

/// Loads the persisted document.
///
/// # FFI contract
/// - Sync call, file-backed execution.
/// - Never fails: unreadable or missing data yields an empty document.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_load() -> TodoDocumentDto {
    match with_service(None, |service| service.load()) {
        Ok(document) => to_dto(&document),
        Err(err) => {
            warn!("event=ffi_load module=ffi status=error error={err}");
            TodoDocumentDto::default()
        }
    }
}

/// Writes the document to the path the host's save prompt returned.
///
/// # FFI contract
/// - `path = None` reports `canceled = true` and writes nothing.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_export(document: TodoDocumentDto, path: Option<String>) -> ExportResponse {
    let document = match from_dto(document) {
        Ok(document) => document,
        Err(err) => return ExportResponse::failure(format!("todo_export failed: {err}")),
    };
    match with_service(host_choice(path), |service| service.export(&document)) {
        Ok(result) => ExportResponse::from_result(result),
        Err(err) => ExportResponse::failure(format!("todo_export failed: {err}")),
    }
}

/// Reads and adopts the file the host's open prompt returned.
///
/// # FFI contract
/// - `path = None` reports `canceled = true`.
/// - A file missing `todo` or `done` is rejected and nothing is written.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_import(path: Option<String>) -> ImportResponse {
    match with_service(host_choice(path), |service| service.import()) {
        Ok(result) => ImportResponse::from_result(result),
        Err(err) => ImportResponse::failure(format!("todo_import failed: {err}")),
    }
}

fn host_choice(path: Option<String>) -> Option<PathBuf> {
    path.map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from)
}

fn resolve_store_paths() -> Result<StorePaths, String> {
    if let Some(paths) = STORE_PATHS.get() {
        return Ok(paths.clone());
    }
    let config = AppConfig::from_env().map_err(|err| format!("store config invalid: {err}"))?;
    Ok(STORE_PATHS.get_or_init(|| config.store_paths()).clone())
}

fn with_service<T>(
    chosen: Option<PathBuf>,
    f: impl FnOnce(&PersistenceService<PresetPath>) -> T,
) -> Result<T, String> {
    let paths = resolve_store_paths()?;
    let _gate = STORE_GATE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let service = PersistenceService::new(paths, PresetPath(chosen));
    Ok(f(&service))
}

fn to_dto(document: &TodoDocument) -> TodoDocumentDto {
    let items = |list: &[TodoItem]| {
        list.iter()
            .map(|item| TodoItemDto {
                id: item.id.to_string(),
                date: item.date.clone(),
                text: item.text.clone(),
            })
            .collect::<Vec<_>>()
    };
    TodoDocumentDto {
        todo: items(&document.todo),
        done: items(&document.done),
    }
}

fn from_dto(dto: TodoDocumentDto) -> Result<TodoDocument, String> {
    let items = |list: Vec<TodoItemDto>| {
        list.into_iter()
            .map(|item| {
                let id = ItemId::parse(item.id).map_err(|err| err.to_string())?;
                TodoItem::with_id(id, item.date, item.text).map_err(|err| err.to_string())
            })
            .collect::<Result<Vec<_>, String>>()
    };
    let document = TodoDocument {
        todo: items(dto.todo)?,
        done: items(dto.done)?,
    };
    document.validate().map_err(|err| err.to_string())?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, from_dto, init_logging, init_store, todo_export, todo_import, todo_load,
        todo_save, TodoDocumentDto, TodoItemDto,
    };
    use std::path::PathBuf;
    use std::sync::OnceLock;

    static TEST_DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

    fn test_data_dir() -> PathBuf {
        TEST_DATA_DIR
            .get_or_init(|| {
                let dir = std::env::temp_dir()
                    .join(format!("daylist-ffi-test-{}", std::process::id()));
                let error = init_store(dir.display().to_string(), None);
                assert!(error.is_empty(), "{error}");
                dir
            })
            .clone()
    }

    fn item(id: &str, text: &str) -> TodoItemDto {
        TodoItemDto {
            id: id.to_string(),
            date: "2024-01-01".to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_store_rejects_relative_and_conflicting_dirs() {
        let dir = test_data_dir();
        assert!(!init_store("relative/dir".to_string(), None).is_empty());
        assert!(init_store(dir.display().to_string(), None).is_empty());
        let other = std::env::temp_dir().join("daylist-ffi-other");
        assert!(init_store(other.display().to_string(), None).contains("refusing"));
    }

    #[test]
    fn from_dto_rejects_empty_text_and_duplicate_ids() {
        let blank = TodoDocumentDto {
            todo: vec![item("a", "  ")],
            done: Vec::new(),
        };
        assert!(from_dto(blank).unwrap_err().contains("text"));

        let twins = TodoDocumentDto {
            todo: vec![item("a", "x")],
            done: vec![item("a", "y")],
        };
        assert!(from_dto(twins).unwrap_err().contains("duplicate"));
    }

    #[test]
    fn save_load_and_import_share_primary_file() {
        let dir = test_data_dir();
        let document = TodoDocumentDto {
            todo: vec![item("1", "buy milk")],
            done: vec![item("2", "pay rent")],
        };

        let saved = todo_save(document.clone());
        assert!(saved.success, "{:?}", saved.error);
        assert_eq!(todo_load(), document);

        let partial = dir.join("partial.json");
        std::fs::write(&partial, r#"{"todo":[]}"#).unwrap();
        let rejected = todo_import(Some(partial.display().to_string()));
        assert!(!rejected.success);
        assert!(!rejected.canceled);
        assert_eq!(todo_load(), document);

        let incoming = dir.join("incoming.json");
        std::fs::write(
            &incoming,
            r#"{"todo":[{"id":"9","date":"2024-05-05","text":"imported"}],"done":[]}"#,
        )
        .unwrap();
        let imported = todo_import(Some(incoming.display().to_string()));
        assert!(imported.success, "{:?}", imported.error);
        assert_eq!(imported.data.as_ref().unwrap().todo[0].text, "imported");
        assert_eq!(todo_load(), imported.data.unwrap());
    }

    #[test]
    fn export_and_import_report_cancellation() {
        test_data_dir();
        let export = todo_export(TodoDocumentDto::default(), None);
        assert!(export.canceled);
        assert!(!export.success);
        assert!(export.error.is_none());

        let import = todo_import(Some("   ".to_string()));
        assert!(import.canceled);
    }

    #[test]
    fn export_writes_chosen_file() {
        let dir = test_data_dir();
        let target = dir.join("export.json");
        let response = todo_export(
            TodoDocumentDto {
                todo: vec![item("e1", "exported")],
                done: Vec::new(),
            },
            Some(target.display().to_string()),
        );
        assert!(response.success, "{:?}", response.error);
        assert_eq!(response.path, Some(target.display().to_string()));
        assert!(std::fs::read_to_string(&target).unwrap().contains("exported"));
    }
}
