//! Persistence service owning the on-disk document.
//!
//! # Responsibility
//! - Serve save/load/export/import requests from the list controller.
//! - Retry failed primary writes at the fallback location.
//! - Validate imported files before adopting them.
//!
//! # Invariants
//! - Writes are serialized by one lock; the last writer wins.
//! - `load` never fails: unreadable data yields an empty document.
//! - `load` returns the most recently saved copy, primary or fallback.
//! - Import replaces the primary file only after validation passes.

use super::boundary::{ExportResult, ImportResult, PersistenceBoundary, SaveResult};
use super::dialog::{DialogRequest, FileDialog, JSON_FILTERS};
use super::json_file::{read_document, write_document, StoreError};
use crate::config::StorePaths;
use crate::logging::single_line;
use crate::model::document::TodoDocument;
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Instant, SystemTime};

const EXPORT_TITLE: &str = "Export todo data";
const IMPORT_TITLE: &str = "Import todo data";
const MAX_LOGGED_ERROR_CHARS: usize = 240;

/// File-backed implementation of [`PersistenceBoundary`].
pub struct PersistenceService<D: FileDialog> {
    paths: StorePaths,
    dialog: D,
    write_lock: Mutex<()>,
}

impl<D: FileDialog> PersistenceService<D> {
    pub fn new(paths: StorePaths, dialog: D) -> Self {
        Self {
            paths,
            dialog,
            write_lock: Mutex::new(()),
        }
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    pub fn dialog(&self) -> &D {
        &self.dialog
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Writes to the primary file, then to the fallback file on failure.
    ///
    /// Returns the fallback path when that is where the data landed.
    fn write_with_fallback(&self, document: &TodoDocument) -> Result<Option<PathBuf>, String> {
        let _guard = self.lock_writes();

        let primary_err = match write_document(&self.paths.primary, document) {
            Ok(()) => return Ok(None),
            Err(err) => err,
        };
        warn!(
            "event=store_save module=store status=primary_failed path={} error={}",
            self.paths.primary.display(),
            single_line(&primary_err.to_string(), MAX_LOGGED_ERROR_CHARS)
        );

        let Some(fallback) = self.paths.fallback.as_ref() else {
            return Err(primary_err.to_string());
        };
        match write_document(fallback, document) {
            Ok(()) => Ok(Some(fallback.clone())),
            Err(fallback_err) => Err(format!(
                "{primary_err}; fallback also failed: {fallback_err}"
            )),
        }
    }

    /// Picks the copy that holds the last successful save.
    ///
    /// When both files parse, the more recently written one wins; ties go to
    /// the primary. A single readable copy wins over an unreadable one.
    /// `None` means neither file exists yet.
    fn read_existing(&self) -> Option<(PathBuf, Result<TodoDocument, StoreError>)> {
        let primary = (
            self.paths.primary.clone(),
            read_document(&self.paths.primary),
        );
        let Some(fallback_path) = self.paths.fallback.as_ref() else {
            return Some(primary).filter(|(_, read)| !is_missing(read));
        };
        let fallback = (fallback_path.clone(), read_document(fallback_path));

        let newer_fallback = modified_at(&fallback.0) > modified_at(&primary.0);
        match (primary.1.is_ok(), fallback.1.is_ok()) {
            (true, true) if newer_fallback => Some(fallback),
            (true, _) => Some(primary),
            (false, true) => Some(fallback),
            (false, false) if !is_missing(&primary.1) => Some(primary),
            (false, false) if !is_missing(&fallback.1) => Some(fallback),
            (false, false) => None,
        }
    }
}

fn is_missing(read: &Result<TodoDocument, StoreError>) -> bool {
    read.as_ref().is_err_and(StoreError::is_not_found)
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .ok()
}

impl<D: FileDialog> PersistenceBoundary for PersistenceService<D> {
    fn save(&self, document: &TodoDocument) -> SaveResult {
        let started_at = Instant::now();
        match self.write_with_fallback(document) {
            Ok(None) => {
                debug!(
                    "event=store_save module=store status=ok todo={} done={} duration_ms={}",
                    document.todo.len(),
                    document.done.len(),
                    started_at.elapsed().as_millis()
                );
                SaveResult::saved()
            }
            Ok(Some(fallback)) => {
                warn!(
                    "event=store_save module=store status=fallback path={} duration_ms={}",
                    fallback.display(),
                    started_at.elapsed().as_millis()
                );
                SaveResult::saved_to_fallback(fallback)
            }
            Err(message) => {
                error!(
                    "event=store_save module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    single_line(&message, MAX_LOGGED_ERROR_CHARS)
                );
                SaveResult::failed(message)
            }
        }
    }

    fn load(&self) -> TodoDocument {
        match self.read_existing() {
            Some((path, Ok(document))) => {
                info!(
                    "event=store_load module=store status=ok path={} todo={} done={}",
                    path.display(),
                    document.todo.len(),
                    document.done.len()
                );
                document
            }
            Some((path, Err(err))) => {
                error!(
                    "event=store_load module=store status=error path={} error={}",
                    path.display(),
                    single_line(&err.to_string(), MAX_LOGGED_ERROR_CHARS)
                );
                TodoDocument::empty()
            }
            None => {
                info!(
                    "event=store_load module=store status=initialized path={}",
                    self.paths.primary.display()
                );
                let empty = TodoDocument::empty();
                // Best effort; save logs its own failure.
                let _ = self.save(&empty);
                empty
            }
        }
    }

    fn export(&self, document: &TodoDocument) -> ExportResult {
        let request = DialogRequest {
            title: EXPORT_TITLE,
            default_file_name: Some(default_export_file_name()),
            extensions: JSON_FILTERS,
        };
        let Some(path) = self.dialog.pick_save_path(&request) else {
            info!("event=store_export module=store status=canceled");
            return ExportResult::Canceled;
        };

        let result = {
            let _guard = self.lock_writes();
            write_document(&path, document)
        };
        match result {
            Ok(()) => {
                info!(
                    "event=store_export module=store status=ok path={} items={}",
                    path.display(),
                    document.len()
                );
                ExportResult::Exported { path }
            }
            Err(err) => {
                error!(
                    "event=store_export module=store status=error path={} error={}",
                    path.display(),
                    single_line(&err.to_string(), MAX_LOGGED_ERROR_CHARS)
                );
                ExportResult::Failed {
                    error: err.to_string(),
                }
            }
        }
    }

    fn import(&self) -> ImportResult {
        let request = DialogRequest {
            title: IMPORT_TITLE,
            default_file_name: None,
            extensions: JSON_FILTERS,
        };
        let Some(path) = self.dialog.pick_open_path(&request) else {
            info!("event=store_import module=store status=canceled");
            return ImportResult::Canceled;
        };

        let document = match read_document(&path) {
            Ok(document) => document,
            Err(err) => {
                error!(
                    "event=store_import module=store status=error path={} error={}",
                    path.display(),
                    single_line(&err.to_string(), MAX_LOGGED_ERROR_CHARS)
                );
                return ImportResult::Failed {
                    error: err.to_string(),
                };
            }
        };

        // The imported file is valid; a failed adopt-write is reported in the
        // log and the next mutation retries it.
        let adopted = self.save(&document);
        info!(
            "event=store_import module=store status=ok path={} items={} persisted={}",
            path.display(),
            document.len(),
            adopted.success
        );
        ImportResult::Imported { document }
    }
}

/// `todo-backup-YYYY-MM-DD.json` for today's local date.
pub fn default_export_file_name() -> String {
    format!(
        "todo-backup-{}.json",
        chrono::Local::now().date_naive().format("%Y-%m-%d")
    )
}
