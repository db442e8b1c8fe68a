//! JSON document file I/O.
//!
//! # Invariants
//! - Writes go to a sibling temp file, are fsynced, then renamed over the
//!   target, so readers never observe a partially written document.

use crate::model::document::{DocumentError, TodoDocument};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Io {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    Document(DocumentError),
}

impl StoreError {
    fn io(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether the failure means the file simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == ErrorKind::NotFound)
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io {
                action,
                path,
                source,
            } => write!(f, "failed to {action} `{}`: {source}", path.display()),
            Self::Document(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Document(err) => Some(err),
        }
    }
}

impl From<DocumentError> for StoreError {
    fn from(value: DocumentError) -> Self {
        Self::Document(value)
    }
}

/// Reads and validates a document file.
pub fn read_document(path: &Path) -> StoreResult<TodoDocument> {
    let raw = std::fs::read_to_string(path).map_err(|err| StoreError::io("read", path, err))?;
    Ok(TodoDocument::from_json_str(&raw)?)
}

/// Serializes `document` and writes it atomically to `path`.
pub fn write_document(path: &Path, document: &TodoDocument) -> StoreResult<()> {
    let json = document.to_pretty_json()?;
    write_atomic(path, json.as_bytes())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|err| StoreError::io("create directory", parent, err))?;
    }

    let tmp_path = temp_sibling(path);
    let result = (|| {
        let mut file = std::fs::File::create(&tmp_path)
            .map_err(|err| StoreError::io("create temp file", &tmp_path, err))?;
        file.write_all(bytes)
            .map_err(|err| StoreError::io("write temp file", &tmp_path, err))?;
        file.sync_all()
            .map_err(|err| StoreError::io("sync temp file", &tmp_path, err))?;
        std::fs::rename(&tmp_path, path).map_err(|err| StoreError::io("replace", path, err))
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(&tmp_path);
    }
    result
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
