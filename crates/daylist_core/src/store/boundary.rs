//! Request/response contract between the list controller and storage.
//!
//! # Responsibility
//! - Name the four storage operations the display side may request.
//! - Define result envelopes that carry failures as data.
//!
//! # Invariants
//! - No operation panics or returns `Err` across this boundary.
//! - Cancellation is its own outcome, distinct from success and failure.

use crate::model::document::TodoDocument;
use std::path::PathBuf;

/// Outcome of a `save` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveResult {
    pub success: bool,
    pub error: Option<String>,
    /// Set when the primary location failed and the fallback copy was written.
    pub fallback_path: Option<PathBuf>,
}

impl SaveResult {
    pub fn saved() -> Self {
        Self {
            success: true,
            error: None,
            fallback_path: None,
        }
    }

    pub fn saved_to_fallback(path: PathBuf) -> Self {
        Self {
            success: true,
            error: None,
            fallback_path: Some(path),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            fallback_path: None,
        }
    }
}

/// Outcome of an `export` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportResult {
    Exported { path: PathBuf },
    Canceled,
    Failed { error: String },
}

impl ExportResult {
    pub fn success(&self) -> bool {
        matches!(self, Self::Exported { .. })
    }

    pub fn canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}

/// Outcome of an `import` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportResult {
    Imported { document: TodoDocument },
    Canceled,
    Failed { error: String },
}

impl ImportResult {
    pub fn success(&self) -> bool {
        matches!(self, Self::Imported { .. })
    }

    pub fn canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}

/// Storage operations reachable from the display side.
pub trait PersistenceBoundary {
    /// Writes `document` as the current persisted state.
    fn save(&self, document: &TodoDocument) -> SaveResult;
    /// Reads the persisted state; falls back to an empty document.
    fn load(&self) -> TodoDocument;
    /// Writes `document` to a user-chosen location.
    fn export(&self, document: &TodoDocument) -> ExportResult;
    /// Reads a user-chosen file and adopts it as the persisted state.
    fn import(&self) -> ImportResult;
}

impl<T: PersistenceBoundary + ?Sized> PersistenceBoundary for &T {
    fn save(&self, document: &TodoDocument) -> SaveResult {
        (**self).save(document)
    }

    fn load(&self) -> TodoDocument {
        (**self).load()
    }

    fn export(&self, document: &TodoDocument) -> ExportResult {
        (**self).export(document)
    }

    fn import(&self) -> ImportResult {
        (**self).import()
    }
}
