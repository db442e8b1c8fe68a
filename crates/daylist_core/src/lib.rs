//! Core domain logic for Daylist.
//! This crate owns the task lists, their persistence and every invariant on
//! them; front ends only render and forward user actions.

pub mod config;
pub mod controller;
pub mod logging;
pub mod model;
pub mod store;

pub use config::{AppConfig, ConfigError, StorePaths, DATA_FILE_NAME};
pub use controller::prompt::{Confirm, FixedAnswer};
pub use controller::selection::SelectionMode;
pub use controller::state::{today, InputFields, ListState};
pub use controller::view::{CheckboxView, ListView, RowView};
pub use controller::{ActionOutcome, ControllerError, ControllerResult, ListController};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LogTarget,
};
pub use model::document::{DocumentError, ListKind, TodoDocument};
pub use model::item::{ItemId, ItemValidationError, TodoItem};
pub use store::boundary::{ExportResult, ImportResult, PersistenceBoundary, SaveResult};
pub use store::dialog::{DialogRequest, FileDialog, PresetPath};
pub use store::json_file::{StoreError, StoreResult};
pub use store::service::{default_export_file_name, PersistenceService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
