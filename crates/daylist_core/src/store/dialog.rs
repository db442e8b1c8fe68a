//! File-location prompts supplied by the host shell.

use std::path::PathBuf;

/// Extensions offered by import/export prompts, most specific first.
pub const JSON_FILTERS: &[&str] = &["json", "*"];

/// What the host should show when asking for a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRequest {
    pub title: &'static str,
    /// Suggested file name for save prompts.
    pub default_file_name: Option<String>,
    pub extensions: &'static [&'static str],
}

/// Asks the user for a file location. `None` means the prompt was dismissed.
pub trait FileDialog {
    fn pick_save_path(&self, request: &DialogRequest) -> Option<PathBuf>;
    fn pick_open_path(&self, request: &DialogRequest) -> Option<PathBuf>;
}

/// Dialog whose answer the host already collected, e.g. across FFI or from
/// a command-line argument. `None` behaves as a dismissed prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetPath(pub Option<PathBuf>);

impl FileDialog for PresetPath {
    fn pick_save_path(&self, _request: &DialogRequest) -> Option<PathBuf> {
        self.0.clone()
    }

    fn pick_open_path(&self, _request: &DialogRequest) -> Option<PathBuf> {
        self.0.clone()
    }
}
