//! Terminal stand-ins for the host shell: prompts, dialogs and rendering.

use daylist_core::{
    Confirm, DialogRequest, ExportResult, FileDialog, ImportResult, ListView, RowView,
    SaveResult,
};
use std::cell::{Cell, RefCell};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const SHORT_ID_CHARS: usize = 8;

/// Delete confirmation source: a per-command answer (`--yes`/`--no`), a
/// session-wide default, or a y/N prompt on stdin.
#[derive(Debug, Default)]
pub struct CliConfirm {
    next: Cell<Option<bool>>,
    default: Option<bool>,
}

impl CliConfirm {
    pub fn ask() -> Self {
        Self::default()
    }

    pub fn assume(answer: bool) -> Self {
        Self {
            next: Cell::new(None),
            default: Some(answer),
        }
    }

    /// Pre-answers the next prompt; `None` leaves it to the default.
    pub fn preset(&self, answer: Option<bool>) {
        self.next.set(answer);
    }
}

impl Confirm for CliConfirm {
    fn confirm(&self, message: &str) -> bool {
        if let Some(answer) = self.next.take().or(self.default) {
            return answer;
        }
        print!("{message} [y/N] ");
        let _ = io::stdout().flush();
        read_stdin_line()
            .map(|answer| is_yes(&answer))
            .unwrap_or(false)
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// File dialog answered by a command argument, or by a stdin prompt in
/// interactive use. An empty answer cancels.
#[derive(Debug, Default)]
pub struct CliDialog {
    next: RefCell<Option<PathBuf>>,
    interactive: bool,
}

impl CliDialog {
    pub fn new(interactive: bool) -> Self {
        Self {
            next: RefCell::new(None),
            interactive,
        }
    }

    /// Pre-answers the next prompt.
    pub fn preset(&self, path: Option<PathBuf>) {
        *self.next.borrow_mut() = path;
    }

    fn answer(&self, request: &DialogRequest) -> Option<PathBuf> {
        if let Some(path) = self.next.borrow_mut().take() {
            return Some(path);
        }
        if !self.interactive {
            return None;
        }

        match &request.default_file_name {
            Some(name) => print!("{} (suggested: {name}, empty to cancel): ", request.title),
            None => print!("{} (empty to cancel): ", request.title),
        }
        let _ = io::stdout().flush();
        let line = read_stdin_line()?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    }
}

impl FileDialog for CliDialog {
    fn pick_save_path(&self, request: &DialogRequest) -> Option<PathBuf> {
        self.answer(request)
    }

    fn pick_open_path(&self, request: &DialogRequest) -> Option<PathBuf> {
        self.answer(request)
    }
}

fn read_stdin_line() -> Option<String> {
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line),
    }
}

pub fn short_id(row: &RowView) -> String {
    row.id.as_str().chars().take(SHORT_ID_CHARS).collect()
}

/// Prints both lists and, while editing, the input fields.
pub fn render(view: &ListView, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "To do ({})", view.todo.len())?;
    for row in &view.todo {
        render_row(row, out)?;
    }
    writeln!(out, "Done ({})", view.done.len())?;
    for row in &view.done {
        render_row(row, out)?;
    }
    if view.editing {
        writeln!(
            out,
            "editing: date={} text={} [{}]",
            view.inputs.date, view.inputs.text, view.submit_label
        )?;
    }
    Ok(())
}

fn render_row(row: &RowView, out: &mut impl Write) -> io::Result<()> {
    let mark = match (row.checkbox.checked, row.checkbox.enabled) {
        (true, true) => "[x]",
        (false, true) => "[ ]",
        (true, false) => "[#]",
        (false, false) => "[-]",
    };
    let cursor = if row.selected || row.editing { ">" } else { " " };
    writeln!(
        out,
        "{cursor} {mark} {}  {}  {}",
        short_id(row),
        row.date,
        row.text
    )
}

/// One-line user-facing report for a save.
pub fn describe_save(result: &SaveResult) -> Option<String> {
    match (result.success, &result.fallback_path, &result.error) {
        (true, None, _) => None,
        (true, Some(path), _) => Some(format!("saved to fallback location {}", path.display())),
        (false, _, Some(error)) => Some(format!("save failed, changes kept in memory: {error}")),
        (false, _, None) => Some("save failed, changes kept in memory".to_string()),
    }
}

/// Cancellation produces no message.
pub fn describe_export(result: &ExportResult) -> Option<String> {
    match result {
        ExportResult::Exported { path } => Some(format!("exported to {}", path.display())),
        ExportResult::Canceled => None,
        ExportResult::Failed { error } => Some(format!("export failed: {error}")),
    }
}

/// Cancellation produces no message.
pub fn describe_import(result: &ImportResult) -> Option<String> {
    match result {
        ImportResult::Imported { document } => Some(format!(
            "imported {} pending and {} completed items",
            document.todo.len(),
            document.done.len()
        )),
        ImportResult::Canceled => None,
        ImportResult::Failed { error } => Some(format!("import failed: {error}")),
    }
}
