//! Command definitions and dispatch onto the list controller.

use crate::terminal::{
    describe_export, describe_import, describe_save, render, CliConfirm, CliDialog,
};
use clap::{Parser, Subcommand};
use daylist_core::{
    ActionOutcome, ConfigError, ControllerError, ItemId, ListController, ListKind,
    PersistenceService, SelectionMode, TodoDocument,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};
use std::path::PathBuf;

const BINARY_NAME: &str = "daylist";

/// Day planner with a pending and a completed list.
#[derive(Debug, Parser)]
#[command(
    name = "daylist",
    version,
    arg_required_else_help = true,
    after_help = "Ids may be shortened to any unique prefix."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parses one shell line that is already split into words.
    pub fn parse_words(words: &[String]) -> Result<Command, clap::Error> {
        let args = std::iter::once(BINARY_NAME).chain(words.iter().map(String::as_str));
        Self::try_parse_from(args).map(|cli| cli.command)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show both lists
    #[command(visible_alias = "ls")]
    List,
    /// Start an interactive session
    Shell,
    /// Print the core version
    Version,
    /// Add a pending item
    Add {
        /// Date as YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<String>,
        /// Item text
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Edit a pending item; without text the edit stays open
    Edit {
        id: String,
        /// New date as YYYY-MM-DD
        #[arg(short, long)]
        date: Option<String>,
        /// New item text; submits the edit
        text: Vec<String>,
    },
    /// Delete an item after confirmation
    #[command(visible_alias = "rm")]
    Delete {
        id: String,
        /// Confirm without asking
        #[arg(short, long, conflicts_with = "no")]
        yes: bool,
        /// Decline without asking
        #[arg(short, long)]
        no: bool,
    },
    /// Complete the given pending items, or the current selection
    Done { ids: Vec<String> },
    /// Move the given completed items back, or the current selection
    Restore { ids: Vec<String> },
    /// Write all items to a file
    Export { path: Option<PathBuf> },
    /// Replace all items from a file
    Import { path: Option<PathBuf> },
    /// Set the date field
    Date { date: String },
    /// Set the text field
    Text { text: Vec<String> },
    /// Submit the input fields
    Submit,
    /// Abandon the current edit
    Cancel,
    /// Select an item
    Check { id: String },
    /// Deselect an item
    Uncheck { id: String },
    /// Toggle a completed item in tap-toggle mode
    Tap { id: String },
    /// Leave the shell
    #[command(visible_alias = "exit")]
    Quit,
}

impl Command {
    /// Whether the list should be shown again after this command.
    pub fn mutates(&self) -> bool {
        !matches!(self, Self::List | Self::Shell | Self::Version | Self::Quit)
    }
}

#[derive(Debug)]
pub enum CliError {
    /// An id or argument that does not fit the current lists.
    Input(String),
    Config(ConfigError),
    Controller(ControllerError),
    Io(io::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input(message) => write!(f, "{message}"),
            Self::Config(err) => write!(f, "configuration error: {err}"),
            Self::Controller(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Input(_) => None,
            Self::Config(err) => Some(err),
            Self::Controller(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<ControllerError> for CliError {
    fn from(value: ControllerError) -> Self {
        Self::Controller(value)
    }
}

impl From<io::Error> for CliError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Resolves a full id or a unique prefix against both lists.
pub fn resolve_id(document: &TodoDocument, raw: &str) -> Result<ItemId, CliError> {
    let needle = raw.trim();
    if needle.is_empty() {
        return Err(CliError::Input("item id cannot be empty".to_string()));
    }
    let mut matches = document
        .todo
        .iter()
        .chain(document.done.iter())
        .filter(|item| item.id.as_str().starts_with(needle))
        .map(|item| item.id.clone());

    match (matches.next(), matches.next()) {
        (Some(id), None) => Ok(id),
        (None, _) => Err(CliError::Input(format!("no item matches `{needle}`"))),
        (Some(_), Some(_)) => Err(CliError::Input(format!(
            "`{needle}` matches more than one item"
        ))),
    }
}

pub type CliController<'a> = ListController<&'a PersistenceService<CliDialog>, CliConfirm>;

/// Runs one command against the controller, printing results to `out`.
pub fn execute(
    list: &mut CliController<'_>,
    command: Command,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        Command::Version => writeln!(out, "daylist {}", daylist_core::core_version())?,
        Command::List => render(&list.render(), out)?,
        Command::Shell | Command::Quit => {}
        Command::Add { date, text } => {
            let date = date.unwrap_or_else(|| list.state().inputs.date.clone());
            let outcome = list.add_or_update(&date, &text.join(" "))?;
            report_outcome(&outcome, out)?;
        }
        Command::Edit { id, date, text } => {
            let id = resolve_id(list.document(), &id)?;
            list.begin_edit(&id)?;
            if let Some(date) = date {
                list.set_date_input(date);
            }
            if !text.is_empty() {
                list.set_text_input(text.join(" "));
                let outcome = list.submit()?;
                report_outcome(&outcome, out)?;
            }
        }
        Command::Delete { id, yes, no } => {
            let id = resolve_id(list.document(), &id)?;
            let answer = match (yes, no) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            list.confirm().preset(answer);
            match list.delete(&id)? {
                ActionOutcome::Unchanged => writeln!(out, "kept")?,
                outcome => report_outcome(&outcome, out)?,
            }
        }
        Command::Done { ids } => {
            select_for_move(list, &ids, ListKind::Todo)?;
            report_outcome(&list.complete(), out)?;
        }
        Command::Restore { ids } => {
            select_for_move(list, &ids, ListKind::Done)?;
            report_outcome(&list.restore(), out)?;
        }
        Command::Export { path } => {
            list.store().dialog().preset(path);
            if let Some(message) = describe_export(&list.export_document()) {
                writeln!(out, "{message}")?;
            }
        }
        Command::Import { path } => {
            list.store().dialog().preset(path);
            if let Some(message) = describe_import(&list.import_document()) {
                writeln!(out, "{message}")?;
            }
        }
        Command::Date { date } => list.set_date_input(date),
        Command::Text { text } => list.set_text_input(text.join(" ")),
        Command::Submit => {
            let outcome = list.submit()?;
            report_outcome(&outcome, out)?;
        }
        Command::Cancel => list.cancel_edit(),
        Command::Check { id } => {
            let id = resolve_id(list.document(), &id)?;
            list.set_checked(&id, true)?;
        }
        Command::Uncheck { id } => {
            let id = resolve_id(list.document(), &id)?;
            list.set_checked(&id, false)?;
        }
        Command::Tap { id } => {
            let id = resolve_id(list.document(), &id)?;
            list.tap(&id)?;
        }
    }
    Ok(())
}

/// Selects `ids` for a move out of `from`.
///
/// Every id is resolved and checked against `from` before anything is
/// selected, so a rejected command leaves the selection as it was.
fn select_for_move(
    list: &mut CliController<'_>,
    ids: &[String],
    from: ListKind,
) -> Result<(), CliError> {
    let mut resolved = Vec::with_capacity(ids.len());
    for raw in ids {
        let id = resolve_id(list.document(), raw)?;
        let in_source = matches!(list.document().locate(&id), Some((kind, _)) if kind == from);
        if !in_source {
            let message = format!("item {id} is not {}", list_label(from));
            return Err(CliError::Input(message));
        }
        resolved.push(id);
    }

    for id in &resolved {
        if from == ListKind::Done && list.mode() == SelectionMode::TapToggle {
            if !list.tap(id)? {
                list.tap(id)?;
            }
        } else {
            list.set_checked(id, true)?;
        }
    }
    Ok(())
}

fn list_label(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Todo => "pending",
        ListKind::Done => "completed",
    }
}

fn report_outcome(outcome: &ActionOutcome, out: &mut impl Write) -> io::Result<()> {
    match outcome {
        ActionOutcome::Applied(result) => match describe_save(result) {
            Some(message) => writeln!(out, "{message}"),
            None => writeln!(out, "saved"),
        },
        ActionOutcome::Unchanged => writeln!(out, "nothing selected"),
    }
}
