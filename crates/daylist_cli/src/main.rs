//! Terminal front end for the daylist core.
//!
//! # Responsibility
//! - Run one command per invocation, or an interactive shell session.
//! - Stand in for the host UI: prompts replace confirm and file dialogs.
//!
//! # Invariants
//! - Every mutating command is written through before the process exits.
//! - Errors inside the shell are reported and the session continues.

mod commands;
mod terminal;

use clap::Parser;
use commands::{execute, Cli, CliController, CliError, Command};
use daylist_core::{init_logging_from_config, AppConfig, ListController, PersistenceService};
use log::info;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use terminal::{render, CliConfirm, CliDialog};

const SHELL_PROMPT: &str = "daylist> ";

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("daylist: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    if command == Command::Version {
        writeln!(stdout, "daylist {}", daylist_core::core_version())?;
        return Ok(());
    }

    let config = AppConfig::from_env()?;
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("daylist: logging disabled: {err}");
    }

    let interactive = command == Command::Shell;
    let service = PersistenceService::new(config.store_paths(), CliDialog::new(interactive));
    let mut list = ListController::start(&service, CliConfirm::ask(), config.selection_mode);
    info!(
        "event=cli_start module=cli status=ok interactive={} mode={}",
        interactive, config.selection_mode
    );

    if interactive {
        return shell(&mut list);
    }

    let mutates = command.mutates();
    execute(&mut list, command, &mut stdout)?;
    if mutates {
        render(&list.render(), &mut stdout)?;
    }
    Ok(())
}

fn shell(list: &mut CliController<'_>) -> Result<(), CliError> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    render(&list.render(), &mut stdout)?;

    loop {
        write!(stdout, "{SHELL_PROMPT}")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let words: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        if words.is_empty() {
            continue;
        }

        let command = match Cli::parse_words(&words) {
            Ok(Command::Quit) => break,
            Ok(Command::Shell) => {
                writeln!(stdout, "already in a shell session")?;
                continue;
            }
            Ok(command) => command,
            Err(err) => {
                // Help and parse errors alike are shown without leaving the shell.
                write!(stdout, "{}", err.render())?;
                continue;
            }
        };

        let mutates = command.mutates();
        match execute(list, command, &mut stdout) {
            Ok(()) if mutates => render(&list.render(), &mut stdout)?,
            Ok(()) => {}
            Err(CliError::Io(err)) => return Err(CliError::Io(err)),
            Err(err) => writeln!(stdout, "{err}")?,
        }
    }

    info!("event=cli_exit module=cli status=ok");
    Ok(())
}
