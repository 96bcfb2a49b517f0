//! Dispatches parsed arguments to the command handlers.
//!
//! # Returns
//! - `Ok(CommandResult)` with issue counts and exit behavior
//! - `Err` if the command fails (e.g., config not found, store locked)
use anyhow::{Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{
        CommandResult, diff::diff, export::export, extract::extract, glossary::glossary,
        init::init, review::review, status::status, sync::sync, translate::translate,
    },
};

pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Init) => init(),
        Some(Command::Extract(cmd)) => extract(cmd),
        Some(Command::Diff(cmd)) => diff(cmd),
        Some(Command::Sync(cmd)) => sync(cmd),
        Some(Command::Translate(cmd)) => translate(cmd),
        Some(Command::Export(cmd)) => export(cmd),
        Some(Command::Status(cmd)) => status(cmd),
        Some(Command::Review(cmd)) => review(cmd),
        Some(Command::Glossary(cmd)) => glossary(cmd),
        None => bail!("No command provided. Use --help to see available commands."),
    }
}
