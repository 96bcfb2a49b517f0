//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `init`: write a default `.transcatrc.json`
//! - `extract`: build the catalog from source files and snapshot it
//! - `diff`: compare a snapshot with the current catalog
//! - `sync`: merge the current catalog into translation stores
//! - `translate`: sync, then fetch machine suggestions
//! - `export`: write locale files
//! - `status`: per-language progress
//! - `review`: apply a reviewer action to one entry
//! - `glossary`: write the glossary curation report

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::core::store::Status;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        self.common().is_some_and(|c| c.verbose)
    }

    pub fn common(&self) -> Option<&CommonArgs> {
        match &self.command {
            Some(Command::Extract(cmd)) => Some(&cmd.common),
            Some(Command::Diff(cmd)) => Some(&cmd.common),
            Some(Command::Sync(cmd)) => Some(&cmd.common),
            Some(Command::Translate(cmd)) => Some(&cmd.common),
            Some(Command::Export(cmd)) => Some(&cmd.common),
            Some(Command::Status(cmd)) => Some(&cmd.common),
            Some(Command::Review(cmd)) => Some(&cmd.common),
            Some(Command::Glossary(cmd)) => Some(&cmd.common),
            Some(Command::Init) | None => None,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Directory to start looking for the config file from
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Data directory (overrides config file)
    #[arg(long)]
    pub data_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Languages to work on.
#[derive(Debug, Clone, Default, Args)]
pub struct LanguageArgs {
    /// Language code (default: all configured languages).
    /// Can be specified multiple times: --lang ko --lang es
    #[arg(short, long = "lang")]
    pub languages: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Build and diff the catalog without writing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct DiffCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Snapshot version to compare from (default: the one before the current catalog)
    #[arg(long)]
    pub from: Option<String>,

    /// List every identifier instead of the first few per bucket
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct SyncCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub languages: LanguageArgs,
}

#[derive(Debug, Args)]
pub struct TranslateCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub languages: LanguageArgs,

    /// Also request entries that already have a current suggestion
    #[arg(long)]
    pub force: bool,

    /// Stop after this many provider requests per language
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ExportCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub languages: LanguageArgs,

    /// Lowest status to export (overrides config file)
    #[arg(long, value_enum)]
    pub threshold: Option<Status>,

    /// Only export this project
    #[arg(long)]
    pub project: Option<String>,

    /// Report what would be exported without writing files
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct StatusCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub languages: LanguageArgs,
}

#[derive(Debug, Subcommand)]
pub enum ReviewAction {
    /// Store a translation; entries below draft become draft
    Edit { id: String, text: String },
    /// Copy the machine suggestion into the translation as a draft
    Accept { id: String },
    /// Move an entry to another status
    SetStatus {
        id: String,
        #[arg(value_enum)]
        status: Status,
        /// Allow backward moves and skipping draft/submitted
        #[arg(long)]
        force: bool,
    },
}

impl ReviewAction {
    pub fn id(&self) -> &str {
        match self {
            ReviewAction::Edit { id, .. }
            | ReviewAction::Accept { id }
            | ReviewAction::SetStatus { id, .. } => id,
        }
    }
}

#[derive(Debug, Args)]
pub struct ReviewCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Language of the store to change
    #[arg(short, long = "lang")]
    pub language: String,

    /// The id is a glossary term
    #[arg(long)]
    pub glossary: bool,

    #[command(subcommand)]
    pub action: ReviewAction,
}

#[derive(Debug, Args)]
pub struct GlossaryCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Initialize a new .transcatrc.json configuration file
    Init,
    /// Extract strings from source files into the catalog
    Extract(ExtractCommand),
    /// Compare a catalog snapshot with the current catalog
    Diff(DiffCommand),
    /// Merge the current catalog into translation stores
    Sync(SyncCommand),
    /// Fetch machine translation suggestions
    Translate(TranslateCommand),
    /// Write locale files for the runtime
    Export(ExportCommand),
    /// Show translation progress per language
    Status(StatusCommand),
    /// Edit, accept or change the status of one translation
    Review(ReviewCommand),
    /// Report glossary term usage across the catalog
    Glossary(GlossaryCommand),
}
