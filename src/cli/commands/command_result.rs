use std::path::PathBuf;

use crate::{
    core::{
        diff::CatalogDiff,
        store::{MergeReport, Status, StatusCounts},
    },
    issues::Issue,
};

#[derive(Debug)]
pub enum CommandSummary {
    Init(InitSummary),
    Extract(ExtractSummary),
    Diff(DiffSummary),
    Sync(Vec<LanguageSync>),
    Translate(Vec<LanguageTranslate>),
    Export(ExportSummary),
    Status(StatusSummary),
    Review(ReviewSummary),
    Glossary(GlossarySummary),
}

#[derive(Debug)]
pub struct InitSummary {
    pub path: PathBuf,
    /// Set when the config file was not written.
    pub error: Option<String>,
}

/// Counts of a catalog diff, with the ids behind them.
#[derive(Debug, Default)]
pub struct DiffCounts {
    pub added: Vec<String>,
    pub changed: Vec<String>,
    pub removed: Vec<String>,
    pub unchanged: usize,
}

impl From<CatalogDiff> for DiffCounts {
    fn from(diff: CatalogDiff) -> Self {
        Self {
            unchanged: diff.unchanged.len(),
            added: diff.added,
            changed: diff.changed,
            removed: diff.removed,
        }
    }
}

#[derive(Debug)]
pub struct ExtractSummary {
    pub files: usize,
    pub failed_files: usize,
    pub skipped_paths: usize,
    pub sections: usize,
    pub strings: usize,
    pub chars: usize,
    pub version: String,
    /// Version of the catalog this run replaced.
    pub previous_version: Option<String>,
    pub diff: DiffCounts,
    pub catalog_path: PathBuf,
    pub is_dry_run: bool,
    /// Collision aborted the build; nothing was written.
    pub aborted: bool,
}

#[derive(Debug)]
pub struct DiffSummary {
    pub from: Option<String>,
    pub to: String,
    pub diff: DiffCounts,
    pub list_all: bool,
}

#[derive(Debug)]
pub struct LanguageSync {
    pub language: String,
    pub previous_version: Option<String>,
    pub version: String,
    pub report: MergeReport,
    pub glossary_report: Option<MergeReport>,
}

#[derive(Debug)]
pub struct LanguageTranslate {
    pub language: String,
    pub requested: usize,
    pub needs_review: usize,
    pub suggestion_only: usize,
    pub failed: usize,
    /// Jobs left for a later run because of `--limit`.
    pub deferred: usize,
}

#[derive(Debug)]
pub struct ExportedFile {
    pub language: String,
    pub project: String,
    pub nested: PathBuf,
    pub exported: usize,
    pub withheld: usize,
}

#[derive(Debug)]
pub struct ExportSummary {
    pub threshold: Status,
    pub files: Vec<ExportedFile>,
    pub is_dry_run: bool,
}

#[derive(Debug)]
pub struct LanguageStatus {
    pub language: String,
    pub name: String,
    pub counts: StatusCounts,
    pub glossary: StatusCounts,
    /// Catalog strings without an entry yet.
    pub unsynced: usize,
    /// Store merged against an older catalog generation.
    pub behind: bool,
}

#[derive(Debug)]
pub struct StatusSummary {
    pub catalog_version: Option<String>,
    pub catalog_strings: usize,
    pub threshold: Status,
    pub languages: Vec<LanguageStatus>,
}

#[derive(Debug)]
pub struct ReviewSummary {
    pub language: String,
    pub id: String,
    pub from: Status,
    pub to: Status,
    /// Rejected actions leave the store untouched.
    pub applied: bool,
}

#[derive(Debug)]
pub struct GlossarySummary {
    pub path: PathBuf,
    pub total_terms: usize,
    /// Most used terms first, as (term, occurrences).
    pub top_terms: Vec<(String, usize)>,
    pub unused_terms: Vec<String>,
}

/// Result of running transcat commands
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// If true, exit code 1 should be returned when error_count > 0.
    pub exit_on_errors: bool,
    /// Per-item problems, sorted.
    pub issues: Vec<Issue>,
}
