//! Issue types for catalog and merge runs.
//!
//! An issue is a per-item problem that does not abort the run: a file that
//! could not be extracted, a translation that went stale, a provider call
//! that failed. Each issue carries what the reporter needs to print it.

use enum_dispatch::enum_dispatch;

use crate::core::{
    error::{ConsistencyError, ExportCollisionError, IdentifierCollisionError, ProviderError},
    provider::JobKind,
};

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    ExtractionFailed,
    IdentifierCollision,
    MissingSnapshot,
    StaleTranslation,
    Unverified,
    Orphaned,
    TranslationFailed,
    Consistency,
    ExportCollision,
    Unsynced,
    ReviewRejected,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::ExtractionFailed => write!(f, "extraction-failed"),
            Rule::IdentifierCollision => write!(f, "id-collision"),
            Rule::MissingSnapshot => write!(f, "missing-snapshot"),
            Rule::StaleTranslation => write!(f, "stale-translation"),
            Rule::Unverified => write!(f, "unverified"),
            Rule::Orphaned => write!(f, "orphaned"),
            Rule::TranslationFailed => write!(f, "translation-failed"),
            Rule::Consistency => write!(f, "consistency"),
            Rule::ExportCollision => write!(f, "export-collision"),
            Rule::Unsynced => write!(f, "unsynced"),
            Rule::ReviewRejected => write!(f, "review-rejected"),
        }
    }
}

// ============================================================
// Issue Types - Extraction and Catalog
// ============================================================

/// A source file was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionFailedIssue {
    pub file: String,
    pub error: String,
}

impl ExtractionFailedIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::ExtractionFailed
    }
}

/// The catalog could not be built; nothing was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierCollisionIssue {
    pub error: IdentifierCollisionError,
}

impl IdentifierCollisionIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::IdentifierCollision
    }
}

// ============================================================
// Issue Types - Translation Stores
// ============================================================

/// The generation a store was last merged against has no snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingSnapshotIssue {
    pub language: String,
    pub version: String,
}

impl MissingSnapshotIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::MissingSnapshot
    }
}

/// Source text changed under a reviewed translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleTranslationIssue {
    pub language: String,
    pub id: String,
    pub text: String,
}

impl StaleTranslationIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::StaleTranslation
    }
}

/// Source text changed under an entry while the snapshot it was merged
/// against was missing. Handled as a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnverifiedIssue {
    pub language: String,
    pub id: String,
    pub text: String,
}

impl UnverifiedIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::Unverified
    }
}

/// An entry holding a translation lost its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanedIssue {
    pub language: String,
    pub id: String,
    pub text: String,
    pub glossary: bool,
}

impl OrphanedIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::Orphaned
    }
}

/// The provider gave up on one string; it stays without suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationFailedIssue {
    pub language: String,
    pub kind: JobKind,
    pub key: String,
    pub error: ProviderError,
}

impl TranslationFailedIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::TranslationFailed
    }
}

/// A merge batch named an unknown identifier and was rejected whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsistencyIssue {
    pub language: String,
    pub error: ConsistencyError,
    /// Items dropped with the batch.
    pub batch_size: usize,
}

impl ConsistencyIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::Consistency
    }
}

/// A review action the lifecycle refused. The store was left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRejectedIssue {
    pub language: String,
    pub id: String,
    pub reason: String,
}

impl ReviewRejectedIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::ReviewRejected
    }
}

// ============================================================
// Issue Types - Export
// ============================================================

/// Identifiers withheld from a locale file because their paths clash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportCollisionIssue {
    pub language: String,
    pub file: String,
    pub error: ExportCollisionError,
}

impl ExportCollisionIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::ExportCollision
    }
}

/// Translations left out of a locale file until the store is synced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsyncedIssue {
    pub language: String,
    pub ids: Vec<String>,
}

impl UnsyncedIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::Unsynced
    }
}

// ============================================================
// Issue Enum
// ============================================================

#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    ExtractionFailed(ExtractionFailedIssue),
    IdentifierCollision(IdentifierCollisionIssue),
    MissingSnapshot(MissingSnapshotIssue),
    StaleTranslation(StaleTranslationIssue),
    Unverified(UnverifiedIssue),
    Orphaned(OrphanedIssue),
    TranslationFailed(TranslationFailedIssue),
    Consistency(ConsistencyIssue),
    ReviewRejected(ReviewRejectedIssue),
    ExportCollision(ExportCollisionIssue),
    Unsynced(UnsyncedIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        self.report_severity()
    }

    pub fn rule(&self) -> Rule {
        self.report_rule()
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Where an issue points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReportLocation<'a> {
    /// A source or output file.
    File { path: &'a str },
    /// An entry of one language store.
    Entry { language: &'a str, key: &'a str },
    /// A whole language store.
    Store { language: &'a str },
    /// The catalog being built.
    Catalog,
}

impl std::fmt::Display for ReportLocation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportLocation::File { path } => write!(f, "{path}"),
            ReportLocation::Entry { language, key } => write!(f, "{language}:{key}"),
            ReportLocation::Store { language } => write!(f, "{language}"),
            ReportLocation::Catalog => write!(f, "catalog"),
        }
    }
}

/// Implemented by all issue types, dispatched through [`Issue`].
#[enum_dispatch]
pub trait Report {
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display.
    fn message(&self) -> String;

    fn report_severity(&self) -> Severity;

    fn report_rule(&self) -> Rule;

    /// Optional hint for fixing the issue.
    fn hint(&self) -> Option<&str> {
        None
    }

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for ExtractionFailedIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File { path: &self.file }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<&str> {
        Some("strings of this file are missing from the catalog")
    }
}

impl Report for IdentifierCollisionIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Catalog
    }

    fn message(&self) -> String {
        self.error.to_string()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<&str> {
        Some("the catalog was not written")
    }
}

impl Report for MissingSnapshotIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Store {
            language: &self.language,
        }
    }

    fn message(&self) -> String {
        format!("no snapshot for catalog version {}", self.version)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some("source changes since that version are reported as unverified".to_string())
    }
}

impl Report for StaleTranslationIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Entry {
            language: &self.language,
            key: &self.id,
        }
    }

    fn message(&self) -> String {
        "source text changed, translation needs review".to_string()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        (!self.text.is_empty()).then(|| format!("kept (\"{}\")", self.text))
    }
}

impl Report for UnverifiedIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Entry {
            language: &self.language,
            key: &self.id,
        }
    }

    fn message(&self) -> String {
        "source text differs from the text this entry was merged against".to_string()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<&str> {
        Some("check the translation against the current source text")
    }

    fn details(&self) -> Option<String> {
        (!self.text.is_empty())
            .then(|| format!("kept (\"{}\"), status reset to needs_review", self.text))
    }
}

impl Report for OrphanedIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Entry {
            language: &self.language,
            key: &self.id,
        }
    }

    fn message(&self) -> String {
        if self.glossary {
            "glossary term removed from the definition".to_string()
        } else {
            "identifier no longer in the catalog".to_string()
        }
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("kept (\"{}\")", self.text))
    }
}

impl Report for TranslationFailedIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Entry {
            language: &self.language,
            key: &self.key,
        }
    }

    fn message(&self) -> String {
        self.error.to_string()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("{} left without suggestion", self.kind.as_str()))
    }
}

impl Report for ConsistencyIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Store {
            language: &self.language,
        }
    }

    fn message(&self) -> String {
        self.error.to_string()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("batch of {} suggestion(s) rejected", self.batch_size))
    }
}

impl Report for ReviewRejectedIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Entry {
            language: &self.language,
            key: &self.id,
        }
    }

    fn message(&self) -> String {
        self.reason.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

impl Report for ExportCollisionIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File { path: &self.file }
    }

    fn message(&self) -> String {
        self.error.to_string()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<&str> {
        Some("these identifiers were withheld from the locale file")
    }
}

impl Report for UnsyncedIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Store {
            language: &self.language,
        }
    }

    fn message(&self) -> String {
        format!(
            "{} translation(s) made for an older source text were not exported",
            self.ids.len()
        )
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<&str> {
        Some("run `transcat sync` to flag them for review")
    }
}

// ============================================================
// Ordering for Issue (for sorting in reports)
// ============================================================

impl Ord for Issue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.location()
            .cmp(&other.location())
            .then_with(|| self.rule().cmp(&other.rule()))
            .then_with(|| self.message().cmp(&other.message()))
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================
// Tests
// ============================================================
