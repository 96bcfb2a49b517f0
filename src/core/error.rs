//! Error taxonomy for the catalog/merge engine.
//!
//! Each error carries enough context (identifier, section, file, conflicting
//! values) for an operator to act on it. Which of them abort a run and which
//! are isolated per item is decided by the caller:
//!
//! - `ExtractionError`: one file skipped, run continues.
//! - `IdentifierCollisionError`: catalog build aborted, nothing persisted.
//! - `ProviderError`: one string left without suggestion.
//! - `ConsistencyError`: one merge batch rejected.
//! - `ExportCollisionError`: one export path withheld.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::store::Status;

/// A source file could not be turned into strings.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("cannot read {file}: {source}")]
    Unreadable {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed source {file}: {reason}")]
    Malformed { file: String, reason: String },
    #[error("no extractor registered for {file} ({format})")]
    NoExtractor { file: String, format: String },
}

impl ExtractionError {
    pub fn file(&self) -> &str {
        match self {
            ExtractionError::Unreadable { file, .. }
            | ExtractionError::Malformed { file, .. }
            | ExtractionError::NoExtractor { file, .. } => file,
        }
    }
}

/// Raised by a scanner for input it cannot make sense of.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct MalformedSource(pub String);

/// Two units of one catalog generation would share an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierCollisionError {
    #[error(
        "identifier '{id}' assigned twice: \"{first_text}\" (section {first_section}) and \"{second_text}\" (section {second_section})"
    )]
    Identifier {
        id: String,
        first_section: String,
        first_text: String,
        second_section: String,
        second_text: String,
    },
    #[error("section '{section}' produced by both {first_file} and {second_file}")]
    Section {
        section: String,
        first_file: String,
        second_file: String,
    },
}

/// Failure reported by a machine translation provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Worth retrying: rate limit, server error, network hiccup.
    #[error("transient provider failure: {0}")]
    Transient(String),
    /// Retrying will not help: rejected request, unusable response.
    #[error("permanent provider failure: {0}")]
    Permanent(String),
}

impl ProviderError {
    pub fn is_transient(&self) -> bool {
        matches!(self, ProviderError::Transient(_))
    }
}

/// A merge referenced an identifier unknown to every catalog generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("identifier '{id}' is not in any known catalog generation ({operation})")]
pub struct ConsistencyError {
    pub id: String,
    pub operation: &'static str,
}

/// Several identifiers simplify to the same export path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("export path '{path}' claimed by {}", ids.join(", "))]
pub struct ExportCollisionError {
    pub path: String,
    pub ids: Vec<String>,
}

/// A human status change that the lifecycle does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error(transparent)]
    Unknown(#[from] ConsistencyError),
    #[error("'{id}': cannot move from {from} back to {to} (use force to override)")]
    Backward { id: String, from: Status, to: Status },
    #[error("'{id}': cannot jump from {from} to {to} without draft or submitted (use force to override)")]
    Skip { id: String, from: Status, to: Status },
    #[error("'{id}': {to} needs a non-empty translation")]
    EmptyText { id: String, to: Status },
    #[error("'{id}': {to} can only be set by the merge engine")]
    NotHumanStatus { id: String, to: Status },
    #[error("'{id}': no machine suggestion to accept")]
    NoSuggestion { id: String },
}

/// Loading or persisting a translation store failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("timed out after {waited_secs}s waiting for lock {}", path.display())]
    LockTimeout { path: PathBuf, waited_secs: u64 },
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StoreError::Json {
            path: path.into(),
            source,
        }
    }
}
