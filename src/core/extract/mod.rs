//! Extractor adapter.
//!
//! Wraps the per-format scanners and normalizes their output into
//! [`ExtractedUnit`]s: one per source file, holding the ordered
//! `(text, context)` pairs in extraction order. Scanners are pure functions of
//! the file content; the adapter adds the file path and section name.
//!
//! ## Scanners
//!
//! - `markdown`: headers, list items and paragraphs
//! - `vue`: template element text and translatable attributes
//! - `jinja`: element text and attributes outside template tags

pub mod jinja;
pub mod markdown;
pub mod vue;

use std::{collections::BTreeMap, fmt, fs, path::Path, sync::Arc};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::error::{ExtractionError, MalformedSource};

pub use jinja::JinjaScanner;
pub use markdown::MarkdownScanner;
pub use vue::VueScanner;

/// Where inside its source file a string was found.
///
/// The tag is part of the identifier, so renaming a variant changes every id
/// built from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextTag {
    Header,
    Paragraph,
    ListItem,
    Text,
    Attribute,
}

impl ContextTag {
    pub const ALL: [ContextTag; 5] = [
        ContextTag::Header,
        ContextTag::Paragraph,
        ContextTag::ListItem,
        ContextTag::Text,
        ContextTag::Attribute,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContextTag::Header => "header",
            ContextTag::Paragraph => "paragraph",
            ContextTag::ListItem => "list_item",
            ContextTag::Text => "text",
            ContextTag::Attribute => "attribute",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.as_str() == s)
    }
}

impl fmt::Display for ContextTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source file formats with a built-in scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Markdown,
    Vue,
    Jinja,
}

impl SourceFormat {
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            SourceFormat::Markdown => &["md", "markdown"],
            SourceFormat::Vue => &["vue"],
            SourceFormat::Jinja => &["html", "jinja", "jinja2", "j2"],
        }
    }

    /// Middle segment of section names for this format.
    pub fn section_kind(self) -> &'static str {
        match self {
            SourceFormat::Markdown => "content",
            SourceFormat::Vue => "vue",
            SourceFormat::Jinja => "templates",
        }
    }

    /// Value of the `type` field of catalog sections.
    pub fn catalog_type(self) -> &'static str {
        match self {
            SourceFormat::Markdown => "markdown",
            SourceFormat::Vue => "vue_component",
            SourceFormat::Jinja => "jinja_template",
        }
    }

    pub fn from_catalog_type(s: &str) -> Option<Self> {
        [SourceFormat::Markdown, SourceFormat::Vue, SourceFormat::Jinja]
            .into_iter()
            .find(|f| f.catalog_type() == s)
    }

    pub fn matches_path(self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions().contains(&ext))
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Markdown => f.write_str("markdown"),
            SourceFormat::Vue => f.write_str("vue"),
            SourceFormat::Jinja => f.write_str("jinja"),
        }
    }
}

/// One string as produced by a scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawString {
    pub text: String,
    pub context: ContextTag,
}

impl RawString {
    pub fn new(text: impl Into<String>, context: ContextTag) -> Self {
        Self {
            text: text.into(),
            context,
        }
    }
}

/// A per-format scanner.
///
/// Must return strings in the order they appear in the file, keeping
/// duplicates: two identical texts are two units.
pub trait Extract: Send + Sync {
    fn extract(&self, content: &str) -> Result<Vec<RawString>, MalformedSource>;
}

/// Maps each source format to the scanner used for it.
#[derive(Clone)]
pub struct ExtractorRegistry {
    scanners: BTreeMap<SourceFormat, Arc<dyn Extract>>,
}

impl ExtractorRegistry {
    pub fn empty() -> Self {
        Self {
            scanners: BTreeMap::new(),
        }
    }

    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(SourceFormat::Markdown, MarkdownScanner);
        registry.register(SourceFormat::Vue, VueScanner);
        registry.register(SourceFormat::Jinja, JinjaScanner);
        registry
    }

    /// Install `scanner` for `format`, replacing any previous one.
    pub fn register(&mut self, format: SourceFormat, scanner: impl Extract + 'static) {
        self.scanners.insert(format, Arc::new(scanner));
    }

    pub fn get(&self, format: SourceFormat) -> Option<&dyn Extract> {
        self.scanners.get(&format).map(|s| s.as_ref())
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("formats", &self.scanners.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A file queued for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path used to read the file.
    pub path: std::path::PathBuf,
    /// Path recorded in the catalog (relative to the project root).
    pub display_path: String,
    pub section: String,
    pub format: SourceFormat,
}

/// Normalized scanner output for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedUnit {
    pub source_file: String,
    pub section: String,
    pub format: SourceFormat,
    pub strings: Vec<RawString>,
}

#[derive(Debug, Default)]
pub struct ExtractionOutcome {
    /// Units in the same order as the input files.
    pub units: Vec<ExtractedUnit>,
    pub failures: Vec<ExtractionError>,
}

/// Build the section name for a file: `<project>/<kind>/<relative path>`.
///
/// `relative` is the path below the scan directory; its extension is dropped
/// and its components joined with `/`.
pub fn section_name(project: &str, format: SourceFormat, relative: &Path) -> String {
    let stem = relative.with_extension("");
    let parts: Vec<String> = stem
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    format!("{}/{}/{}", project, format.section_kind(), parts.join("/"))
}

pub fn extract_file(
    registry: &ExtractorRegistry,
    file: &SourceFile,
) -> Result<ExtractedUnit, ExtractionError> {
    let scanner = registry
        .get(file.format)
        .ok_or_else(|| ExtractionError::NoExtractor {
            file: file.display_path.clone(),
            format: file.format.to_string(),
        })?;

    let content = fs::read_to_string(&file.path).map_err(|source| ExtractionError::Unreadable {
        file: file.display_path.clone(),
        source,
    })?;

    let strings = scanner
        .extract(&content)
        .map_err(|e| ExtractionError::Malformed {
            file: file.display_path.clone(),
            reason: e.0,
        })?;

    debug!(file = %file.display_path, count = strings.len(), "extracted strings");

    Ok(ExtractedUnit {
        source_file: file.display_path.clone(),
        section: file.section.clone(),
        format: file.format,
        strings,
    })
}

/// Run the scanners over all files in parallel.
///
/// A failing file is logged and reported in `failures`; it never aborts the
/// others. Units come back in input order regardless of scheduling.
pub fn extract_all(registry: &ExtractorRegistry, files: &[SourceFile]) -> ExtractionOutcome {
    let results: Vec<Result<ExtractedUnit, ExtractionError>> = files
        .par_iter()
        .map(|file| extract_file(registry, file))
        .collect();

    let mut outcome = ExtractionOutcome::default();
    for result in results {
        match result {
            Ok(unit) => outcome.units.push(unit),
            Err(err) => {
                warn!(file = err.file(), error = %err, "skipping source file");
                outcome.failures.push(err);
            }
        }
    }
    outcome
}
