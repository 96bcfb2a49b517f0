//! Glossary: project terms that must be translated consistently.
//!
//! The definition file lists terms by category. Curation scans the catalog
//! for those terms so translators can see how often and where each one is
//! used. Term translations live in each language store under `glossary` and
//! follow the same merge rules as catalog strings, keyed by the term itself.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    path::Path,
};

use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    core::{
        catalog::{Catalog, fingerprint},
        diff::diff_fingerprints,
        error::StoreError,
        persist::read_json_optional,
        store::{EntryMap, KnownIds, MergeReport, merge::apply_diff},
    },
    utils::truncate_chars,
};

pub const GLOSSARY_CURATION_FILE_NAME: &str = "glossary-curation.json";

const MAX_EXAMPLES: usize = 3;
const EXAMPLE_CHARS: usize = 120;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryDefinition {
    #[serde(default)]
    pub categories: BTreeMap<String, GlossaryCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryCategory {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub terms: Vec<GlossaryTerm>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryTerm {
    pub en: String,
}

impl GlossaryDefinition {
    /// `None` when the project has no glossary file.
    pub fn load_optional(path: &Path) -> Result<Option<Self>, StoreError> {
        read_json_optional(path)
    }

    /// Every distinct term with its category id, in definition order.
    ///
    /// A term listed in two categories is kept under the first one.
    pub fn terms(&self) -> Vec<(&str, &str)> {
        let mut seen = HashSet::new();
        let mut terms = Vec::new();
        for (category_id, category) in &self.categories {
            for term in &category.terms {
                let term = term.en.trim();
                if !term.is_empty() && seen.insert(term.to_lowercase()) {
                    terms.push((category_id.as_str(), term));
                }
            }
        }
        terms
    }

    pub fn known_terms(&self) -> KnownIds {
        KnownIds::from_fingerprints(
            self.terms()
                .into_iter()
                .map(|(_, term)| (term, fingerprint(term))),
        )
    }
}

/// Bring a store's glossary entries in line with the definition.
///
/// Terms are their own identifiers, so a term can only be added or removed;
/// removed terms are orphaned like removed catalog strings.
pub fn sync_glossary(entries: &mut EntryMap, definition: &GlossaryDefinition) -> MergeReport {
    let current: Vec<(String, String)> = definition
        .terms()
        .into_iter()
        .map(|(_, term)| (term.to_string(), fingerprint(term)))
        .collect();
    let previous: Vec<(String, String)> = entries
        .iter()
        .filter(|(_, e)| !e.orphaned)
        .map(|(term, e)| {
            let hash = e.source_hash.clone().unwrap_or_else(|| fingerprint(term));
            (term.clone(), hash)
        })
        .collect();

    let hashes: HashMap<String, String> = current.iter().cloned().collect();
    let diff = diff_fingerprints(Some(previous), current);
    apply_diff(entries, &diff, &hashes)
}

// ============================================================
// Curation
// ============================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurationReport {
    pub generated_at: DateTime<Utc>,
    pub catalog_version: String,
    pub total_terms: usize,
    pub category_notes: BTreeMap<String, String>,
    pub terms: Vec<TermUsage>,
    /// Defined terms that appear nowhere in the catalog.
    pub unused_terms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermUsage {
    pub term: String,
    pub category: String,
    pub category_name: String,
    pub occurrences: usize,
    pub section_count: usize,
    pub examples: Vec<TermExample>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermExample {
    pub text: String,
    pub source: String,
    #[serde(rename = "type")]
    pub source_type: String,
}

/// Case-insensitive, whole-word matcher over all glossary terms.
#[derive(Debug)]
pub struct TermMatcher {
    regex: Option<Regex>,
    canonical: HashMap<String, (String, String)>,
}

impl TermMatcher {
    pub fn new(definition: &GlossaryDefinition) -> Result<Self, regex::Error> {
        let mut terms = definition.terms();
        let canonical = terms
            .iter()
            .map(|(category, term)| (term.to_lowercase(), (term.to_string(), category.to_string())))
            .collect();

        // Longest first so "Hero Gear" wins over "Hero".
        terms.sort_by(|a, b| b.1.chars().count().cmp(&a.1.chars().count()).then(a.1.cmp(b.1)));
        let regex = if terms.is_empty() {
            None
        } else {
            let alternation = terms
                .iter()
                .map(|(_, t)| regex::escape(t))
                .collect::<Vec<_>>()
                .join("|");
            Some(
                RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
                    .case_insensitive(true)
                    .build()?,
            )
        };

        Ok(Self { regex, canonical })
    }

    /// Canonical spelling and category of each term found in `text`.
    pub fn find<'a>(&'a self, text: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.regex
            .iter()
            .flat_map(move |re| re.find_iter(text))
            .filter_map(move |m| self.canonical.get(&m.as_str().to_lowercase()))
            .map(|(term, category)| (term.as_str(), category.as_str()))
    }
}

#[derive(Default)]
struct Tally {
    occurrences: usize,
    sections: HashSet<String>,
    examples: Vec<TermExample>,
}

pub fn curate(
    definition: &GlossaryDefinition,
    catalog: &Catalog,
    generated_at: DateTime<Utc>,
) -> Result<CurationReport, regex::Error> {
    let matcher = TermMatcher::new(definition)?;
    let mut tallies: HashMap<(String, String), Tally> = HashMap::new();

    for (section_name, section) in &catalog.sections {
        for record in &section.strings {
            for (term, category) in matcher.find(&record.source_text) {
                let tally = tallies
                    .entry((term.to_string(), category.to_string()))
                    .or_default();
                tally.occurrences += 1;
                tally.sections.insert(section_name.clone());

                let text = truncate_chars(&record.source_text, EXAMPLE_CHARS);
                if tally.examples.len() < MAX_EXAMPLES
                    && !tally.examples.iter().any(|e| e.text == text)
                {
                    tally.examples.push(TermExample {
                        text,
                        source: section.source_file.clone(),
                        source_type: section.format.section_kind().to_string(),
                    });
                }
            }
        }
    }

    let mut terms: Vec<TermUsage> = tallies
        .into_iter()
        .map(|((term, category), tally)| TermUsage {
            category_name: definition
                .categories
                .get(&category)
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            term,
            category,
            occurrences: tally.occurrences,
            section_count: tally.sections.len(),
            examples: tally.examples,
        })
        .collect();
    terms.sort_by(|a, b| b.occurrences.cmp(&a.occurrences).then_with(|| a.term.cmp(&b.term)));

    let found: HashSet<&str> = terms.iter().map(|t| t.term.as_str()).collect();
    let unused_terms = definition
        .terms()
        .into_iter()
        .map(|(_, t)| t)
        .filter(|t| !found.contains(t))
        .map(str::to_string)
        .collect();

    debug!(found = terms.len(), "glossary curation done");
    Ok(CurationReport {
        generated_at,
        catalog_version: catalog.meta.version.clone(),
        total_terms: terms.len(),
        category_notes: definition
            .categories
            .iter()
            .filter_map(|(id, c)| c.note.clone().map(|n| (id.clone(), n)))
            .collect(),
        terms,
        unused_terms,
    })
}
