//! Merge engine.
//!
//! Applies diff outcomes, machine suggestions and human review actions to a
//! set of translation entries. The same rules drive catalog strings and
//! glossary terms.
//!
//! Precedence, from the engine's point of view:
//!
//! - automated merges never touch a non-empty `text`;
//! - automated merges only ever set `needs_review`, and only on entries that
//!   are `untranslated` or already `needs_review`;
//! - the one automated move away from a human status is the downgrade to
//!   `needs_review` when the diff reports the source text as `changed`;
//! - a removed id orphans its entry; nothing is ever deleted.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use super::entry::{Status, TranslationEntry};
use crate::core::{
    catalog::Catalog,
    diff::CatalogDiff,
    error::{ConsistencyError, TransitionError},
};

/// Entries keyed by identifier (or glossary term).
pub type EntryMap = BTreeMap<String, TranslationEntry>;

/// Identifiers a merge is allowed to reference.
///
/// Covers the current catalog generation and the one the store was last
/// merged against; older snapshots are not consulted. Orphaned entries are
/// always accepted even when their id is in neither. Fingerprints of the
/// current generation are kept so reviewed entries can be stamped with the
/// text they were reviewed against.
#[derive(Debug, Clone, Default)]
pub struct KnownIds {
    ids: HashSet<String>,
    fingerprints: HashMap<String, String>,
}

impl KnownIds {
    pub fn for_generation<'a>(
        current: &Catalog,
        older: impl IntoIterator<Item = &'a Catalog>,
    ) -> Self {
        let fingerprints: HashMap<String, String> = current
            .records()
            .map(|(_, r)| (r.id.clone(), r.hash.clone()))
            .collect();
        let mut ids: HashSet<String> = fingerprints.keys().cloned().collect();
        for catalog in older {
            ids.extend(catalog.records().map(|(_, r)| r.id.clone()));
        }
        Self { ids, fingerprints }
    }

    /// Keys with their current fingerprints.
    pub fn from_fingerprints<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, String)>,
        S: Into<String>,
    {
        let fingerprints: HashMap<String, String> =
            pairs.into_iter().map(|(k, h)| (k.into(), h)).collect();
        Self {
            ids: fingerprints.keys().cloned().collect(),
            fingerprints,
        }
    }

    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: keys.into_iter().map(Into::into).collect(),
            fingerprints: HashMap::new(),
        }
    }

    pub fn fingerprint(&self, id: &str) -> Option<&str> {
        self.fingerprints.get(id).map(String::as_str)
    }

    /// Record that `entry` now matches the current text of `id`.
    fn stamp(&self, id: &str, entry: &mut TranslationEntry) {
        if let Some(hash) = self.fingerprints.get(id) {
            entry.source_hash = Some(hash.clone());
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    fn admits(&self, entries: &EntryMap, id: &str) -> bool {
        self.contains(id) || entries.get(id).is_some_and(|e| e.orphaned)
    }

    fn check(
        &self,
        entries: &EntryMap,
        id: &str,
        operation: &'static str,
    ) -> Result<(), ConsistencyError> {
        if self.admits(entries, id) {
            Ok(())
        } else {
            Err(ConsistencyError {
                id: id.to_string(),
                operation,
            })
        }
    }
}

/// What `apply_diff` did, id by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub created: Vec<String>,
    /// Human status dropped to `needs_review` after a source change.
    pub downgraded: Vec<String>,
    /// Suggestion kept but flagged as made for older text.
    pub stale_suggestions: Vec<String>,
    pub orphaned: Vec<String>,
    /// Orphans whose id came back.
    pub restored: Vec<String>,
    /// Entries last merged against a different text that the diff did not
    /// report as changed (previous generation missing). Handled as changed.
    pub unverified: Vec<String>,
}

impl MergeReport {
    pub fn is_noop(&self) -> bool {
        self.created.is_empty()
            && self.downgraded.is_empty()
            && self.stale_suggestions.is_empty()
            && self.orphaned.is_empty()
            && self.restored.is_empty()
    }
}

/// Apply a diff to `entries`.
///
/// `current` maps every id of the current generation to its fingerprint. Any
/// entry whose id is not in `current` ends up orphaned, even if the diff does
/// not list it as removed. An entry whose recorded fingerprint differs from
/// the current one is handled as changed, whatever the diff says.
pub fn apply_diff(
    entries: &mut EntryMap,
    diff: &CatalogDiff,
    current: &HashMap<String, String>,
) -> MergeReport {
    let mut report = MergeReport::default();

    for id in diff.added.iter().chain(&diff.unchanged) {
        let Some(hash) = current.get(id) else { continue };
        match entries.get_mut(id) {
            None => {
                entries.insert(id.clone(), TranslationEntry::untranslated(Some(hash.clone())));
                report.created.push(id.clone());
            }
            Some(entry) if entry.orphaned => {
                entry.orphaned = false;
                report.restored.push(id.clone());
                if entry.source_hash.as_ref().is_some_and(|h| h != hash) {
                    mark_changed(id, entry, &mut report);
                }
                entry.source_hash = Some(hash.clone());
            }
            Some(entry) => {
                if entry.source_hash.as_ref().is_some_and(|h| h != hash) {
                    report.unverified.push(id.clone());
                    mark_changed(id, entry, &mut report);
                }
                entry.source_hash = Some(hash.clone());
            }
        }
    }

    for id in &diff.changed {
        let Some(hash) = current.get(id) else { continue };
        match entries.get_mut(id) {
            None => {
                entries.insert(id.clone(), TranslationEntry::untranslated(Some(hash.clone())));
                report.created.push(id.clone());
            }
            Some(entry) => {
                if entry.orphaned {
                    entry.orphaned = false;
                    report.restored.push(id.clone());
                }
                mark_changed(id, entry, &mut report);
                entry.source_hash = Some(hash.clone());
            }
        }
    }

    for (id, entry) in entries.iter_mut() {
        if !entry.orphaned && !current.contains_key(id) {
            entry.orphaned = true;
            report.orphaned.push(id.clone());
        }
    }

    debug!(
        created = report.created.len(),
        downgraded = report.downgraded.len(),
        orphaned = report.orphaned.len(),
        restored = report.restored.len(),
        "applied diff"
    );
    report
}

fn mark_changed(id: &str, entry: &mut TranslationEntry, report: &mut MergeReport) {
    if entry.status.is_human() {
        entry.status = Status::NeedsReview;
        report.downgraded.push(id.to_string());
    }
    if entry.ai_suggestion.is_some() && !entry.suggestion_stale {
        entry.suggestion_stale = true;
        report.stale_suggestions.push(id.to_string());
    }
}

/// How a machine suggestion landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionOutcome {
    /// Entry had no text; it now awaits review of the suggestion.
    NeedsReview,
    /// Only `ai_suggestion` changed; text and status kept.
    SuggestionOnly,
}

pub fn apply_suggestion(
    entries: &mut EntryMap,
    known: &KnownIds,
    id: &str,
    suggestion: String,
) -> Result<SuggestionOutcome, ConsistencyError> {
    known.check(entries, id, "machine suggestion")?;
    Ok(set_suggestion(entries, id, suggestion))
}

fn set_suggestion(entries: &mut EntryMap, id: &str, suggestion: String) -> SuggestionOutcome {
    let entry = entries
        .entry(id.to_string())
        .or_insert_with(|| TranslationEntry::untranslated(None));
    entry.ai_suggestion = Some(suggestion);
    entry.suggestion_stale = false;

    if !entry.has_text() && entry.status <= Status::NeedsReview {
        entry.status = Status::NeedsReview;
        SuggestionOutcome::NeedsReview
    } else {
        SuggestionOutcome::SuggestionOnly
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub needs_review: usize,
    pub suggestion_only: usize,
}

/// Merge a batch of suggestions, all or nothing.
///
/// Every id is checked before anything is written; one unknown id rejects the
/// whole batch and leaves `entries` as it was.
pub fn merge_suggestions(
    entries: &mut EntryMap,
    known: &KnownIds,
    batch: Vec<(String, String)>,
) -> Result<BatchOutcome, ConsistencyError> {
    for (id, _) in &batch {
        known.check(entries, id, "machine suggestion batch")?;
    }

    let mut outcome = BatchOutcome::default();
    for (id, suggestion) in batch {
        match set_suggestion(entries, &id, suggestion) {
            SuggestionOutcome::NeedsReview => outcome.needs_review += 1,
            SuggestionOutcome::SuggestionOnly => outcome.suggestion_only += 1,
        }
    }
    Ok(outcome)
}

// ============================================================
// Human review actions
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Status,
    pub to: Status,
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

fn entry_for_review<'a>(
    entries: &'a mut EntryMap,
    known: &KnownIds,
    id: &str,
    operation: &'static str,
) -> Result<&'a mut TranslationEntry, ConsistencyError> {
    known.check(entries, id, operation)?;
    Ok(entries
        .entry(id.to_string())
        .or_insert_with(|| TranslationEntry::untranslated(None)))
}

/// Move an entry to `target` on behalf of a reviewer.
///
/// Only forward moves are accepted, and `approved` must be reached through
/// `draft` or `submitted`. `force` lifts both rules (and allows setting the
/// engine statuses); a human status always needs non-empty text.
pub fn set_status(
    entries: &mut EntryMap,
    known: &KnownIds,
    id: &str,
    target: Status,
    force: bool,
) -> Result<Transition, TransitionError> {
    let entry = entry_for_review(entries, known, id, "status change")?;
    let from = entry.status;
    let transition = Transition { from, to: target };
    if transition.is_noop() {
        known.stamp(id, entry);
        return Ok(transition);
    }

    let err_id = || id.to_string();
    if !target.is_human() && !force {
        return Err(TransitionError::NotHumanStatus { id: err_id(), to: target });
    }
    if target < from && !force {
        return Err(TransitionError::Backward {
            id: err_id(),
            from,
            to: target,
        });
    }
    if target == Status::Approved && from < Status::Draft && !force {
        return Err(TransitionError::Skip {
            id: err_id(),
            from,
            to: target,
        });
    }
    if target.is_human() && !entry.has_text() {
        return Err(TransitionError::EmptyText { id: err_id(), to: target });
    }

    entry.status = target;
    known.stamp(id, entry);
    Ok(transition)
}

/// Store a translator's text. Entries below `draft` become `draft`.
pub fn edit_text(
    entries: &mut EntryMap,
    known: &KnownIds,
    id: &str,
    text: String,
) -> Result<Transition, TransitionError> {
    let entry = entry_for_review(entries, known, id, "text edit")?;
    let from = entry.status;
    if text.is_empty() && from.is_human() {
        return Err(TransitionError::EmptyText {
            id: id.to_string(),
            to: from,
        });
    }

    entry.text = text;
    if entry.has_text() && from < Status::Draft {
        entry.status = Status::Draft;
    }
    known.stamp(id, entry);
    Ok(Transition {
        from,
        to: entry.status,
    })
}

/// Copy the machine suggestion into `text` as a draft.
pub fn accept_suggestion(
    entries: &mut EntryMap,
    known: &KnownIds,
    id: &str,
) -> Result<Transition, TransitionError> {
    let suggestion = entries
        .get(id)
        .and_then(|e| e.ai_suggestion.clone())
        .filter(|s| !s.is_empty());
    let Some(suggestion) = suggestion else {
        known.check(entries, id, "accept suggestion")?;
        return Err(TransitionError::NoSuggestion { id: id.to_string() });
    };
    edit_text(entries, known, id, suggestion)
}
