//! Bring one language store up to date with the current catalog.
//!
//! Each store remembers the catalog generation it was last merged against
//! (`_meta.catalogVersion`). Syncing diffs that generation's snapshot with
//! the current catalog and hands the result to the merge engine. When the
//! snapshot is gone the diff has no previous side; the orphan sweep still
//! orphans removed ids and entries whose recorded fingerprint no longer
//! matches are handled as changed (`unverified`).

use std::{collections::HashMap, path::Path};

use tracing::{info, warn};

use crate::core::{
    catalog::{Catalog, load_snapshot},
    diff::{CatalogDiff, diff_catalogs},
    error::StoreError,
    glossary::{GlossaryDefinition, sync_glossary},
    store::{KnownIds, MergeReport, TranslationStore, merge::apply_diff},
};

#[derive(Debug)]
pub struct SyncOutcome {
    pub diff: CatalogDiff,
    pub report: MergeReport,
    pub glossary_report: Option<MergeReport>,
    /// Generation the store was merged against before this sync.
    pub previous_version: Option<String>,
    /// `previous_version` was set but its snapshot could not be found.
    pub previous_missing: bool,
    /// Ids of the current and last merged generations; what merges may reference.
    pub known: KnownIds,
}

pub fn sync_store(
    store: &mut TranslationStore,
    current: &Catalog,
    snapshot_dir: &Path,
    glossary: Option<&GlossaryDefinition>,
) -> Result<SyncOutcome, StoreError> {
    let previous_version = store.meta.catalog_version.clone();
    let previous = match &previous_version {
        Some(v) if *v == current.meta.version => None,
        Some(v) => load_snapshot(snapshot_dir, v)?,
        None => None,
    };
    let same_generation = previous_version.as_deref() == Some(current.meta.version.as_str());
    let previous_missing = previous_version.is_some() && !same_generation && previous.is_none();
    if previous_missing {
        warn!(
            language = %store.meta.code,
            version = previous_version.as_deref().unwrap_or_default(),
            "snapshot of last merged generation is missing; diffing without it"
        );
    }

    let previous_ref = if same_generation { Some(current) } else { previous.as_ref() };
    let diff = diff_catalogs(previous_ref, current);
    let hashes: HashMap<String, String> = current
        .records()
        .map(|(_, r)| (r.id.clone(), r.hash.clone()))
        .collect();
    let report = apply_diff(&mut store.entries, &diff, &hashes);

    let glossary_report = glossary.map(|g| sync_glossary(&mut store.glossary, g));
    store.meta.catalog_version = Some(current.meta.version.clone());

    let known = KnownIds::for_generation(current, previous.as_ref());
    info!(
        language = %store.meta.code,
        added = diff.added.len(),
        changed = diff.changed.len(),
        removed = diff.removed.len(),
        downgraded = report.downgraded.len(),
        "synced store"
    );

    Ok(SyncOutcome {
        diff,
        report,
        glossary_report,
        previous_version,
        previous_missing,
        known,
    })
}
