//! Diff engine: classifies identifiers between two catalog generations.

use std::collections::HashMap;

use crate::core::catalog::Catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffKind {
    Added,
    Removed,
    Changed,
    Unchanged,
}

/// Every identifier present in either generation, in exactly one bucket.
///
/// `added`, `changed` and `unchanged` follow current catalog order; `removed`
/// follows previous catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<String>,
    pub unchanged: Vec<String>,
    kinds: HashMap<String, DiffKind>,
}

impl CatalogDiff {
    pub fn kind(&self, id: &str) -> Option<DiffKind> {
        self.kinds.get(id).copied()
    }

    /// True when the two generations hold the same ids with the same texts.
    pub fn is_clean(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    fn push(&mut self, id: &str, kind: DiffKind) {
        let bucket = match kind {
            DiffKind::Added => &mut self.added,
            DiffKind::Removed => &mut self.removed,
            DiffKind::Changed => &mut self.changed,
            DiffKind::Unchanged => &mut self.unchanged,
        };
        bucket.push(id.to_string());
        self.kinds.insert(id.to_string(), kind);
    }
}

/// Compare `previous` (absent on the first run) with `current`.
pub fn diff_catalogs(previous: Option<&Catalog>, current: &Catalog) -> CatalogDiff {
    diff_fingerprints(previous.map(fingerprints), fingerprints(current))
}

fn fingerprints(catalog: &Catalog) -> Vec<(&str, &str)> {
    catalog
        .records()
        .map(|(_, r)| (r.id.as_str(), r.hash.as_str()))
        .collect()
}

/// Same classification over ordered `(id, fingerprint)` pairs.
pub fn diff_fingerprints<I, S>(previous: Option<I>, current: I) -> CatalogDiff
where
    I: IntoIterator<Item = (S, S)>,
    S: AsRef<str>,
{
    let previous: Option<Vec<(S, S)>> = previous.map(|p| p.into_iter().collect());
    let previous_index: HashMap<&str, &str> = previous
        .iter()
        .flatten()
        .map(|(id, hash)| (id.as_ref(), hash.as_ref()))
        .collect();
    let mut diff = CatalogDiff::default();

    for (id, hash) in current {
        let (id, hash) = (id.as_ref(), hash.as_ref());
        let kind = match previous_index.get(id) {
            None => DiffKind::Added,
            Some(old) if *old != hash => DiffKind::Changed,
            Some(_) => DiffKind::Unchanged,
        };
        diff.push(id, kind);
    }

    for (id, _) in previous.iter().flatten() {
        if !diff.kinds.contains_key(id.as_ref()) {
            diff.push(id.as_ref(), DiffKind::Removed);
        }
    }

    diff
}
