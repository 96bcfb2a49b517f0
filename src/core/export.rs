//! Exporter: projects a translation store into locale files.
//!
//! Two files per language: a nested key/value document for the runtime
//! (`<lang>.json`) and a flat diagnostic view (`<lang>-flat.json`). Both are
//! read-only projections; the store is never touched.
//!
//! Identifiers are shortened to `category.index` before nesting, which can map
//! several identifiers onto one path, or make one path both a leaf and a
//! branch. Every identifier involved in such a conflict is withheld and the
//! conflict reported; nothing is overwritten.

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
};

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::core::{
    catalog::{Catalog, StringRecord},
    error::{ExportCollisionError, StoreError},
    extract::ContextTag,
    persist::write_json_atomic,
    store::{Status, TranslationEntry, TranslationStore},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Lowest status that is exported.
    pub threshold: Status,
    /// Only sections whose name starts with this prefix.
    pub section_prefix: Option<String>,
    /// Key for the source text in the flat view.
    pub source_lang: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            threshold: Status::Draft,
            section_prefix: None,
            source_lang: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocaleExport {
    pub language: String,
    pub nested: Value,
    pub flat: Value,
    /// Identifiers written to the nested document, in catalog order.
    pub exported: Vec<String>,
    pub collisions: Vec<ExportCollisionError>,
    /// Qualifying entries translated from an older source text. Left out
    /// until the store is synced.
    pub stale: Vec<String>,
}

/// Export path of an identifier.
///
/// With three or more segments the path is `[category, index]`, where the
/// category is the second-to-last segment, or the third-to-last when that one
/// is a context tag. Shorter identifiers are used as they are.
pub fn simplify_key(id: &str) -> Vec<String> {
    let segments: Vec<&str> = id.split('.').collect();
    if segments.len() < 3 {
        return segments.into_iter().map(str::to_string).collect();
    }

    let n = segments.len();
    let category = if ContextTag::parse(segments[n - 2]).is_some() {
        segments[n - 3]
    } else {
        segments[n - 2]
    };
    vec![category.to_string(), segments[n - 1].to_string()]
}

fn qualifies(entry: &TranslationEntry, threshold: Status) -> bool {
    !entry.orphaned && entry.status >= threshold && entry.has_text()
}

pub fn build_export(
    catalog: &Catalog,
    store: &TranslationStore,
    language: &str,
    options: &ExportOptions,
    exported_at: DateTime<Utc>,
) -> LocaleExport {
    let mut candidates: Vec<(&StringRecord, &TranslationEntry)> = Vec::new();
    let mut stale = Vec::new();
    for (section, record) in catalog.records() {
        if let Some(prefix) = options.section_prefix.as_deref()
            && !section.starts_with(prefix)
        {
            continue;
        }
        let Some(entry) = store.entries.get(&record.id) else {
            continue;
        };
        if !qualifies(entry, options.threshold) {
            continue;
        }
        if entry.source_hash.as_ref().is_some_and(|h| *h != record.hash) {
            stale.push(record.id.clone());
            continue;
        }
        candidates.push((record, entry));
    }

    let paths: Vec<Vec<String>> = candidates.iter().map(|(r, _)| simplify_key(&r.id)).collect();
    let collisions = find_collisions(candidates.iter().map(|(r, _)| r.id.as_str()).zip(&paths));
    let withheld: HashSet<&str> = collisions
        .iter()
        .flat_map(|c| c.ids.iter().map(String::as_str))
        .collect();

    let mut nested = Value::Object(Map::new());
    let mut exported = Vec::new();
    let mut flat_strings = Map::new();
    for ((record, entry), path) in candidates.iter().zip(&paths) {
        let mut row = Map::new();
        row.insert(options.source_lang.clone(), json!(record.source_text));
        row.insert(language.to_string(), json!(entry.text));
        row.insert("status".into(), json!(entry.status));
        flat_strings.insert(record.id.clone(), Value::Object(row));

        if withheld.contains(record.id.as_str()) {
            continue;
        }
        insert_path(&mut nested, path, Value::String(entry.text.clone()));
        exported.push(record.id.clone());
    }

    let flat = json!({
        "_meta": {
            "language": language,
            "exportedAt": exported_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            "stringCount": flat_strings.len(),
        },
        "strings": flat_strings,
    });

    debug!(
        language,
        exported = exported.len(),
        collisions = collisions.len(),
        "built locale export"
    );
    LocaleExport {
        language: language.to_string(),
        nested,
        flat,
        exported,
        collisions,
        stale,
    }
}

/// Paths claimed by more than one identifier, or used both as a value and as
/// a parent of other values. One error per conflicting path, naming every
/// identifier that has to be withheld for it.
fn find_collisions<'a>(
    claims: impl Iterator<Item = (&'a str, &'a Vec<String>)>,
) -> Vec<ExportCollisionError> {
    let mut by_path: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for (id, path) in claims {
        by_path.entry(path.join(".")).or_default().push(id);
    }

    let mut conflicts: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (path, ids) in &by_path {
        if ids.len() > 1 {
            conflicts.entry(path.as_str()).or_default().extend(ids);
        }
        for (i, _) in path.match_indices('.') {
            let prefix = &path[..i];
            if let Some(leaf_ids) = by_path.get(prefix) {
                let group = conflicts.entry(prefix).or_default();
                group.extend(leaf_ids);
                group.extend(ids);
            }
        }
    }

    conflicts
        .into_iter()
        .map(|(path, ids)| {
            let mut seen = HashSet::new();
            ExportCollisionError {
                path: path.to_string(),
                ids: ids
                    .into_iter()
                    .filter(|id| seen.insert(*id))
                    .map(str::to_string)
                    .collect(),
            }
        })
        .collect()
}

/// Set `value` at `path`, creating objects along the way.
///
/// Callers guarantee `path` does not pass through an existing leaf.
fn insert_path(root: &mut Value, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut current = root;
    for part in parents {
        let Some(map) = current.as_object_mut() else {
            return;
        };
        current = map
            .entry(part.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    if let Some(map) = current.as_object_mut() {
        map.insert(last.clone(), value);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFiles {
    pub nested: PathBuf,
    pub flat: PathBuf,
}

impl ExportFiles {
    pub fn in_dir(dir: &Path, language: &str) -> Self {
        Self {
            nested: dir.join(format!("{language}.json")),
            flat: dir.join(format!("{language}-flat.json")),
        }
    }
}

/// Write both locale files for `export` into `dir`.
pub fn write_export(dir: &Path, export: &LocaleExport) -> Result<ExportFiles, StoreError> {
    let files = ExportFiles::in_dir(dir, &export.language);
    write_json_atomic(&files.nested, &export.nested)?;
    write_json_atomic(&files.flat, &export.flat)?;
    info!(
        language = %export.language,
        strings = export.exported.len(),
        dir = %dir.display(),
        "wrote locale files"
    );
    Ok(files)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::core::{
        catalog::{Section, build_catalog, fingerprint},
        extract::{ExtractedUnit, RawString, SourceFormat},
    };

    fn at() -> DateTime<Utc> {
        Utc.timestamp_opt(1_760_000_000, 0).unwrap()
    }

    fn unit(section: &str, ctx: ContextTag, texts: &[&str]) -> ExtractedUnit {
        ExtractedUnit {
            source_file: format!("{section}.src"),
            section: section.into(),
            format: SourceFormat::Markdown,
            strings: texts.iter().map(|t| RawString::new(*t, ctx)).collect(),
        }
    }

    fn entry(text: &str, status: Status) -> TranslationEntry {
        TranslationEntry {
            text: text.into(),
            status,
            ..Default::default()
        }
    }

    fn store(entries: &[(&str, TranslationEntry)]) -> TranslationStore {
        let mut store = TranslationStore::new("Korean", "ko");
        for (id, e) in entries {
            store.entries.insert(id.to_string(), e.clone());
        }
        store
    }

    #[test]
    fn test_simplify_key() {
        assert_eq!(simplify_key("app.content.faq.header.3"), vec!["faq", "3"]);
        assert_eq!(simplify_key("app.vue.layout.AppHeader.text.0"), vec!["AppHeader", "0"]);
        assert_eq!(simplify_key("a.b.0"), vec!["b", "0"]);
        assert_eq!(simplify_key("nav.home"), vec!["nav", "home"]);
        assert_eq!(simplify_key("title"), vec!["title"]);
    }

    #[test]
    fn test_approved_entry_exported_at_approved_threshold() {
        // Catalog holding the single id "a.b.0".
        let mut catalog = build_catalog(vec![], vec![], at()).unwrap();
        catalog.sections.insert(
            "a".into(),
            Section {
                source_file: "a.md".into(),
                format: SourceFormat::Markdown,
                strings: vec![StringRecord {
                    id: "a.b.0".into(),
                    source_text: "Attack".into(),
                    chars: 6,
                    hash: fingerprint("Attack"),
                    context: None,
                }],
            },
        );
        let store = store(&[("a.b.0", entry("공격", Status::Approved))]);
        let options = ExportOptions {
            threshold: Status::Approved,
            ..Default::default()
        };

        let export = build_export(&catalog, &store, "ko", &options, at());

        assert_eq!(export.nested, json!({"b": {"0": "공격"}}));
        assert!(export.collisions.is_empty());

        let mut reviewed = store.clone();
        reviewed.entries.get_mut("a.b.0").unwrap().status = Status::NeedsReview;
        let export = build_export(&catalog, &reviewed, "ko", &options, at());
        assert_eq!(export.nested, json!({}));
    }

    #[test]
    fn test_threshold_and_orphans() {
        let catalog = build_catalog(
            vec![unit("app/content/faq", ContextTag::ListItem, &["Attack", "Defense", "Health"])],
            vec![],
            at(),
        )
        .unwrap();
        let mut orphan = entry("체력", Status::Approved);
        orphan.orphaned = true;
        let store = store(&[
            ("app.content.faq.list_item.0", entry("공격", Status::Draft)),
            ("app.content.faq.list_item.1", entry("방어", Status::NeedsReview)),
            ("app.content.faq.list_item.2", orphan),
        ]);

        let export = build_export(&catalog, &store, "ko", &ExportOptions::default(), at());

        assert_eq!(export.nested, json!({"faq": {"0": "공격"}}));
        assert_eq!(export.exported, vec!["app.content.faq.list_item.0"]);
        assert_eq!(
            export.flat["strings"]["app.content.faq.list_item.0"],
            json!({"en": "Attack", "ko": "공격", "status": "draft"})
        );
        assert_eq!(export.flat["_meta"]["stringCount"], 1);
        assert_eq!(export.flat["_meta"]["exportedAt"], "2025-10-09T08:53:20Z");
    }

    #[test]
    fn test_collisions_are_withheld_not_overwritten() {
        // Same file stem under two kinds: both shorten to "faq.0".
        let catalog = build_catalog(
            vec![
                unit("app/content/faq", ContextTag::Header, &["FAQ", "Help"]),
                unit("app/templates/faq", ContextTag::Text, &["Questions"]),
            ],
            vec![],
            at(),
        )
        .unwrap();
        let store = store(&[
            ("app.content.faq.header.0", entry("자주 묻는 질문", Status::Approved)),
            ("app.content.faq.header.1", entry("도움말", Status::Approved)),
            ("app.templates.faq.text.0", entry("질문", Status::Approved)),
        ]);

        let export = build_export(&catalog, &store, "ko", &ExportOptions::default(), at());

        assert_eq!(
            export.collisions,
            vec![ExportCollisionError {
                path: "faq.0".into(),
                ids: vec!["app.content.faq.header.0".into(), "app.templates.faq.text.0".into()],
            }]
        );
        assert_eq!(export.nested, json!({"faq": {"1": "도움말"}}));
        assert_eq!(export.flat["_meta"]["stringCount"], 3);
    }

    #[test]
    fn test_leaf_and_branch_conflict() {
        let claims = [
            ("x.title".to_string(), vec!["title".to_string()]),
            ("x.y.title.0".to_string(), vec!["title".to_string(), "0".to_string()]),
            ("z.w.1".to_string(), vec!["w".to_string(), "1".to_string()]),
        ];
        let collisions = find_collisions(claims.iter().map(|(id, p)| (id.as_str(), p)));

        assert_eq!(
            collisions,
            vec![ExportCollisionError {
                path: "title".into(),
                ids: vec!["x.title".into(), "x.y.title.0".into()],
            }]
        );
    }

    #[test]
    fn test_section_prefix_filter() {
        let catalog = build_catalog(
            vec![
                unit("app/content/faq", ContextTag::Header, &["FAQ"]),
                unit("site/content/news", ContextTag::Header, &["News"]),
            ],
            vec![],
            at(),
        )
        .unwrap();
        let store = store(&[
            ("app.content.faq.header.0", entry("질문", Status::Draft)),
            ("site.content.news.header.0", entry("뉴스", Status::Draft)),
        ]);
        let options = ExportOptions {
            section_prefix: Some("site/".into()),
            ..Default::default()
        };

        let export = build_export(&catalog, &store, "ko", &options, at());
        assert_eq!(export.nested, json!({"news": {"0": "뉴스"}}));
    }

    #[test]
    fn test_entry_for_older_source_text_is_held_back() {
        let catalog = build_catalog(
            vec![unit("app/content/faq", ContextTag::Header, &["Melee Attack"])],
            vec![],
            at(),
        )
        .unwrap();
        let mut outdated = entry("공격", Status::Approved);
        outdated.source_hash = Some(fingerprint("Attack"));
        let store = store(&[("app.content.faq.header.0", outdated)]);

        let export = build_export(&catalog, &store, "ko", &ExportOptions::default(), at());

        assert_eq!(export.nested, json!({}));
        assert_eq!(export.stale, vec!["app.content.faq.header.0"]);
    }

    #[test]
    fn test_write_export_files() {
        let dir = tempdir().unwrap();
        let export = LocaleExport {
            language: "ko".into(),
            nested: json!({"faq": {"0": "공격"}}),
            flat: json!({"_meta": {}, "strings": {}}),
            exported: vec!["app.content.faq.header.0".into()],
            collisions: vec![],
            stale: vec![],
        };

        let files = write_export(dir.path(), &export).unwrap();

        assert!(files.nested.ends_with("ko.json"));
        assert!(files.flat.ends_with("ko-flat.json"));
        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&files.nested).unwrap()).unwrap();
        assert_eq!(written, export.nested);
    }
}
