//! Catalog builder and the persisted catalog format.
//!
//! A catalog is an immutable snapshot of every translatable string of a
//! project. It is rebuilt wholesale on each extraction run and compared with
//! the previous generation by the diff engine; records are never edited in
//! place.
//!
//! Given the same source files, two builds produce byte-identical JSON except
//! for `meta.generatedAt` and `meta.version` (derived from it): sections are
//! keyed by name in sorted order, and records keep extraction order.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::core::{
    error::{IdentifierCollisionError, StoreError},
    extract::{ContextTag, ExtractedUnit, SourceFormat},
    ident::IdAssigner,
    persist::{read_json, read_json_optional, write_json_atomic},
};

pub const CATALOG_FILE_NAME: &str = "source-strings.json";
pub const SNAPSHOT_DIR_NAME: &str = "snapshots";
const SNAPSHOT_PREFIX: &str = "source-strings-";

/// Hex digits of SHA-256 kept as the fingerprint.
const FINGERPRINT_LEN: usize = 8;

/// Short deterministic digest of a source text.
pub fn fingerprint(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    digest
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<String>()
        .chars()
        .take(FINGERPRINT_LEN)
        .collect()
}

/// Catalog version string derived from its generation time.
pub fn version_for(generated_at: DateTime<Utc>) -> String {
    generated_at.format("%Y%m%d_%H%M%S").to_string()
}

/// Generation time for a catalog built after `previous`.
///
/// Versions have one-second resolution, so a rebuild within the same second
/// moves one second past the previous generation to keep versions distinct.
pub fn next_generation_time(previous: Option<&Catalog>, now: DateTime<Utc>) -> DateTime<Utc> {
    match previous {
        Some(prev) if version_for(now) <= prev.meta.version => {
            prev.meta.generated_at + chrono::Duration::seconds(1)
        }
        _ => now,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringRecord {
    pub id: String,
    #[serde(rename = "en")]
    pub source_text: String,
    pub chars: usize,
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextTag>,
}

impl StringRecord {
    pub fn new(id: String, source_text: String, context: ContextTag) -> Self {
        Self {
            id,
            chars: source_text.chars().count(),
            hash: fingerprint(&source_text),
            source_text,
            context: Some(context),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub source_file: String,
    #[serde(rename = "type", with = "section_type")]
    pub format: SourceFormat,
    pub strings: Vec<StringRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogMeta {
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub total_strings: usize,
    pub total_chars: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub meta: CatalogMeta,
    pub sections: BTreeMap<String, Section>,
}

impl Catalog {
    /// All records with their section name, sections in key order.
    pub fn records(&self) -> impl Iterator<Item = (&str, &StringRecord)> {
        self.sections
            .iter()
            .flat_map(|(name, section)| section.strings.iter().map(move |r| (name.as_str(), r)))
    }

    pub fn index(&self) -> HashMap<&str, &StringRecord> {
        self.records().map(|(_, r)| (r.id.as_str(), r)).collect()
    }

    pub fn len(&self) -> usize {
        self.sections.values().map(|s| s.strings.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        read_json(path)
    }

    pub fn load_optional(path: &Path) -> Result<Option<Self>, StoreError> {
        read_json_optional(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        write_json_atomic(path, self)
    }
}

/// Group extracted units into an immutable catalog.
///
/// Sections are processed in name order so the result does not depend on the
/// order extraction finished in. Units without strings are left out. Any
/// identifier or section collision aborts the build.
pub fn build_catalog(
    mut units: Vec<ExtractedUnit>,
    sources: Vec<String>,
    generated_at: DateTime<Utc>,
) -> Result<Catalog, IdentifierCollisionError> {
    units.sort_by(|a, b| a.section.cmp(&b.section));

    let mut assigner = IdAssigner::new();
    let mut sections = BTreeMap::new();
    let mut total_chars = 0;

    for unit in units {
        if unit.strings.is_empty() {
            continue;
        }
        assigner.claim_section(&unit.section, &unit.source_file)?;

        let mut records = Vec::with_capacity(unit.strings.len());
        for (index, raw) in unit.strings.into_iter().enumerate() {
            let id = assigner.assign(&unit.section, raw.context, index, &raw.text)?;
            let record = StringRecord::new(id, raw.text, raw.context);
            total_chars += record.chars;
            records.push(record);
        }

        sections.insert(
            unit.section,
            Section {
                source_file: unit.source_file,
                format: unit.format,
                strings: records,
            },
        );
    }

    let catalog = Catalog {
        meta: CatalogMeta {
            generated_at,
            version: version_for(generated_at),
            total_strings: assigner.len(),
            total_chars,
            sources,
        },
        sections,
    };
    info!(
        sections = catalog.sections.len(),
        strings = catalog.meta.total_strings,
        "built catalog"
    );
    Ok(catalog)
}

// ============================================================
// Snapshots
// ============================================================

pub fn snapshot_path(snapshot_dir: &Path, version: &str) -> PathBuf {
    snapshot_dir.join(format!("{SNAPSHOT_PREFIX}{version}.json"))
}

pub fn save_snapshot(snapshot_dir: &Path, catalog: &Catalog) -> Result<PathBuf, StoreError> {
    let path = snapshot_path(snapshot_dir, &catalog.meta.version);
    catalog.save(&path)?;
    Ok(path)
}

pub fn load_snapshot(snapshot_dir: &Path, version: &str) -> Result<Option<Catalog>, StoreError> {
    Catalog::load_optional(&snapshot_path(snapshot_dir, version))
}

/// Versions of all stored snapshots, oldest first.
pub fn list_snapshots(snapshot_dir: &Path) -> Result<Vec<String>, StoreError> {
    if !snapshot_dir.exists() {
        return Ok(Vec::new());
    }
    let mut versions = Vec::new();
    for entry in fs::read_dir(snapshot_dir).map_err(|e| StoreError::io(snapshot_dir, e))? {
        let entry = entry.map_err(|e| StoreError::io(snapshot_dir, e))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if let Some(version) = name
            .strip_prefix(SNAPSHOT_PREFIX)
            .and_then(|rest| rest.strip_suffix(".json"))
        {
            versions.push(version.to_string());
        }
    }
    versions.sort();
    Ok(versions)
}

mod section_type {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use crate::core::extract::SourceFormat;

    pub fn serialize<S: Serializer>(
        format: &SourceFormat,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(format.catalog_type())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<SourceFormat, D::Error> {
        let s = String::deserialize(deserializer)?;
        SourceFormat::from_catalog_type(&s)
            .ok_or_else(|| D::Error::custom(format!("unknown section type '{s}'")))
    }
}
