//! Per-language translation stores.
//!
//! One JSON document per language:
//!
//! ```json
//! {
//!   "_meta": {"language": "Korean", "code": "ko", "catalogVersion": "20250101_120000"},
//!   "glossary": {"Attack": {"text": "공격", "status": "approved"}},
//!   "app.vue.Home.text.0": {"text": "...", "aiSuggestion": "...", "status": "draft"}
//! }
//! ```
//!
//! Writers hold a [`StoreLock`] for the whole read-modify-write cycle and
//! replace the file atomically on commit.

mod entry;
mod lock;
pub mod merge;

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::info;

pub use entry::{Status, TranslationEntry};
pub use lock::StoreLock;
pub use merge::{EntryMap, KnownIds, MergeReport};

use crate::core::{
    error::StoreError,
    persist::{read_json_optional, write_json_atomic},
};

pub const TRANSLATIONS_DIR_NAME: &str = "translations";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreMeta {
    /// Display name of the language.
    pub language: String,
    /// Language code sent to the translation provider.
    pub code: String,
    /// Catalog generation the entries were last merged against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationStore {
    #[serde(rename = "_meta")]
    pub meta: StoreMeta,
    /// Glossary term translations, keyed by the canonical source term.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub glossary: EntryMap,
    #[serde(flatten)]
    pub entries: EntryMap,
}

impl TranslationStore {
    pub fn new(language: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            meta: StoreMeta {
                language: language.into(),
                code: code.into(),
                catalog_version: None,
            },
            ..Self::default()
        }
    }

    pub fn path_for(translations_dir: &Path, language: &str) -> PathBuf {
        translations_dir.join(format!("{language}.json"))
    }

    /// Load without taking the lock. For read-only use.
    pub fn load(path: &Path) -> Result<Option<Self>, StoreError> {
        read_json_optional(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        write_json_atomic(path, self)
    }

    pub fn status_counts(&self) -> StatusCounts {
        StatusCounts::of(self.entries.values())
    }

    pub fn glossary_counts(&self) -> StatusCounts {
        StatusCounts::of(self.glossary.values())
    }
}

/// Entry counts by status. Orphaned entries are counted apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    by_status: [usize; Status::ALL.len()],
    pub orphaned: usize,
    pub stale_suggestions: usize,
}

impl StatusCounts {
    pub fn of<'a>(entries: impl IntoIterator<Item = &'a TranslationEntry>) -> Self {
        let mut counts = Self::default();
        for entry in entries {
            if entry.orphaned {
                counts.orphaned += 1;
                continue;
            }
            counts.by_status[entry.status as usize] += 1;
            if entry.suggestion_stale {
                counts.stale_suggestions += 1;
            }
        }
        counts
    }

    pub fn get(&self, status: Status) -> usize {
        self.by_status[status as usize]
    }

    /// Live (non-orphaned) entries.
    pub fn live(&self) -> usize {
        self.by_status.iter().sum()
    }

    /// Live entries at or above `threshold`.
    pub fn at_least(&self, threshold: Status) -> usize {
        Status::ALL
            .into_iter()
            .filter(|s| *s >= threshold)
            .map(|s| self.get(s))
            .sum()
    }
}

/// A store opened for writing. The lock is held until the value is dropped.
#[derive(Debug)]
pub struct LockedStore {
    path: PathBuf,
    pub store: TranslationStore,
    _lock: StoreLock,
}

impl LockedStore {
    /// Lock and load the store at `path`, creating an empty one if missing.
    ///
    /// `language` and `code` refresh the store's `_meta`.
    pub fn open(
        path: &Path,
        language: &str,
        code: &str,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let lock = StoreLock::acquire(path, timeout)?;
        let mut store = TranslationStore::load(path)?.unwrap_or_default();
        store.meta.language = language.to_string();
        store.meta.code = code.to_string();

        Ok(Self {
            path: path.to_path_buf(),
            store,
            _lock: lock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically replace the store file and release the lock.
    pub fn commit(self) -> Result<TranslationStore, StoreError> {
        self.store.save(&self.path)?;
        info!(
            store = %self.path.display(),
            entries = self.store.entries.len(),
            glossary = self.store.glossary.len(),
            "saved translation store"
        );
        Ok(self.store)
    }
}
