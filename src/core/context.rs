use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Result, bail};
use tracing::debug;

use crate::{
    config::{Config, ProjectConfig},
    core::{
        catalog::{CATALOG_FILE_NAME, SNAPSHOT_DIR_NAME},
        extract::SourceFile,
        file_scanner::scan_project,
        glossary::GLOSSARY_CURATION_FILE_NAME,
        store::{TRANSLATIONS_DIR_NAME, TranslationStore},
    },
};

/// Configuration plus every path a run needs, resolved once.
///
/// Relative paths in the config are resolved against `base_dir`: the
/// directory holding the config file, or the start directory without one.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub config: Config,
    pub base_dir: PathBuf,
    pub data_root: PathBuf,
}

/// All files to extract, over every configured project.
#[derive(Debug, Default)]
pub struct SourceSet {
    pub files: Vec<SourceFile>,
    pub skipped_count: usize,
    /// Project roots, as recorded in catalog `meta.sources`.
    pub sources: Vec<String>,
}

impl RunContext {
    pub fn new(config: Config, base_dir: PathBuf) -> Self {
        let data_root = resolve(&base_dir, &config.data_root);
        Self {
            config,
            base_dir,
            data_root,
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        resolve(&self.base_dir, path)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_root.join(CATALOG_FILE_NAME)
    }

    pub fn snapshot_dir(&self) -> PathBuf {
        self.data_root.join(SNAPSHOT_DIR_NAME)
    }

    pub fn translations_dir(&self) -> PathBuf {
        self.data_root.join(TRANSLATIONS_DIR_NAME)
    }

    pub fn store_path(&self, language: &str) -> PathBuf {
        TranslationStore::path_for(&self.translations_dir(), language)
    }

    pub fn glossary_path(&self) -> PathBuf {
        self.data_root.join(&self.config.glossary_file)
    }

    pub fn curation_path(&self) -> PathBuf {
        self.data_root.join(GLOSSARY_CURATION_FILE_NAME)
    }

    pub fn project_root(&self, project: &ProjectConfig) -> PathBuf {
        self.resolve(&project.root)
    }

    pub fn export_dir(&self, project: &ProjectConfig) -> PathBuf {
        match &project.export_dir {
            Some(dir) => self.resolve(dir),
            None => self.data_root.join("exports").join(&project.name),
        }
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_secs(self.config.lock_timeout_secs)
    }

    /// `requested` languages, or every configured one.
    ///
    /// Unknown codes are an error rather than a new store.
    pub fn languages(&self, requested: &[String]) -> Result<Vec<String>> {
        if requested.is_empty() {
            return Ok(self.config.languages.clone());
        }
        for code in requested {
            if !self.config.languages.contains(code) {
                bail!(
                    "Language '{}' is not configured (known: {})",
                    code,
                    self.config.languages.join(", ")
                );
            }
        }
        Ok(requested.to_vec())
    }

    pub fn scan_sources(&self) -> SourceSet {
        let mut set = SourceSet::default();
        for project in &self.config.projects {
            let root = self.project_root(project);
            let result = scan_project(
                &project.name,
                &root,
                &project.scans,
                &self.config.ignores,
                &self.config.excluded_files,
            );
            debug!(project = %project.name, files = result.files.len(), "project sources");
            set.files.extend(result.files);
            set.skipped_count += result.skipped_count;
            set.sources.push(project.root.clone());
        }
        set
    }
}

fn resolve(base: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p.strip_prefix(".").unwrap_or(p))
    }
}
