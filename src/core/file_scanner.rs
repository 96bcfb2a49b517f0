use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
};

use glob::Pattern;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{
    config::ScanConfig,
    core::extract::{SourceFile, section_name},
};

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal directory paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning one project.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Sorted by path, each file once.
    pub files: Vec<SourceFile>,
    pub skipped_count: usize,
}

struct IgnoreRules {
    literal_paths: Vec<PathBuf>,
    globs: Vec<Pattern>,
    file_names: HashSet<String>,
}

impl IgnoreRules {
    fn new(root: &Path, patterns: &[String], excluded_files: &[String]) -> Self {
        let mut literal_paths = Vec::new();
        let mut globs = Vec::new();
        for p in patterns {
            if is_glob_pattern(p) {
                match Pattern::new(p) {
                    Ok(pattern) => globs.push(pattern),
                    Err(e) => warn!(pattern = %p, error = %e, "invalid ignore pattern"),
                }
            } else {
                literal_paths.push(root.join(p));
            }
        }
        Self {
            literal_paths,
            globs,
            file_names: excluded_files.iter().cloned().collect(),
        }
    }

    fn is_ignored(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.literal_paths.iter().any(|p| path.starts_with(p))
            || self.globs.iter().any(|p| p.matches(&path_str))
            || path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| self.file_names.contains(n))
    }
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Collect the source files of project `project` below `root`.
///
/// Each scan walks `root/<dir>` and keeps files whose extension belongs to
/// the scan's format. Sections are named from the path below the scan dir.
pub fn scan_project(
    project: &str,
    root: &Path,
    scans: &[ScanConfig],
    ignore_patterns: &[String],
    excluded_files: &[String],
) -> ScanResult {
    let rules = IgnoreRules::new(root, ignore_patterns, excluded_files);
    let mut files: BTreeMap<PathBuf, SourceFile> = BTreeMap::new();
    let mut skipped_count = 0;

    for scan in scans {
        let scan_dir = root.join(&scan.dir);
        if !scan_dir.is_dir() {
            warn!(project, dir = %scan_dir.display(), "scan directory does not exist");
            continue;
        }

        for entry in WalkDir::new(&scan_dir).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    warn!(error = %e, "cannot access path");
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file()
                || !scan.format.matches_path(path)
                || rules.is_ignored(path)
            {
                continue;
            }
            if files.contains_key(path) {
                continue;
            }

            let Ok(relative) = path.strip_prefix(&scan_dir) else {
                continue;
            };
            let display_path = path
                .strip_prefix(root)
                .map(slash_path)
                .unwrap_or_else(|_| slash_path(path));

            files.insert(
                path.to_path_buf(),
                SourceFile {
                    path: path.to_path_buf(),
                    display_path,
                    section: section_name(project, scan.format, relative),
                    format: scan.format,
                },
            );
        }
    }

    debug!(project, files = files.len(), "scanned project");
    ScanResult {
        files: files.into_values().collect(),
        skipped_count,
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::core::extract::SourceFormat;

    fn scan(dir: &str, format: SourceFormat) -> ScanConfig {
        ScanConfig {
            dir: dir.to_string(),
            format,
        }
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        File::create(path).unwrap();
    }

    #[test]
    fn test_scan_picks_files_by_format() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(root, "src/App.vue");
        touch(root, "src/layout/AppHeader.vue");
        touch(root, "src/main.ts");
        touch(root, "content/faq.md");

        let result = scan_project(
            "app",
            root,
            &[scan("src", SourceFormat::Vue), scan("content", SourceFormat::Markdown)],
            &[],
            &[],
        );

        let got: Vec<_> = result
            .files
            .iter()
            .map(|f| (f.display_path.as_str(), f.section.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("content/faq.md", "app/content/faq"),
                ("src/App.vue", "app/vue/App"),
                ("src/layout/AppHeader.vue", "app/vue/layout/AppHeader"),
            ]
        );
    }

    #[test]
    fn test_scan_ignores_globs_literals_and_excluded_names() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(root, "content/guide.md");
        touch(root, "content/README.md");
        touch(root, "content/drafts/wip.md");
        touch(root, "content/node_modules/pkg/notes.md");

        let result = scan_project(
            "app",
            root,
            &[scan("content", SourceFormat::Markdown)],
            &["**/node_modules/**".to_owned(), "content/drafts".to_owned()],
            &["README.md".to_owned()],
        );

        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].display_path, "content/guide.md");
    }

    #[test]
    fn test_scan_missing_dir_is_skipped() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "templates/base.html");

        let result = scan_project(
            "app",
            dir.path(),
            &[scan("src", SourceFormat::Vue), scan("templates", SourceFormat::Jinja)],
            &[],
            &[],
        );

        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].section, "app/templates/base");
    }

    #[test]
    fn test_overlapping_scans_keep_file_once() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "src/components/Button.vue");

        let result = scan_project(
            "app",
            dir.path(),
            &[scan("src", SourceFormat::Vue), scan("src/components", SourceFormat::Vue)],
            &[],
            &[],
        );

        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].section, "app/vue/components/Button");
    }

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("src/*"));
        assert!(is_glob_pattern("**/dist/**"));
        assert!(!is_glob_pattern("content/drafts"));
        assert!(!is_glob_pattern("app/[locale]"));
    }
}
