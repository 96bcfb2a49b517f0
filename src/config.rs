use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{extract::SourceFormat, provider::google, store::Status};

pub const CONFIG_FILE_NAME: &str = ".transcatrc.json";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_source_language")]
    pub source_language: String,
    #[serde(default = "default_data_root")]
    pub data_root: String,
    /// Store language codes; one translation file each.
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    #[serde(default = "default_language_names")]
    pub language_names: BTreeMap<String, String>,
    /// Provider code per store language, when they differ.
    #[serde(default)]
    pub provider_language_codes: BTreeMap<String, String>,
    #[serde(default = "default_projects")]
    pub projects: Vec<ProjectConfig>,
    /// File names never extracted, wherever they are.
    #[serde(default = "default_excluded_files")]
    pub excluded_files: Vec<String>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default = "default_export_threshold")]
    pub export_threshold: Status,
    /// Relative to `dataRoot`.
    #[serde(default = "default_glossary_file")]
    pub glossary_file: String,
    #[serde(default = "default_lock_timeout_secs")]
    pub lock_timeout_secs: u64,
    #[serde(default)]
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// First segment of every section and identifier of the project.
    pub name: String,
    #[serde(default = "default_project_root")]
    pub root: String,
    pub scans: Vec<ScanConfig>,
    /// Defaults to `<dataRoot>/exports/<name>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScanConfig {
    pub dir: String,
    pub format: SourceFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Google,
    None,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub endpoint: String,
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub request_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Google,
            endpoint: google::DEFAULT_ENDPOINT.to_string(),
            max_attempts: 3,
            initial_backoff_ms: 1000,
            max_backoff_ms: 8000,
            request_delay_ms: 100,
            timeout_secs: 30,
        }
    }
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_data_root() -> String {
    "./data".to_string()
}

fn default_languages() -> Vec<String> {
    ["ko", "es", "pt", "fr"].map(String::from).to_vec()
}

fn default_language_names() -> BTreeMap<String, String> {
    [
        ("ko", "Korean"),
        ("es", "Spanish"),
        ("pt", "Portuguese"),
        ("fr", "French"),
    ]
    .into_iter()
    .map(|(code, name)| (code.to_string(), name.to_string()))
    .collect()
}

fn default_project_root() -> String {
    ".".to_string()
}

fn default_projects() -> Vec<ProjectConfig> {
    vec![ProjectConfig {
        name: "app".to_string(),
        root: default_project_root(),
        scans: vec![
            ScanConfig {
                dir: "src".to_string(),
                format: SourceFormat::Vue,
            },
            ScanConfig {
                dir: "content".to_string(),
                format: SourceFormat::Markdown,
            },
            ScanConfig {
                dir: "templates".to_string(),
                format: SourceFormat::Jinja,
            },
        ],
        export_dir: None,
    }]
}

fn default_excluded_files() -> Vec<String> {
    ["README.md", "CLAUDE.md", "CHANGELOG.md"].map(String::from).to_vec()
}

fn default_ignores() -> Vec<String> {
    ["**/node_modules/**", "**/dist/**"].map(String::from).to_vec()
}

fn default_export_threshold() -> Status {
    Status::Draft
}

fn default_glossary_file() -> String {
    "glossary.json".to_string()
}

fn default_lock_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_language: default_source_language(),
            data_root: default_data_root(),
            languages: default_languages(),
            language_names: default_language_names(),
            provider_language_codes: BTreeMap::new(),
            projects: default_projects(),
            excluded_files: default_excluded_files(),
            ignores: default_ignores(),
            export_threshold: default_export_threshold(),
            glossary_file: default_glossary_file(),
            lock_timeout_secs: default_lock_timeout_secs(),
            provider: ProviderConfig::default(),
        }
    }
}

/// Language codes end up in file names.
fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl Config {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        if self.languages.is_empty() {
            bail!("'languages' must name at least one language");
        }
        let mut seen = HashSet::new();
        for code in &self.languages {
            if !is_valid_code(code) {
                bail!("Invalid language code in 'languages': \"{}\"", code);
            }
            if !seen.insert(code) {
                bail!("Language \"{}\" listed twice in 'languages'", code);
            }
        }

        let mut names = HashSet::new();
        for project in &self.projects {
            if project.name.is_empty() || project.name.contains(['/', '.']) {
                bail!(
                    "Invalid project name \"{}\": must be non-empty without '/' or '.'",
                    project.name
                );
            }
            if !names.insert(&project.name) {
                bail!("Project \"{}\" defined twice in 'projects'", project.name);
            }
            if project.scans.iter().any(|s| s.dir.trim().is_empty()) {
                bail!("Project \"{}\" has a scan with an empty 'dir'", project.name);
            }
        }

        if self.provider.max_attempts == 0 {
            bail!("'provider.maxAttempts' must be at least 1");
        }

        Ok(())
    }

    pub fn language_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.language_names.get(code).map_or(code, String::as_str)
    }

    /// Code sent to the translation provider for store language `code`.
    pub fn provider_code<'a>(&'a self, code: &'a str) -> &'a str {
        self.provider_language_codes
            .get(code)
            .map_or(code, String::as_str)
    }

    pub fn project(&self, name: &str) -> Option<&ProjectConfig> {
        self.projects.iter().find(|p| p.name == name)
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    pub config: Config,
    /// The config file, if one was found.
    pub path: Option<PathBuf>,
}

impl ConfigLoadResult {
    pub fn from_file(&self) -> bool {
        self.path.is_some()
    }
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config
                .validate()
                .with_context(|| format!("Invalid config file: {}", path.display()))?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use crate::config::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.source_language, "en");
        assert_eq!(config.languages, vec!["ko", "es", "pt", "fr"]);
        assert_eq!(config.export_threshold, Status::Draft);
        assert_eq!(config.lock_timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
              "dataRoot": "./i18n",
              "languages": ["ko", "pt-BR"],
              "providerLanguageCodes": {"pt-BR": "pt"},
              "projects": [
                {"name": "gear", "root": "../gear", "scans": [{"dir": "src", "format": "vue"}]}
              ],
              "exportThreshold": "approved",
              "provider": {"kind": "none"}
          }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.data_root, "./i18n");
        assert_eq!(config.provider_code("pt-BR"), "pt");
        assert_eq!(config.provider_code("ko"), "ko");
        assert_eq!(config.projects[0].scans[0].format, SourceFormat::Vue);
        assert_eq!(config.export_threshold, Status::Approved);
        assert_eq!(config.provider.kind, ProviderKind::None);
        assert_eq!(config.provider.max_attempts, 3);
    }

    #[test]
    fn test_partial_config() {
        let config: Config = serde_json::from_str(r#"{ "ignores": ["**/build/**"] }"#).unwrap();

        assert_eq!(config.ignores, vec!["**/build/**"]);
        assert_eq!(config.projects, default_projects());
        assert_eq!(config.excluded_files, default_excluded_files());
    }

    #[test]
    fn test_language_name_falls_back_to_code() {
        let config = Config::default();
        assert_eq!(config.language_name("ko"), "Korean");
        assert_eq!(config.language_name("ja"), "ja");
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("src").join("components");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        assert_eq!(find_config_file(&sub_dir), Some(config_path));
    }

    #[test]
    fn test_find_config_stops_at_git_root() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        assert!(find_config_file(dir.path()).is_none());
    }

    #[test]
    fn test_load_config_default_when_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(!result.from_file());
        assert_eq!(result.config, Config::default());
    }

    #[test]
    fn test_load_config_with_invalid_pattern_fails() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{ "ignores": ["[invalid"] }"#).unwrap();

        let err = load_config(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("ignores"));
    }

    #[test]
    fn test_validate_rejects_bad_languages() {
        let config = Config {
            languages: vec!["ko".into(), "../ko".into()],
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            languages: vec!["ko".into(), "ko".into()],
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("twice"));
    }

    #[test]
    fn test_validate_rejects_bad_project_names() {
        let mut config = Config::default();
        config.projects[0].name = "my.app".into();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.projects.push(config.projects[0].clone());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_config_json_round_trips() {
        let json = default_config_json().unwrap();
        assert!(json.contains("\"sourceLanguage\": \"en\""));
        assert!(json.contains("\"exportThreshold\": \"draft\""));
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
