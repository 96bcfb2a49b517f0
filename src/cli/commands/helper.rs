use std::{env, path::PathBuf};

use anyhow::{Context, Result};

use super::{CommandResult, CommandSummary};
use crate::{
    cli::args::CommonArgs,
    config::load_config,
    core::{
        catalog::Catalog,
        context::RunContext,
        glossary::GlossaryDefinition,
        store::{LockedStore, MergeReport, TranslationEntry},
        sync::{SyncOutcome, sync_store},
    },
    issues::{
        Issue, MissingSnapshotIssue, OrphanedIssue, Severity, StaleTranslationIssue,
        UnverifiedIssue,
    },
};

pub fn finish(
    summary: CommandSummary,
    mut issues: Vec<Issue>,
    exit_on_errors: bool,
) -> CommandResult {
    issues.sort();

    let mut error_count = issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();
    let warning_count = issues.len() - error_count;

    if let CommandSummary::Init(ref summary) = summary
        && summary.error.is_some()
    {
        error_count += 1;
    }

    CommandResult {
        summary,
        error_count,
        warning_count,
        exit_on_errors,
        issues,
    }
}

/// Find and load the config, then apply command-line overrides.
pub fn load_context(common: &CommonArgs) -> Result<RunContext> {
    let cwd = env::current_dir().context("Failed to read current directory")?;
    let start = match &common.root {
        Some(root) => cwd.join(root),
        None => cwd.clone(),
    };

    let loaded = load_config(&start)?;
    let base_dir: PathBuf = loaded
        .path
        .as_deref()
        .and_then(|p| p.parent())
        .map(|p| p.to_path_buf())
        .unwrap_or(start);

    let mut ctx = RunContext::new(loaded.config, base_dir);
    if let Some(data_root) = &common.data_root {
        ctx.data_root = cwd.join(data_root);
    }
    Ok(ctx)
}

pub fn load_catalog(ctx: &RunContext) -> Result<Catalog> {
    let path = ctx.catalog_path();
    Catalog::load_optional(&path)?.with_context(|| {
        format!(
            "No catalog at {} (run `transcat extract` first)",
            path.display()
        )
    })
}

pub fn load_glossary(ctx: &RunContext) -> Result<Option<GlossaryDefinition>> {
    let path = ctx.glossary_path();
    GlossaryDefinition::load_optional(&path)
        .with_context(|| format!("Failed to load glossary {}", path.display()))
}

/// A store locked and brought up to date with the current catalog.
pub struct SyncedStore {
    pub locked: LockedStore,
    pub outcome: SyncOutcome,
}

pub fn open_synced(
    ctx: &RunContext,
    catalog: &Catalog,
    glossary: Option<&GlossaryDefinition>,
    language: &str,
) -> Result<SyncedStore> {
    let path = ctx.store_path(language);
    let mut locked = LockedStore::open(
        &path,
        ctx.config.language_name(language),
        ctx.config.provider_code(language),
        ctx.lock_timeout(),
    )
    .with_context(|| format!("Failed to open translation store {}", path.display()))?;

    let outcome = sync_store(&mut locked.store, catalog, &ctx.snapshot_dir(), glossary)?;
    Ok(SyncedStore { locked, outcome })
}

/// Issues worth a reviewer's attention after a sync.
pub fn sync_issues(language: &str, synced: &SyncedStore) -> Vec<Issue> {
    let store = &synced.locked.store;
    let outcome = &synced.outcome;
    let mut issues = Vec::new();

    if outcome.previous_missing
        && let Some(version) = &outcome.previous_version
    {
        issues.push(Issue::MissingSnapshot(MissingSnapshotIssue {
            language: language.to_string(),
            version: version.clone(),
        }));
    }

    let entry = |id: &str| store.entries.get(id).cloned().unwrap_or_default();
    let unverified = &outcome.report.unverified;
    for id in outcome.report.downgraded.iter().filter(|id| !unverified.contains(id)) {
        issues.push(Issue::StaleTranslation(StaleTranslationIssue {
            language: language.to_string(),
            id: id.clone(),
            text: entry(id).text,
        }));
    }
    for id in unverified {
        issues.push(Issue::Unverified(UnverifiedIssue {
            language: language.to_string(),
            id: id.clone(),
            text: entry(id).text,
        }));
    }

    issues.extend(orphan_issues(language, &outcome.report, |id| store.entries.get(id), false));
    if let Some(report) = &outcome.glossary_report {
        issues.extend(orphan_issues(language, report, |term| store.glossary.get(term), true));
    }
    issues
}

/// Newly orphaned entries that held a translation.
fn orphan_issues<'a>(
    language: &str,
    report: &MergeReport,
    lookup: impl Fn(&str) -> Option<&'a TranslationEntry>,
    glossary: bool,
) -> Vec<Issue> {
    report
        .orphaned
        .iter()
        .filter_map(|id| {
            let entry = lookup(id).filter(|e| e.has_text())?;
            Some(Issue::Orphaned(OrphanedIssue {
                language: language.to_string(),
                id: id.clone(),
                text: entry.text.clone(),
                glossary,
            }))
        })
        .collect()
}
