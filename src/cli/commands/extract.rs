use anyhow::{Context, Result};
use chrono::Utc;

use super::{
    CommandResult, CommandSummary, DiffCounts, ExtractSummary,
    helper::{finish, load_context},
};
use crate::{
    cli::args::ExtractCommand,
    core::{
        catalog::{Catalog, build_catalog, next_generation_time, save_snapshot},
        diff::diff_catalogs,
        extract::{ExtractorRegistry, extract_all},
    },
    issues::{ExtractionFailedIssue, IdentifierCollisionIssue, Issue},
};

pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    let ctx = load_context(&cmd.common)?;
    let sources = ctx.scan_sources();
    let outcome = extract_all(&ExtractorRegistry::builtin(), &sources.files);

    let mut issues: Vec<Issue> = outcome
        .failures
        .iter()
        .map(|err| {
            Issue::ExtractionFailed(ExtractionFailedIssue {
                file: err.file().to_string(),
                error: err.to_string(),
            })
        })
        .collect();

    let catalog_path = ctx.catalog_path();
    let previous = Catalog::load_optional(&catalog_path)?;
    let mut summary = ExtractSummary {
        files: sources.files.len(),
        failed_files: outcome.failures.len(),
        skipped_paths: sources.skipped_count,
        sections: 0,
        strings: 0,
        chars: 0,
        version: String::new(),
        previous_version: previous.as_ref().map(|c| c.meta.version.clone()),
        diff: DiffCounts::default(),
        catalog_path: catalog_path.clone(),
        is_dry_run: cmd.dry_run,
        aborted: false,
    };

    let generated_at = next_generation_time(previous.as_ref(), Utc::now());
    let catalog = match build_catalog(outcome.units, sources.sources, generated_at) {
        Ok(catalog) => catalog,
        Err(error) => {
            issues.push(Issue::IdentifierCollision(IdentifierCollisionIssue { error }));
            summary.aborted = true;
            return Ok(finish(CommandSummary::Extract(summary), issues, true));
        }
    };

    let diff = diff_catalogs(previous.as_ref(), &catalog);
    if !cmd.dry_run {
        // Snapshot first: the current catalog must never name a missing snapshot.
        save_snapshot(&ctx.snapshot_dir(), &catalog).context("Failed to write catalog snapshot")?;
        catalog
            .save(&catalog_path)
            .with_context(|| format!("Failed to write catalog {}", catalog_path.display()))?;
    }

    summary.sections = catalog.sections.len();
    summary.strings = catalog.meta.total_strings;
    summary.chars = catalog.meta.total_chars;
    summary.version = catalog.meta.version;
    summary.diff = diff.into();

    Ok(finish(CommandSummary::Extract(summary), issues, true))
}
