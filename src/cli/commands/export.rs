use anyhow::{Context, Result};
use chrono::Utc;

use super::{
    CommandResult, CommandSummary, ExportSummary, ExportedFile,
    helper::{finish, load_catalog, load_context},
};
use crate::{
    cli::args::ExportCommand,
    core::{
        export::{ExportFiles, ExportOptions, build_export, write_export},
        store::TranslationStore,
    },
    issues::{ExportCollisionIssue, Issue, UnsyncedIssue},
};

pub fn export(cmd: ExportCommand) -> Result<CommandResult> {
    let ctx = load_context(&cmd.common)?;
    let languages = ctx.languages(&cmd.languages.languages)?;
    let catalog = load_catalog(&ctx)?;
    let threshold = cmd.threshold.unwrap_or(ctx.config.export_threshold);

    let projects = match &cmd.project {
        Some(name) => vec![
            ctx.config
                .project(name)
                .with_context(|| format!("Project '{}' is not configured", name))?,
        ],
        None => ctx.config.projects.iter().collect(),
    };

    let exported_at = Utc::now();
    let mut issues = Vec::new();
    let mut files = Vec::new();
    for language in &languages {
        let path = ctx.store_path(language);
        let store = TranslationStore::load(&path)
            .with_context(|| format!("Failed to read translation store {}", path.display()))?
            .unwrap_or_else(|| {
                TranslationStore::new(ctx.config.language_name(language), language.as_str())
            });

        let mut unsynced = Vec::new();
        for project in &projects {
            let options = ExportOptions {
                threshold,
                section_prefix: Some(format!("{}/", project.name)),
                source_lang: ctx.config.source_language.clone(),
            };
            let export = build_export(&catalog, &store, language, &options, exported_at);

            let dir = ctx.export_dir(project);
            let target = if cmd.dry_run {
                ExportFiles::in_dir(&dir, language)
            } else {
                write_export(&dir, &export)
                    .with_context(|| format!("Failed to write locale files to {}", dir.display()))?
            };

            let nested_display = target.nested.display().to_string();
            let withheld: usize = export.collisions.iter().map(|c| c.ids.len()).sum();
            issues.extend(export.collisions.into_iter().map(|error| {
                Issue::ExportCollision(ExportCollisionIssue {
                    language: language.clone(),
                    file: nested_display.clone(),
                    error,
                })
            }));
            unsynced.extend(export.stale);

            files.push(ExportedFile {
                language: language.clone(),
                project: project.name.clone(),
                nested: target.nested,
                exported: export.exported.len(),
                withheld,
            });
        }

        if !unsynced.is_empty() {
            issues.push(Issue::Unsynced(UnsyncedIssue {
                language: language.clone(),
                ids: unsynced,
            }));
        }
    }

    Ok(finish(
        CommandSummary::Export(ExportSummary {
            threshold,
            files,
            is_dry_run: cmd.dry_run,
        }),
        issues,
        true,
    ))
}
