use anyhow::{Context, Result};

use super::{
    CommandResult, CommandSummary, LanguageStatus, StatusSummary,
    helper::{finish, load_context},
};
use crate::{
    cli::args::StatusCommand,
    core::{catalog::Catalog, store::TranslationStore},
};

/// Read-only: stores are loaded without taking their locks.
pub fn status(cmd: StatusCommand) -> Result<CommandResult> {
    let ctx = load_context(&cmd.common)?;
    let languages = ctx.languages(&cmd.languages.languages)?;
    let catalog = Catalog::load_optional(&ctx.catalog_path())?;
    let catalog_version = catalog.as_ref().map(|c| c.meta.version.clone());

    let mut rows = Vec::new();
    for language in languages {
        let path = ctx.store_path(&language);
        let store = TranslationStore::load(&path)
            .with_context(|| format!("Failed to read translation store {}", path.display()))?
            .unwrap_or_default();

        let unsynced = catalog.as_ref().map_or(0, |c| {
            c.records()
                .filter(|(_, r)| !store.entries.contains_key(&r.id))
                .count()
        });
        let behind = catalog_version.is_some() && store.meta.catalog_version != catalog_version;

        rows.push(LanguageStatus {
            name: ctx.config.language_name(&language).to_string(),
            language,
            counts: store.status_counts(),
            glossary: store.glossary_counts(),
            unsynced,
            behind,
        });
    }

    Ok(finish(
        CommandSummary::Status(StatusSummary {
            catalog_version,
            catalog_strings: catalog.as_ref().map_or(0, |c| c.len()),
            threshold: ctx.config.export_threshold,
            languages: rows,
        }),
        Vec::new(),
        true,
    ))
}
