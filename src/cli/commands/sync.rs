use anyhow::Result;

use super::{
    CommandResult, CommandSummary, LanguageSync,
    helper::{finish, load_catalog, load_context, load_glossary, open_synced, sync_issues},
};
use crate::cli::args::SyncCommand;

pub fn sync(cmd: SyncCommand) -> Result<CommandResult> {
    let ctx = load_context(&cmd.common)?;
    let languages = ctx.languages(&cmd.languages.languages)?;
    let catalog = load_catalog(&ctx)?;
    let glossary = load_glossary(&ctx)?;

    let mut issues = Vec::new();
    let mut rows = Vec::new();
    for language in languages {
        let synced = open_synced(&ctx, &catalog, glossary.as_ref(), &language)?;
        issues.extend(sync_issues(&language, &synced));

        let outcome = synced.outcome;
        synced.locked.commit()?;
        rows.push(LanguageSync {
            language,
            previous_version: outcome.previous_version,
            version: catalog.meta.version.clone(),
            report: outcome.report,
            glossary_report: outcome.glossary_report,
        });
    }

    Ok(finish(CommandSummary::Sync(rows), issues, true))
}
