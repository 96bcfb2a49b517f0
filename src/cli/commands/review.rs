use anyhow::{Context, Result};

use super::{
    CommandResult, CommandSummary, ReviewSummary,
    helper::{finish, load_catalog, load_context, load_glossary, open_synced, sync_issues},
};
use crate::{
    cli::args::{ReviewAction, ReviewCommand},
    core::store::merge::{accept_suggestion, edit_text, set_status},
    issues::{Issue, ReviewRejectedIssue},
};

/// Apply one reviewer action. The store is synced first so the action sees
/// the current source texts; a rejected action writes nothing.
pub fn review(cmd: ReviewCommand) -> Result<CommandResult> {
    let ctx = load_context(&cmd.common)?;
    let language = ctx
        .languages(std::slice::from_ref(&cmd.language))?
        .into_iter()
        .next()
        .context("No language given")?;
    let catalog = load_catalog(&ctx)?;
    let glossary = load_glossary(&ctx)?;

    let glossary_known = if cmd.glossary {
        let definition = glossary
            .as_ref()
            .with_context(|| format!("No glossary at {}", ctx.glossary_path().display()))?;
        Some(definition.known_terms())
    } else {
        None
    };

    let mut synced = open_synced(&ctx, &catalog, glossary.as_ref(), &language)?;
    let mut issues = sync_issues(&language, &synced);

    let store = &mut synced.locked.store;
    let (entries, known) = match &glossary_known {
        Some(known) => (&mut store.glossary, known),
        None => (&mut store.entries, &synced.outcome.known),
    };

    let id = cmd.action.id().to_string();
    let result = match cmd.action {
        ReviewAction::Edit { id, text } => edit_text(entries, known, &id, text),
        ReviewAction::Accept { id } => accept_suggestion(entries, known, &id),
        ReviewAction::SetStatus { id, status, force } => {
            set_status(entries, known, &id, status, force)
        }
    };
    let current = entries.get(&id).map(|e| e.status).unwrap_or_default();

    let summary = match result {
        Ok(transition) => {
            synced.locked.commit()?;
            ReviewSummary {
                language,
                id,
                from: transition.from,
                to: transition.to,
                applied: true,
            }
        }
        Err(error) => {
            issues.push(Issue::ReviewRejected(ReviewRejectedIssue {
                language: language.clone(),
                id: id.clone(),
                reason: error.to_string(),
            }));
            ReviewSummary {
                language,
                id,
                from: current,
                to: current,
                applied: false,
            }
        }
    };

    Ok(finish(CommandSummary::Review(summary), issues, true))
}
