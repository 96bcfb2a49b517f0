use std::time::Duration;

use anyhow::{Context, Result, bail};
use tokio::runtime::Builder;

use super::{
    CommandResult, CommandSummary, LanguageTranslate,
    helper::{finish, load_catalog, load_context, load_glossary, open_synced, sync_issues},
};
use crate::{
    cli::args::TranslateCommand,
    config::{ProviderConfig, ProviderKind},
    core::{
        provider::{BatchSettings, GoogleTranslateProvider, RetryPolicy, plan_jobs, run_batch},
        store::merge::merge_suggestions,
    },
    issues::{ConsistencyIssue, Issue, TranslationFailedIssue},
};

fn retry_policy(config: &ProviderConfig) -> RetryPolicy {
    RetryPolicy::new(config.max_attempts, Duration::from_millis(config.initial_backoff_ms))
        .with_max_backoff(Duration::from_millis(config.max_backoff_ms))
}

pub fn translate(cmd: TranslateCommand) -> Result<CommandResult> {
    let ctx = load_context(&cmd.common)?;
    let languages = ctx.languages(&cmd.languages.languages)?;
    let provider_config = &ctx.config.provider;
    if provider_config.kind == ProviderKind::None {
        bail!("No translation provider configured (provider.kind is \"none\")");
    }

    let catalog = load_catalog(&ctx)?;
    let glossary = load_glossary(&ctx)?;
    let glossary_known = glossary
        .as_ref()
        .map(|g| g.known_terms())
        .unwrap_or_default();

    let provider = GoogleTranslateProvider::new(
        provider_config.endpoint.clone(),
        Duration::from_secs(provider_config.timeout_secs),
    )
    .context("Failed to create HTTP client")?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let mut issues = Vec::new();
    let mut rows = Vec::new();
    for language in languages {
        let mut synced = open_synced(&ctx, &catalog, glossary.as_ref(), &language)?;
        issues.extend(sync_issues(&language, &synced));

        let mut jobs = plan_jobs(&synced.locked.store, &catalog, glossary.as_ref(), cmd.force);
        let deferred = match cmd.limit {
            Some(limit) if jobs.len() > limit => {
                let deferred = jobs.len() - limit;
                jobs.truncate(limit);
                deferred
            }
            _ => 0,
        };

        let settings = BatchSettings {
            source_lang: ctx.config.source_language.clone(),
            target_lang: ctx.config.provider_code(&language).to_string(),
            request_delay: Duration::from_millis(provider_config.request_delay_ms),
            retry: retry_policy(provider_config),
        };
        let requested = jobs.len();
        let result = runtime.block_on(run_batch(&provider, jobs, &settings));

        let mut row = LanguageTranslate {
            language: language.clone(),
            requested,
            needs_review: 0,
            suggestion_only: 0,
            failed: result.failures.len(),
            deferred,
        };

        let store = &mut synced.locked.store;
        let batches = [
            (&mut store.glossary, &glossary_known, result.glossary),
            (&mut store.entries, &synced.outcome.known, result.strings),
        ];
        for (entries, known, batch) in batches {
            let batch_size = batch.len();
            match merge_suggestions(entries, known, batch) {
                Ok(outcome) => {
                    row.needs_review += outcome.needs_review;
                    row.suggestion_only += outcome.suggestion_only;
                }
                Err(error) => issues.push(Issue::Consistency(ConsistencyIssue {
                    language: language.clone(),
                    error,
                    batch_size,
                })),
            }
        }

        issues.extend(result.failures.into_iter().map(|failure| {
            Issue::TranslationFailed(TranslationFailedIssue {
                language: language.clone(),
                kind: failure.kind,
                key: failure.key,
                error: failure.error,
            })
        }));

        synced.locked.commit()?;
        rows.push(row);
    }

    Ok(finish(CommandSummary::Translate(rows), issues, true))
}

