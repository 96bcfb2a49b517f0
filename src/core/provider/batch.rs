//! Batch runner: fetches machine suggestions for one language.
//!
//! Calls are made one at a time with a fixed pause between them. A failure is
//! recorded for its item and the batch moves on; the caller merges whatever
//! succeeded through the merge engine.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use super::{RetryPolicy, TranslationProvider};
use crate::core::{
    catalog::Catalog,
    error::ProviderError,
    glossary::GlossaryDefinition,
    store::{TranslationEntry, TranslationStore},
};

const PROGRESS_EVERY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Glossary,
    String,
}

impl JobKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JobKind::Glossary => "glossary term",
            JobKind::String => "string",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationJob {
    pub kind: JobKind,
    /// Identifier, or the term itself for glossary jobs.
    pub key: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub source_lang: String,
    pub target_lang: String,
    pub request_delay: Duration,
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailure {
    pub kind: JobKind,
    pub key: String,
    pub error: ProviderError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    pub glossary: Vec<(String, String)>,
    pub strings: Vec<(String, String)>,
    pub failures: Vec<JobFailure>,
}

impl BatchResult {
    pub fn succeeded(&self) -> usize {
        self.glossary.len() + self.strings.len()
    }
}

/// Work still to do for `store`: glossary terms first, then catalog strings
/// in catalog order.
///
/// Entries holding a suggestion for the current source text are skipped
/// unless `force` is set.
pub fn plan_jobs(
    store: &TranslationStore,
    catalog: &Catalog,
    glossary: Option<&GlossaryDefinition>,
    force: bool,
) -> Vec<TranslationJob> {
    let wanted = |entry: Option<&TranslationEntry>| {
        force || !entry.is_some_and(|e| e.has_fresh_suggestion())
    };

    let glossary_jobs = glossary
        .map(GlossaryDefinition::terms)
        .unwrap_or_default()
        .into_iter()
        .filter(|(_, term)| wanted(store.glossary.get(*term)))
        .map(|(_, term)| TranslationJob {
            kind: JobKind::Glossary,
            key: term.to_string(),
            text: term.to_string(),
        });

    let string_jobs = catalog
        .records()
        .filter(|(_, r)| wanted(store.entries.get(&r.id)))
        .map(|(_, r)| TranslationJob {
            kind: JobKind::String,
            key: r.id.clone(),
            text: r.source_text.clone(),
        });

    glossary_jobs.chain(string_jobs).collect()
}

pub async fn run_batch<P: TranslationProvider>(
    provider: &P,
    jobs: Vec<TranslationJob>,
    settings: &BatchSettings,
) -> BatchResult {
    let mut result = BatchResult::default();
    let total = jobs.len();

    for (n, job) in jobs.into_iter().enumerate() {
        if n > 0 && !settings.request_delay.is_zero() {
            sleep(settings.request_delay).await;
        }

        let outcome = settings
            .retry
            .run(&job.key, || {
                provider.translate(&job.text, &settings.source_lang, &settings.target_lang)
            })
            .await;

        match outcome {
            Ok(translated) => match job.kind {
                JobKind::Glossary => result.glossary.push((job.key, translated)),
                JobKind::String => result.strings.push((job.key, translated)),
            },
            Err(error) => {
                warn!(key = %job.key, %error, "no suggestion");
                result.failures.push(JobFailure {
                    kind: job.kind,
                    key: job.key,
                    error,
                });
            }
        }

        if (n + 1) % PROGRESS_EVERY == 0 {
            info!(done = n + 1, total, lang = %settings.target_lang, "translation progress");
        }
    }

    result
}
