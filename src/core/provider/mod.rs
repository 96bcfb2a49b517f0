//! Machine translation providers.
//!
//! A provider is an explicit handle passed to the batch runner; nothing here
//! keeps process-wide state. Retry behaviour is injected through
//! [`RetryPolicy`].

pub mod batch;
pub mod google;
pub mod retry;

use std::future::Future;

pub use batch::{
    BatchResult, BatchSettings, JobFailure, JobKind, TranslationJob, plan_jobs, run_batch,
};
pub use google::GoogleTranslateProvider;
pub use retry::RetryPolicy;

use crate::core::error::ProviderError;

pub trait TranslationProvider: Send + Sync {
    /// Translate `text` from `source` to `target` (provider language codes).
    ///
    /// Errors must say whether a retry could help.
    fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;
}
