//! Google Translate over the public `translate_a/single` endpoint.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::TranslationProvider;
use crate::core::error::ProviderError;

pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com";

#[derive(Debug, Clone)]
pub struct GoogleTranslateProvider {
    client: Client,
    base_url: String,
}

impl GoogleTranslateProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("transcat/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn request(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/translate_a/single", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Transient(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = format!("HTTP {status}");
            return Err(if is_transient_status(status) {
                ProviderError::Transient(message)
            } else {
                ProviderError::Permanent(message)
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Permanent(format!("unreadable response: {e}")))?;
        parse_translation(&body)
    }
}

impl TranslationProvider for GoogleTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, ProviderError> {
        debug!(%target, chars = text.chars().count(), "google translate request");
        self.request(text, source, target).await
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}

/// Join the translated segments of a `translate_a/single` response.
///
/// The body looks like `[[["공격", "Attack", null, null, 10], ...], null, "en", ...]`.
fn parse_translation(body: &Value) -> Result<String, ProviderError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::Permanent("response has no translation segments".into()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.trim().is_empty() {
        return Err(ProviderError::Permanent("empty translation".into()));
    }
    Ok(translated)
}
