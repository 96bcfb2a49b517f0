use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

/// Review status of one translation.
///
/// Variants are declared in lifecycle order; `Ord` follows it.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Untranslated,
    #[value(name = "needs_review")]
    NeedsReview,
    Draft,
    Submitted,
    Approved,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Untranslated,
        Status::NeedsReview,
        Status::Draft,
        Status::Submitted,
        Status::Approved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Untranslated => "untranslated",
            Status::NeedsReview => "needs_review",
            Status::Draft => "draft",
            Status::Submitted => "submitted",
            Status::Approved => "approved",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    /// Statuses only a person can set.
    pub fn is_human(self) -> bool {
        self >= Status::Draft
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Translation of one identifier (or glossary term) into one language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationEntry {
    /// Human-authored or accepted translation.
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "String::is_empty"
    )]
    pub text: String,
    /// Last machine suggestion, independent of `text`.
    #[serde(default, alias = "ai_suggestion", skip_serializing_if = "Option::is_none")]
    pub ai_suggestion: Option<String>,
    #[serde(default)]
    pub status: Status,
    /// The id is missing from the current catalog. `status` keeps the state
    /// to return to if it comes back unchanged.
    #[serde(default, skip_serializing_if = "is_false")]
    pub orphaned: bool,
    /// `ai_suggestion` was made for an older source text.
    #[serde(default, skip_serializing_if = "is_false")]
    pub suggestion_stale: bool,
    /// Fingerprint of the source text this entry was last merged against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
}

impl TranslationEntry {
    pub fn untranslated(source_hash: Option<String>) -> Self {
        Self {
            source_hash,
            ..Self::default()
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    /// A usable suggestion exists for the current source text.
    pub fn has_fresh_suggestion(&self) -> bool {
        self.ai_suggestion.as_deref().is_some_and(|s| !s.is_empty()) && !self.suggestion_stale
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
