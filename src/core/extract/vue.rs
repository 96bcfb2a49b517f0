//! Vue single-file component scanner.
//!
//! Only the `<template>` block is scanned. Element text and a fixed set of
//! user-facing attributes are collected; bound attributes (`:title`), event
//! handlers and `{{ }}` interpolations are not.

use std::sync::LazyLock;

use regex::Regex;

use super::{ContextTag, Extract, RawString};
use crate::{core::error::MalformedSource, utils::contains_alphabetic};

static ELEMENT_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">([^<>{}\n]+?)<").unwrap());
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)(?:placeholder|title|aria-label|label)="([^"]+)""#).unwrap()
});

const TEMPLATE_OPEN: &str = "<template";
const TEMPLATE_CLOSE: &str = "</template>";

#[derive(Debug, Clone, Copy, Default)]
pub struct VueScanner;

impl Extract for VueScanner {
    fn extract(&self, content: &str) -> Result<Vec<RawString>, MalformedSource> {
        let Some(template) = template_block(content)? else {
            return Ok(Vec::new());
        };

        let mut found: Vec<(usize, RawString)> = Vec::new();

        for caps in ELEMENT_TEXT.captures_iter(template) {
            let Some(m) = caps.get(1) else { continue };
            let text = m.as_str().trim();
            if is_element_text(text) {
                found.push((m.start(), RawString::new(text, ContextTag::Text)));
            }
        }

        for caps in ATTRIBUTE.captures_iter(template) {
            let Some(m) = caps.get(1) else { continue };
            let text = m.as_str().trim();
            if !text.is_empty()
                && !text.starts_with(':')
                && !text.starts_with('{')
                && contains_alphabetic(text)
            {
                found.push((m.start(), RawString::new(text, ContextTag::Attribute)));
            }
        }

        found.sort_by_key(|(offset, _)| *offset);
        Ok(found.into_iter().map(|(_, s)| s).collect())
    }
}

/// Inner content of the outermost `<template>` block, if there is one.
fn template_block(content: &str) -> Result<Option<&str>, MalformedSource> {
    let Some(open) = content.find(TEMPLATE_OPEN) else {
        return Ok(None);
    };
    let Some(tag_end) = content[open..].find('>').map(|i| open + i + 1) else {
        return Err(MalformedSource("unterminated <template> tag".to_string()));
    };
    match content.rfind(TEMPLATE_CLOSE) {
        Some(close) if close >= tag_end => Ok(Some(&content[tag_end..close])),
        _ => Err(MalformedSource(
            "<template> block has no closing </template>".to_string(),
        )),
    }
}

fn is_element_text(text: &str) -> bool {
    text.chars().count() > 1
        && !text.starts_with(':')
        && !text.starts_with('@')
        && contains_alphabetic(text)
}
