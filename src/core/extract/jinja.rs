//! Jinja2 template scanner.
//!
//! Collects element text and user-facing attributes from the whole file,
//! skipping anything inside `{{ }}` / `{% %}` and the bodies of `<script>` and
//! `<style>` elements.

use std::sync::LazyLock;

use regex::Regex;

use super::{ContextTag, Extract, RawString};
use crate::{core::error::MalformedSource, utils::contains_alphabetic};

static ELEMENT_TEXT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">([^<>{%}]+?)<").unwrap());
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)(?:placeholder|title|aria-label)="([^"{%]+)""#).unwrap()
});
static CODE_ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)>").unwrap());

#[derive(Debug, Clone, Copy, Default)]
pub struct JinjaScanner;

impl Extract for JinjaScanner {
    fn extract(&self, content: &str) -> Result<Vec<RawString>, MalformedSource> {
        // Replace code bodies with spaces so offsets stay comparable.
        let cleaned = CODE_ELEMENT.replace_all(content, |caps: &regex::Captures| {
            " ".repeat(caps[0].len())
        });

        let mut found: Vec<(usize, RawString)> = Vec::new();

        for caps in ELEMENT_TEXT.captures_iter(&cleaned) {
            let Some(m) = caps.get(1) else { continue };
            let text = m.as_str().trim();
            if text.chars().count() > 1 && contains_alphabetic(text) {
                found.push((m.start(), RawString::new(text, ContextTag::Text)));
            }
        }

        for caps in ATTRIBUTE.captures_iter(&cleaned) {
            let Some(m) = caps.get(1) else { continue };
            let text = m.as_str().trim();
            if !text.is_empty() && contains_alphabetic(text) {
                found.push((m.start(), RawString::new(text, ContextTag::Attribute)));
            }
        }

        found.sort_by_key(|(offset, _)| *offset);
        Ok(found.into_iter().map(|(_, s)| s).collect())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn scan(content: &str) -> Vec<(ContextTag, String)> {
        JinjaScanner
            .extract(content)
            .unwrap()
            .into_iter()
            .map(|s| (s.context, s.text))
            .collect()
    }

    #[test]
    fn test_template_tags_are_skipped() {
        let content = r#"{% extends "base.html" %}
<table>
  <tr><th>Hero Name</th><th>{{ _("Power") }}</th></tr>
  <tr><td>{% if hero %}{{ hero.name }}{% endif %}</td></tr>
</table>
<input title="Filter heroes" placeholder="{{ hint }}">"#;

        assert_eq!(
            scan(content),
            vec![
                (ContextTag::Text, "Hero Name".to_string()),
                (ContextTag::Attribute, "Filter heroes".to_string()),
            ]
        );
    }

    #[test]
    fn test_script_and_style_bodies_are_ignored() {
        let content = "<style>p > a { color: red; }</style>\n\
                       <script>if (a > b && b < c) {}</script>\n\
                       <p>Visible text</p>";

        assert_eq!(
            scan(content),
            vec![(ContextTag::Text, "Visible text".to_string())]
        );
    }

    #[test]
    fn test_symbols_only_are_skipped() {
        assert_eq!(
            scan("<td>12.5%</td><td>-- / --</td><td>OK!</td>"),
            vec![(ContextTag::Text, "OK!".to_string())]
        );
    }
}
