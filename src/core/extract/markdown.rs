//! Markdown scanner: headers, list items and paragraphs.

use std::sync::LazyLock;

use regex::Regex;

use super::{ContextTag, Extract, RawString};
use crate::core::error::MalformedSource;

static HEADER_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#+\s*").unwrap());
static ORDERED_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s").unwrap());
static ITEM_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*\d.]+\s*").unwrap());

/// Paragraphs this short are usually fragments (link labels, separators).
const MIN_PARAGRAPH_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownScanner;

impl Extract for MarkdownScanner {
    fn extract(&self, content: &str) -> Result<Vec<RawString>, MalformedSource> {
        let mut strings = Vec::new();
        let mut block: Vec<&str> = Vec::new();
        let mut in_fence = false;

        for line in content.lines() {
            let stripped = line.trim();

            if stripped.starts_with("```") {
                flush_paragraph(&mut block, &mut strings);
                in_fence = !in_fence;
                continue;
            }
            if in_fence {
                continue;
            }

            if stripped.starts_with('#') {
                flush_paragraph(&mut block, &mut strings);
                let text = HEADER_MARKER.replace(stripped, "");
                if !text.is_empty() {
                    strings.push(RawString::new(text, ContextTag::Header));
                }
            } else if is_list_item(stripped) {
                flush_paragraph(&mut block, &mut strings);
                let text = ITEM_MARKER.replace(stripped, "");
                if !text.is_empty() {
                    strings.push(RawString::new(text, ContextTag::ListItem));
                }
            } else if stripped.is_empty() || stripped.starts_with('|') {
                flush_paragraph(&mut block, &mut strings);
            } else {
                block.push(stripped);
            }
        }

        flush_paragraph(&mut block, &mut strings);
        Ok(strings)
    }
}

fn is_list_item(line: &str) -> bool {
    line.starts_with("- ") || line.starts_with("* ") || ORDERED_ITEM.is_match(line)
}

fn flush_paragraph(block: &mut Vec<&str>, strings: &mut Vec<RawString>) {
    if block.is_empty() {
        return;
    }
    let paragraph = block.join(" ");
    block.clear();
    if paragraph.chars().count() > MIN_PARAGRAPH_CHARS {
        strings.push(RawString::new(paragraph, ContextTag::Paragraph));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn scan(content: &str) -> Vec<(ContextTag, String)> {
        MarkdownScanner
            .extract(content)
            .unwrap()
            .into_iter()
            .map(|s| (s.context, s.text))
            .collect()
    }

    #[test]
    fn test_headers_items_and_paragraphs_in_document_order() {
        let content = "# Gear Guide\n\
                       \n\
                       Upgrade your gear before the\n\
                       next kingdom event.\n\
                       \n\
                       ## Materials\n\
                       - Mithril\n\
                       * Satin\n\
                       3. Gilded Threads\n";

        assert_eq!(
            scan(content),
            vec![
                (ContextTag::Header, "Gear Guide".to_string()),
                (
                    ContextTag::Paragraph,
                    "Upgrade your gear before the next kingdom event.".to_string()
                ),
                (ContextTag::Header, "Materials".to_string()),
                (ContextTag::ListItem, "Mithril".to_string()),
                (ContextTag::ListItem, "Satin".to_string()),
                (ContextTag::ListItem, "Gilded Threads".to_string()),
            ]
        );
    }

    #[test]
    fn test_short_paragraphs_are_dropped() {
        assert!(scan("See below.\n").is_empty());
        assert_eq!(
            scan("Exactly eleven\n"),
            vec![(ContextTag::Paragraph, "Exactly eleven".to_string())]
        );
    }

    #[test]
    fn test_code_fences_and_tables_are_skipped() {
        let content = "```bash\n# not a header\nnpm run build --production\n```\n\
                       | Stat | Value |\n\
                       |------|-------|\n\
                       Text after the table is kept.\n";

        assert_eq!(
            scan(content),
            vec![(ContextTag::Paragraph, "Text after the table is kept.".to_string())]
        );
    }

    #[test]
    fn test_paragraph_is_flushed_before_header() {
        let content = "An introduction paragraph\n# Next Section\n";
        assert_eq!(
            scan(content),
            vec![
                (ContextTag::Paragraph, "An introduction paragraph".to_string()),
                (ContextTag::Header, "Next Section".to_string()),
            ]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let content = "- Attack\n- Attack\n";
        assert_eq!(scan(content).len(), 2);
    }

    #[test]
    fn test_empty_markers_produce_nothing() {
        assert!(scan("#\n- \n").is_empty());
    }
}
