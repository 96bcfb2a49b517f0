//! Identifier assignment.
//!
//! An identifier is the dotted section path followed by the context tag and
//! the position of the string within its section:
//!
//! ```text
//! gear_optimizer/content/faq  +  header  +  3   ->  gear_optimizer.content.faq.header.3
//! ```
//!
//! The position counts every string of the section in extraction order, not
//! per context tag. Inserting a string therefore shifts the identifiers of all
//! strings after it in the same section; strings before it, and every other
//! section, keep theirs.

use std::collections::HashMap;

use crate::core::{error::IdentifierCollisionError, extract::ContextTag};

/// Turn a `/`-separated section name into a dotted identifier prefix.
///
/// Dots and whitespace inside a segment become `_` so that every `.` in an
/// identifier is a hierarchy boundary.
pub fn section_path(section: &str) -> String {
    section
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            segment
                .chars()
                .map(|c| if c == '.' || c.is_whitespace() { '_' } else { c })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(".")
}

pub fn make_id(section: &str, context: ContextTag, index: usize) -> String {
    format!("{}.{}.{}", section_path(section), context.as_str(), index)
}

#[derive(Debug)]
struct Claim {
    section: String,
    text: String,
}

/// Hands out identifiers for one catalog generation and refuses duplicates.
#[derive(Debug, Default)]
pub struct IdAssigner {
    ids: HashMap<String, Claim>,
    /// Dotted section path -> (section, source file).
    sections: HashMap<String, (String, String)>,
}

impl IdAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a section before assigning ids in it.
    ///
    /// Two files (or two section names that sanitize to the same path) may not
    /// share a section.
    pub fn claim_section(
        &mut self,
        section: &str,
        source_file: &str,
    ) -> Result<(), IdentifierCollisionError> {
        let path = section_path(section);
        if let Some((_, first_file)) = self.sections.get(&path) {
            return Err(IdentifierCollisionError::Section {
                section: section.to_string(),
                first_file: first_file.clone(),
                second_file: source_file.to_string(),
            });
        }
        self.sections
            .insert(path, (section.to_string(), source_file.to_string()));
        Ok(())
    }

    pub fn assign(
        &mut self,
        section: &str,
        context: ContextTag,
        index: usize,
        text: &str,
    ) -> Result<String, IdentifierCollisionError> {
        let id = make_id(section, context, index);
        if let Some(first) = self.ids.get(&id) {
            return Err(IdentifierCollisionError::Identifier {
                id,
                first_section: first.section.clone(),
                first_text: first.text.clone(),
                second_section: section.to_string(),
                second_text: text.to_string(),
            });
        }
        self.ids.insert(
            id.clone(),
            Claim {
                section: section.to_string(),
                text: text.to_string(),
            },
        );
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
