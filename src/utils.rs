//! Small text helpers shared by the scanners and the reports.

/// Checks if the text contains at least one Unicode alphabetic character.
///
/// Scanners use this to drop numbers and punctuation-only fragments.
///
/// # Examples
///
/// ```
/// use transcat::utils::contains_alphabetic;
///
/// assert!(contains_alphabetic("Attack"));
/// assert!(contains_alphabetic("공격"));
/// assert!(contains_alphabetic("Tier 5"));
/// assert!(!contains_alphabetic("123"));
/// assert!(!contains_alphabetic("---"));
/// assert!(!contains_alphabetic(""));
/// ```
pub fn contains_alphabetic(text: &str) -> bool {
    text.chars().any(|c| c.is_alphabetic())
}

/// Cut `text` to at most `max` characters, appending `...` when cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte, _)) => format!("{}...", &text[..byte]),
        None => text.to_string(),
    }
}
