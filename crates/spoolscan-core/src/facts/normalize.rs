//! Whitespace normalization for OCR text.

use super::rules::patterns::WHITESPACE;

/// Collapse every whitespace run (newlines and tabs included) to one space
/// and trim the ends. Nothing else changes.
pub fn normalize(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}
