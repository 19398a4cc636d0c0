//! OCR tidying transformations
//!
//! OCR'd pattern text arrives with garbled vocabulary, fullwidth punctuation
//! and ragged whitespace. This pass repairs the text before any structural
//! parsing runs, so the bracket scanner and the directive grammar see one
//! canonical spelling of everything they match on.
//!
//! The pass is pure text-to-text and idempotent: tidying already-tidied text
//! is a no-op.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Three or more consecutive blank lines collapse to a single blank line.
static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Interior runs of spaces and tabs (not at line start) collapse to one space.
static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// Literal replacement rules for OCR-garbled vocabulary, applied in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanupRules {
    pub terms: Vec<(String, String)>,
}

impl CleanupRules {
    pub fn new(terms: Vec<(String, String)>) -> Self {
        Self { terms }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Tidy raw OCR text: fold glyph variants, apply term corrections, repair
/// whitespace.
pub fn tidy(text: &str, rules: &CleanupRules) -> String {
    let mut text = fold_glyphs(text);

    for (wrong, right) in &rules.terms {
        if !wrong.is_empty() {
            text = text.replace(wrong.as_str(), right.as_str());
        }
    }

    let text = repair_whitespace(&text);
    BLANK_RUN.replace_all(&text, "\n\n").into_owned()
}

/// Fold fullwidth punctuation and digits to their ASCII forms.
///
/// Bracket glyphs are left alone: the scanner in [`crate::sizing`] owns
/// bracket normalization and needs to see the originals to reproduce
/// non-size groupings faithfully.
fn fold_glyphs(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '：' => ':',
            '，' => ',',
            '　' => ' ',
            '０'..='９' => {
                // Fullwidth digits are a contiguous block offset from ASCII.
                char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}

/// Collapse interior whitespace runs while preserving leading indentation
/// and trimming trailing whitespace.
fn repair_whitespace(text: &str) -> String {
    let mut lines = Vec::new();
    for line in text.lines() {
        let indent_len = line.len() - line.trim_start_matches([' ', '\t']).len();
        let (indent, body) = line.split_at(indent_len);
        let body = SPACE_RUN.replace_all(body.trim_end(), " ");
        lines.push(format!("{}{}", indent, body));
    }
    let mut result = lines.join("\n");
    if text.ends_with('\n') {
        result.push('\n');
    }
    result
}
