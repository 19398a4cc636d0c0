//! Base tokenization for bracket content
//!
//! This module provides the raw tokenization of bracket interiors using the
//! logos lexer library. The size classifier in [`crate::sizing`] consumes
//! these tokens to decide whether a bracket holds a size sequence.
//!
//! Classification must be total: any character the lexer cannot account for
//! disqualifies the bracket from being a size sequence, it never aborts the
//! scan.

use logos::Logos;

/// Tokens that may legally appear inside a size-sequence bracket.
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum SizeToken {
    /// Separator between variants; OCR output mixes typographic dashes in
    #[token("-")]
    #[token("–")]
    #[token("—")]
    #[token("―")]
    Dash,

    /// Alphanumeric size code such as "2XL"
    #[regex(r"[0-9]+[A-Za-z]+", |lex| lex.slice().to_string(), priority = 3)]
    Code(String),

    /// Plain non-negative integer
    #[regex(r"[0-9]+", |lex| lex.slice().to_string())]
    Number(String),

    /// Alphabetic size code ("S", "XL") or the "x" placeholder
    #[regex(r"[A-Za-z]+", |lex| lex.slice().to_string())]
    Word(String),

    #[regex(r"[ \t]+")]
    Whitespace,
}

impl SizeToken {
    /// Check if this token carries a candidate variant value (anything but
    /// separators and whitespace).
    pub fn is_value(&self) -> bool {
        matches!(
            self,
            SizeToken::Code(_) | SizeToken::Number(_) | SizeToken::Word(_)
        )
    }
}

/// Tokenize the interior of a bracket.
///
/// Returns `None` as soon as a character falls outside the size-sequence
/// alphabet; the caller then treats the bracket as an ordinary grouping.
pub fn tokenize(content: &str) -> Option<Vec<SizeToken>> {
    let mut lexer = SizeToken::lexer(content);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push(token),
            Err(()) => return None,
        }
    }

    Some(tokens)
}
