//! Bracket scanning and size-variant selection
//!
//! Multi-size patterns write one measurement per garment size as a bracketed
//! dash-separated run, usually with the smallest size as a bare number in
//! front: `cast on 370 (406-442-478-514) sts`. Working a single size means
//! collapsing every such sequence down to one value while leaving every
//! ordinary bracket group (`(k2tog) 3 times`) untouched.
//!
//! The scanner tracks bracket depth across line boundaries: OCR line-wraps
//! routinely split a sequence mid-bracket, so while a bracket is open,
//! subsequent input lines are joined with a single space before the content
//! is classified. A bracket is never broken across output lines.
//!
//! Classification is total. Every close bracket either completes a size
//! sequence (replaced by the selected variant) or an ordinary group
//! (reproduced verbatim, glyphs normalized to the ASCII pair). Text that
//! ends inside an open bracket is passed through unmodified from the
//! unmatched open onward, with a structural warning.

use crate::diagnostics::{Warning, WarningKind};
use crate::token::{self, SizeToken};

/// Alphabetic size codes accepted inside a size sequence.
pub const SIZE_CODES: &[&str] = &["S", "M", "L", "XL", "2XL", "3XL", "4XL"];

/// Split bracket content into its dash-separated variant tokens.
///
/// Returns `None` unless every token is a non-negative integer, a known size
/// code, or the "x" placeholder. An empty token (from a doubled dash) is
/// accepted as a placeholder.
pub fn size_sequence_tokens(content: &str) -> Option<Vec<String>> {
    let lexed = token::tokenize(content)?;

    let mut variants = Vec::new();
    let mut current: Option<String> = None;
    for tok in lexed {
        match tok {
            SizeToken::Whitespace => {}
            SizeToken::Dash => variants.push(current.take().unwrap_or_default()),
            SizeToken::Number(text) => {
                if current.is_some() {
                    return None;
                }
                current = Some(text);
            }
            SizeToken::Word(text) => {
                if current.is_some() || !(is_placeholder(&text) || is_size_code(&text)) {
                    return None;
                }
                current = Some(text);
            }
            SizeToken::Code(text) => {
                if current.is_some() || !is_size_code(&text) {
                    return None;
                }
                current = Some(text);
            }
        }
    }
    variants.push(current.unwrap_or_default());
    Some(variants)
}

fn is_placeholder(text: &str) -> bool {
    text.eq_ignore_ascii_case("x")
}

fn is_size_code(text: &str) -> bool {
    SIZE_CODES.iter().any(|code| code.eq_ignore_ascii_case(text))
}

/// Collapse every size sequence in `text` to the variant at `variant_index`
/// (0-based within the bracket; a bare number directly before the bracket is
/// the pre-bracket variant and is consumed by the replacement).
///
/// Pure and idempotent: the output contains no size sequences, so a second
/// pass returns it unchanged.
pub fn select_sizes(text: &str, variant_index: usize) -> (String, Vec<Warning>) {
    let mut warnings = Vec::new();
    let mut out = String::new();
    // The logical line being assembled (with replacements applied) and the
    // same span of input reproduced verbatim, for unbalanced-tail recovery.
    let mut pending = String::new();
    let mut raw = String::new();
    let mut opens: Vec<(usize, usize)> = Vec::new();

    let mut first_line = true;
    for line in text.lines() {
        if !first_line {
            if opens.is_empty() {
                out.push_str(&pending);
                out.push('\n');
                pending.clear();
                raw.clear();
            } else {
                pending.push(' ');
                raw.push('\n');
            }
        }
        first_line = false;

        for c in line.chars() {
            raw.push(c);
            match c {
                '(' | '（' => {
                    opens.push((pending.len(), raw.len() - c.len_utf8()));
                    pending.push('(');
                }
                ')' | '）' => match opens.pop() {
                    None => pending.push(')'),
                    Some((open_pos, _)) => {
                        close_bracket(&mut pending, open_pos, variant_index, &mut warnings);
                    }
                },
                _ => pending.push(c),
            }
        }
    }

    if let Some(&(open_pending, open_raw)) = opens.first() {
        warnings.push(Warning::new(
            WarningKind::Structural,
            "unbalanced bracket: text ends inside an open bracket; tail left unmodified",
        ));
        out.push_str(&pending[..open_pending]);
        out.push_str(&raw[open_raw..]);
    } else {
        out.push_str(&pending);
    }
    if text.ends_with('\n') {
        out.push('\n');
    }

    (out, warnings)
}

/// Finish the bracket whose `(` sits at `open_pos` in `pending`.
fn close_bracket(
    pending: &mut String,
    open_pos: usize,
    variant_index: usize,
    warnings: &mut Vec<Warning>,
) {
    let content = pending[open_pos + 1..].to_string();
    let Some(variants) = size_sequence_tokens(&content) else {
        pending.push(')');
        return;
    };
    match variants.get(variant_index) {
        Some(selected) => {
            let selected = selected.clone();
            let start = lead_start(pending, open_pos);
            pending.truncate(start);
            pending.push_str(&selected);
        }
        None => {
            warnings.push(Warning::new(
                WarningKind::Structural,
                format!(
                    "size sequence ({}) has {} variants but variant index {} was requested; bracket left as written",
                    content.trim(),
                    variants.len(),
                    variant_index
                ),
            ));
            pending.push(')');
        }
    }
}

/// Find where the replaced span starts: at a bare leading number (or "x"
/// placeholder) directly before the bracket, else at the bracket itself.
fn lead_start(pending: &str, open_pos: usize) -> usize {
    let trimmed = pending[..open_pos].trim_end_matches([' ', '\t']);

    let digits_len: usize = trimmed
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .count();
    if digits_len > 0 {
        let start = trimmed.len() - digits_len;
        if standalone_at(pending, start) {
            return start;
        }
    } else if let Some(prev) = trimmed.chars().next_back() {
        if prev == 'x' || prev == 'X' {
            let start = trimmed.len() - 1;
            if standalone_at(pending, start) {
                return start;
            }
        }
    }

    open_pos
}

/// A lead token must not butt up against ASCII letters or digits; CJK text
/// directly before it ("第72") is fine.
fn standalone_at(pending: &str, start: usize) -> bool {
    pending[..start]
        .chars()
        .next_back()
        .map_or(true, |p| !p.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(text: &str, variant: usize) -> String {
        select_sizes(text, variant).0
    }

    #[test]
    fn test_collapses_sequence_with_leading_number() {
        let (out, warnings) = select_sizes("cast on 370 (406-442-478-514) sts", 0);
        assert_eq!(out, "cast on 406 sts");
        assert!(warnings.is_empty());
        assert_eq!(select("cast on 370 (406-442-478-514) sts", 2), "cast on 478 sts");
    }

    #[test]
    fn test_collapses_sequence_without_lead() {
        assert_eq!(select("sizes (S-M-L-XL) included", 1), "sizes M included");
    }

    #[test]
    fn test_ordinary_group_untouched() {
        let text = "(k2tog) 3 times, (yo, k1) 5 times";
        assert_eq!(select(text, 0), text);
    }

    #[test]
    fn test_fullwidth_glyphs_normalized() {
        assert_eq!(select("第72 （72-78-84）行", 1), "第78行");
        assert_eq!(select("织平针（见 折叠边）", 0), "织平针(见 折叠边)");
    }

    #[test]
    fn test_sequence_split_across_lines_rejoined() {
        let text = "repeat 8 (9 - 10 -\n11 - 11) more times";
        assert_eq!(select(text, 3), "repeat 11 more times");
    }

    #[test]
    fn test_placeholder_lead_and_values() {
        assert_eq!(select("row x (x-x-66-72)", 1), "row x");
        assert_eq!(select("row x (x-x-66-72)", 2), "row 66");
    }

    #[test]
    fn test_unbalanced_tail_left_verbatim() {
        let (out, warnings) = select_sizes("fine 51 (56-65) sts\nbroken （56 - 65", 0);
        assert_eq!(out, "fine 56 sts\nbroken （56 - 65");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::Structural);
    }

    #[test]
    fn test_stray_close_kept() {
        assert_eq!(select("odd ) text", 0), "odd ) text");
    }

    #[test]
    fn test_variant_out_of_range_warns_and_keeps_bracket() {
        let (out, warnings) = select_sizes("51 (56-65) sts", 5);
        assert_eq!(out, "51 (56-65) sts");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::Structural);
    }

    #[test]
    fn test_double_dash_placeholder() {
        assert_eq!(select("72 (78--84)", 1), "");
        assert_eq!(select("72 (78--84)", 2), "84");
    }

    #[test]
    fn test_idempotent() {
        let text = "cast on 370 (406-442) sts, (k2tog) 3 times\n第72 （72-78）行";
        let (once, _) = select_sizes(text, 0);
        let (twice, _) = select_sizes(&once, 0);
        assert_eq!(once, twice);
    }
}
