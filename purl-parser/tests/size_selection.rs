//! Integration tests for bracket scanning and size selection.

use purl_parser::diagnostics::WarningKind;
use purl_parser::sizing::{select_sizes, size_sequence_tokens};

#[test]
fn test_cast_on_line_collapses_to_second_size() {
    let text = "Option one: Judy's magic cast-on. With 3.5mm circulars, cast on 370 (406-442-478-514-586-622-658) sts = 203 sts per needle.";
    let (out, warnings) = select_sizes(text, 0);
    assert_eq!(
        out,
        "Option one: Judy's magic cast-on. With 3.5mm circulars, cast on 406 sts = 203 sts per needle."
    );
    assert!(warnings.is_empty());
}

#[test]
fn test_multiple_sequences_on_one_line() {
    let text = "rows 72 (72-78) and 92 (82-100) each get a buttonhole";
    let (out, _) = select_sizes(text, 0);
    assert_eq!(out, "rows 72 and 82 each get a buttonhole");
    let (out, _) = select_sizes(text, 1);
    assert_eq!(out, "rows 78 and 100 each get a buttonhole");
}

#[test]
fn test_range_line_keeps_range_and_drops_bracket() {
    let text = "rows 20 to 59 (59-63-67-67) work stockinette";
    let (out, _) = select_sizes(text, 0);
    assert_eq!(out, "rows 20 to 59 work stockinette");
}

#[test]
fn test_stitch_groups_survive_next_to_sequences() {
    let text = "(k2tog) 3 times, (yo, k1) 5 times, then 8 (9-10-11) reps";
    let (out, warnings) = select_sizes(text, 2);
    assert_eq!(out, "(k2tog) 3 times, (yo, k1) 5 times, then 10 reps");
    assert!(warnings.is_empty());
}

#[test]
fn test_ocr_linewrap_inside_bracket() {
    let text = "repeat [ ] another 8 (9 - 10 - 11 -\n11 - 14 - 15 - 16) times\nnext line stays put";
    let (out, warnings) = select_sizes(text, 0);
    assert_eq!(out, "repeat [ ] another 9 times\nnext line stays put");
    assert!(warnings.is_empty());
}

#[test]
fn test_letter_size_sequences() {
    let (out, _) = select_sizes("shown in S (M-L-XL-2XL)", 3);
    assert_eq!(out, "shown in 2XL");
}

#[test]
fn test_every_bracket_is_classified() {
    // One size sequence, one ordinary group, one unbalanced tail: all three
    // accounted for, nothing silently dropped.
    let text = "51 (56-65) sts, (k2tog) twice, then (unclosed 56 - 65";
    let (out, warnings) = select_sizes(text, 0);
    assert_eq!(out, "56 sts, (k2tog) twice, then (unclosed 56 - 65");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::Structural);
}

#[test]
fn test_sequence_token_classification() {
    assert_eq!(
        size_sequence_tokens("406 - 442 - 478"),
        Some(vec!["406".into(), "442".into(), "478".into()])
    );
    assert_eq!(
        size_sequence_tokens("x-x-66-72"),
        Some(vec!["x".into(), "x".into(), "66".into(), "72".into()])
    );
    assert_eq!(size_sequence_tokens("S - M - 2XL"), Some(vec!["S".into(), "M".into(), "2XL".into()]));
    // OCR mixes typographic dashes into the separator position.
    assert_eq!(
        size_sequence_tokens("406 — 442 – 478"),
        Some(vec!["406".into(), "442".into(), "478".into()])
    );
    // Doubled dash: empty placeholder token.
    assert_eq!(
        size_sequence_tokens("78--84"),
        Some(vec!["78".into(), "".into(), "84".into()])
    );
    assert_eq!(size_sequence_tokens("k2tog, yo"), None);
    assert_eq!(size_sequence_tokens("left-leaning"), None);
    assert_eq!(size_sequence_tokens("见 折叠边"), None);
}

#[test]
fn test_selection_is_idempotent() {
    let text = "cast on 370 (406-442) sts\n(k2tog) 3 times\nrows 72 (72-78) and 92 (82-100)";
    let (once, _) = select_sizes(text, 1);
    let (twice, _) = select_sizes(&once, 1);
    assert_eq!(once, twice);
}
