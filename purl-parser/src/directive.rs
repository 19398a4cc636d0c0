//! Row directive grammar
//!
//! Recognizes the row-reference expressions a section line may carry and
//! extracts their parameters. The grammar is declarative: an ordered table
//! of named regex patterns, tried in declaration order, most specific first,
//! so a repeat-of-range line is never misread as a plain range and a
//! conjunction is never swallowed by the single-row pattern.
//!
//! Grammar order:
//! 1. repeat-range with a declared target ("rows 92 to 103: repeat rows 88 to 91 again 3 times")
//! 2. single row mirroring another ("row 14: repeat row 10")
//! 3. repeat-range without a target ("repeat rows 40 to 59 again once")
//! 4. parity-filtered range ("rows 11 to 18, all odd rows: ...")
//! 5. range ("rows 20 to 59 ...")
//! 6. conjunction ("rows 32 and 52 ...")
//! 7. single ("row 9 ...")
//! 8. section parity rule ("odd rows: purl") — no row numbers, used by gap-fill

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Which grammar rule a line matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirectiveKind {
    RepeatWithTarget,
    Mirror,
    RepeatStandalone,
    ParityRange,
    Range,
    Conjunction,
    Single,
    ParityRule,
}

/// Grammar patterns as regex rules, tried in declaration order.
const DIRECTIVE_PATTERNS: &[(DirectiveKind, &str)] = &[
    (
        DirectiveKind::RepeatWithTarget,
        r"(?i)^rows?\s+(?P<ts>\d+)\s*(?:to|through|[-–])\s*(?P<te>\d+)\s*[:：]?\s*repeat\s+rows?\s+(?P<a>\d+)\s*(?:to|through|and|&|,|[-–])\s*(?:rows?\s+)?(?P<b>\d+)(?:\s*,?\s*(?:again\s+)?(?:(?P<k>\d+)\s*(?:more\s+)?times?|(?P<kw>once|twice)))?",
    ),
    (
        DirectiveKind::Mirror,
        r"(?i)^rows?\s+(?P<t>\d+)\s*[:：]?\s*repeat\s+rows?\s+(?P<a>\d+)(?P<rest>.*)$",
    ),
    (
        DirectiveKind::RepeatStandalone,
        r"(?i)^repeat\s+rows?\s+(?P<a>\d+)\s*(?:to|through|and|&|,|[-–])\s*(?:rows?\s+)?(?P<b>\d+)(?:\s*,?\s*(?:again\s+)?(?:(?P<k>\d+)\s*(?:more\s+)?times?|(?P<kw>once|twice)))?",
    ),
    (
        DirectiveKind::ParityRange,
        r"(?i)^rows?\s+(?P<a>\d+)\s*(?:to|through|[-–])\s*(?P<b>\d+)\s*,?\s*(?:all\s+)?(?P<par>odd|even)(?:-numbered)?\s+rows",
    ),
    (
        DirectiveKind::Range,
        r"(?i)^rows?\s+(?P<a>\d+)\s*(?:to|through|[-–])\s*(?P<b>\d+)",
    ),
    (
        DirectiveKind::Conjunction,
        r"(?i)^rows?\s+(?P<list>\d+(?:\s*(?:,|and|&)\s*\d+)+)",
    ),
    (DirectiveKind::Single, r"(?i)^rows?\s+(?P<n>\d+)"),
    (
        DirectiveKind::ParityRule,
        r"(?i)^(?:all\s+)?(?P<par>odd|even)(?:-numbered)?\s+rows?\s*[:：]?\s*(?P<stitch>.+?)\s*$",
    ),
];

static COMPILED: Lazy<Vec<(DirectiveKind, Regex)>> = Lazy::new(|| {
    DIRECTIVE_PATTERNS
        .iter()
        .map(|(kind, pattern)| {
            let regex = Regex::new(pattern).expect("directive grammar pattern must compile");
            (*kind, regex)
        })
        .collect()
});

/// Cheap probe: does the line look like it names a row at all? Lines that
/// pass the probe but match no grammar rule earn a structural warning.
static DIRECTIVE_PROBE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:rows?\s+\d|repeat\s+rows?\s+\d)").unwrap());

/// A mirror source reference must not actually be a range ("repeat rows 88
/// to 91"); the regex crate has no lookahead, so the tail is checked here.
static MIRROR_REJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(?:to\b|through\b|[-–])").unwrap());

/// Row parity, for filtered ranges and gap-fill rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Odd,
    Even,
}

impl Parity {
    pub fn matches(self, row: u32) -> bool {
        match self {
            Parity::Odd => row % 2 == 1,
            Parity::Even => row % 2 == 0,
        }
    }

    fn parse(text: &str) -> Self {
        if text.eq_ignore_ascii_case("odd") {
            Parity::Odd
        } else {
            Parity::Even
        }
    }
}

/// A recognized row-reference expression with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum RowDirective {
    /// "row 9"
    Single { row: u32 },
    /// "row 14: repeat row 10"
    Mirror { row: u32, source: u32 },
    /// "rows 32 and 52"
    Conjunction { rows: Vec<u32> },
    /// "rows 20 to 59", inclusive and contiguous
    Range { start: u32, end: u32 },
    /// "rows 11 to 18, all odd rows"
    ParityRange { start: u32, end: u32, parity: Parity },
    /// "repeat rows 40 to 59 again once", with or without a declared target
    RepeatRange {
        source_start: u32,
        source_end: u32,
        times: Option<u32>,
        target: Option<(u32, u32)>,
    },
    /// "odd rows: purl" — a section-level default, not a row reference
    ParityRule { parity: Parity, stitch: String },
}

/// Match a line against the grammar, most specific pattern first.
pub fn match_directive(line: &str) -> Option<RowDirective> {
    let line = line.trim();
    for (kind, regex) in COMPILED.iter() {
        if let Some(caps) = regex.captures(line) {
            if let Some(directive) = extract(*kind, &caps) {
                return Some(directive);
            }
        }
    }
    None
}

/// Whether an unmatched line still looks like a row directive.
pub fn looks_like_directive(line: &str) -> bool {
    DIRECTIVE_PROBE.is_match(line.trim())
}

fn extract(kind: DirectiveKind, caps: &Captures<'_>) -> Option<RowDirective> {
    match kind {
        DirectiveKind::RepeatWithTarget => Some(RowDirective::RepeatRange {
            source_start: cap_u32(caps, "a")?,
            source_end: cap_u32(caps, "b")?,
            times: cap_times(caps),
            target: Some((cap_u32(caps, "ts")?, cap_u32(caps, "te")?)),
        }),
        DirectiveKind::Mirror => {
            let rest = caps.name("rest").map_or("", |m| m.as_str());
            if MIRROR_REJECT.is_match(rest) {
                return None;
            }
            Some(RowDirective::Mirror {
                row: cap_u32(caps, "t")?,
                source: cap_u32(caps, "a")?,
            })
        }
        DirectiveKind::RepeatStandalone => Some(RowDirective::RepeatRange {
            source_start: cap_u32(caps, "a")?,
            source_end: cap_u32(caps, "b")?,
            times: cap_times(caps),
            target: None,
        }),
        DirectiveKind::ParityRange => Some(RowDirective::ParityRange {
            start: cap_u32(caps, "a")?,
            end: cap_u32(caps, "b")?,
            parity: Parity::parse(caps.name("par")?.as_str()),
        }),
        DirectiveKind::Range => Some(RowDirective::Range {
            start: cap_u32(caps, "a")?,
            end: cap_u32(caps, "b")?,
        }),
        DirectiveKind::Conjunction => {
            let list = caps.name("list")?.as_str();
            let rows: Vec<u32> = list
                .split(|c: char| !c.is_ascii_digit())
                .filter(|part| !part.is_empty())
                .map(str::parse)
                .collect::<Result<_, _>>()
                .ok()?;
            if rows.len() < 2 {
                return None;
            }
            Some(RowDirective::Conjunction { rows })
        }
        DirectiveKind::Single => Some(RowDirective::Single {
            row: cap_u32(caps, "n")?,
        }),
        DirectiveKind::ParityRule => Some(RowDirective::ParityRule {
            parity: Parity::parse(caps.name("par")?.as_str()),
            stitch: caps.name("stitch")?.as_str().trim().to_string(),
        }),
    }
}

fn cap_u32(caps: &Captures<'_>, name: &str) -> Option<u32> {
    caps.name(name)?.as_str().parse().ok()
}

/// Repeat multiplicity: explicit digits, "once"/"twice", or absent.
fn cap_times(caps: &Captures<'_>) -> Option<u32> {
    if let Some(k) = cap_u32(caps, "k") {
        return Some(k);
    }
    match caps.name("kw").map(|m| m.as_str().to_ascii_lowercase()) {
        Some(word) if word == "once" => Some(1),
        Some(word) if word == "twice" => Some(2),
        _ => None,
    }
}
