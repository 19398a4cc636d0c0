//! Row resolution
//!
//! Expands a section's recognized directives into the canonical row table:
//! an ascending, duplicate-free sequence of [`RowEntry`] values. Later
//! directives never displace rows an earlier directive populated
//! (first-writer-wins), but every referenced row number still widens the
//! section's observed span, which gap-fill and the declared-count check
//! work against.
//!
//! Resolution within a section is strictly sequential: first-writer-wins
//! and the stitch-count chain both depend on directive order. Sections are
//! independent of each other and are parallelized one level up.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::diagnostics::{Warning, WarningKind};
use crate::directive::{self, Parity, RowDirective};
use crate::gapfill;
use crate::segment::Section;
use crate::stitches::StitchRepeatGroup;

/// Upper bound on expanded range length. OCR noise can mangle a row number
/// into something astronomically large; expanding it would be meaningless.
const MAX_RANGE_ROWS: u32 = 10_000;

/// One resolved row of a section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowEntry {
    pub row_number: u32,
    /// The literal source line; repeat expansions append the mirrored row.
    pub instruction: String,
    pub stitch_count: Option<u32>,
    pub stitch_repeat_groups: Vec<StitchRepeatGroup>,
}

impl RowEntry {
    fn new(row_number: u32, instruction: String) -> Self {
        Self {
            row_number,
            instruction,
            stitch_count: None,
            stitch_repeat_groups: Vec::new(),
        }
    }
}

/// A section after directive expansion, gap-fill and span bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSection {
    pub title: String,
    /// Ascending and unique by row number.
    pub rows: Vec<RowEntry>,
    pub start_row: Option<u32>,
    pub end_row: Option<u32>,
    /// Authoritative count: number of resolved rows, never `end - start + 1`.
    pub row_count: usize,
}

impl ResolvedSection {
    /// Look up a row by number.
    pub fn row(&self, row_number: u32) -> Option<&RowEntry> {
        self.rows
            .binary_search_by_key(&row_number, |entry| entry.row_number)
            .ok()
            .map(|idx| &self.rows[idx])
    }
}

/// Sequential resolver state for one section.
struct SectionResolver<'a> {
    section: &'a Section,
    rows: BTreeMap<u32, RowEntry>,
    span: Option<(u32, u32)>,
    parity_rules: Vec<(Parity, String)>,
    warnings: Vec<Warning>,
}

/// Resolve one section's directives into its row table.
pub fn resolve_section(section: &Section) -> (ResolvedSection, Vec<Warning>) {
    let mut resolver = SectionResolver {
        section,
        rows: BTreeMap::new(),
        span: None,
        parity_rules: Vec::new(),
        warnings: Vec::new(),
    };
    resolver.run();
    resolver.finish()
}

impl SectionResolver<'_> {
    fn run(&mut self) {
        for line in self.section.content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match directive::match_directive(trimmed) {
                Some(directive) => self.apply(trimmed, directive),
                None => {
                    if directive::looks_like_directive(trimmed) {
                        self.warn(
                            WarningKind::Structural,
                            format!("unrecognized row directive: \"{}\"", trimmed),
                            None,
                        );
                    }
                }
            }
        }
    }

    fn apply(&mut self, line: &str, directive: RowDirective) {
        match directive {
            RowDirective::Single { row } => self.insert(row, line.to_string()),
            RowDirective::Mirror { row, source } => {
                self.insert(row, format!("{} (repeat of row {})", line, source));
            }
            RowDirective::Conjunction { rows } => {
                for row in rows {
                    self.insert(row, line.to_string());
                }
            }
            RowDirective::Range { start, end } => {
                let Some((start, end)) = self.bounded(start, end) else {
                    return;
                };
                for row in start..=end {
                    self.insert(row, line.to_string());
                }
            }
            RowDirective::ParityRange { start, end, parity } => {
                let Some((start, end)) = self.bounded(start, end) else {
                    return;
                };
                for row in (start..=end).filter(|r| parity.matches(*r)) {
                    self.insert(row, line.to_string());
                }
            }
            RowDirective::RepeatRange {
                source_start,
                source_end,
                times,
                target,
            } => self.expand_repeat(line, source_start, source_end, times, target),
            RowDirective::ParityRule { parity, stitch } => {
                // First declared rule per parity wins.
                if !self.parity_rules.iter().any(|(p, _)| *p == parity) {
                    self.parity_rules.push((parity, stitch));
                }
            }
        }
    }

    /// Repeat-of-range arithmetic.
    ///
    /// With a declared target range, the target length is ground truth: a
    /// declared repeat count that disagrees is replaced by the truncating
    /// quotient and reported. Without a target, the repeated rows re-work
    /// the source rows and each row number is counted once.
    fn expand_repeat(
        &mut self,
        line: &str,
        source_start: u32,
        source_end: u32,
        times: Option<u32>,
        target: Option<(u32, u32)>,
    ) {
        let Some((source_start, source_end)) = self.bounded(source_start, source_end) else {
            return;
        };
        let source_len = source_end - source_start + 1;

        match target {
            Some((target_start, target_end)) => {
                let Some((target_start, target_end)) = self.bounded(target_start, target_end)
                else {
                    return;
                };
                // The declared target is a row reference in its own right:
                // it widens the span even where the repeat falls short.
                self.observe(target_start);
                self.observe(target_end);
                let target_len = target_end - target_start + 1;
                let mut repeats = times.unwrap_or(1);

                if u64::from(repeats) * u64::from(source_len) != u64::from(target_len) {
                    let derived = target_len / source_len;
                    let remainder = target_len % source_len;
                    let mut message = format!(
                        "repeat count {} × source length {} does not match target length {}; using {} repeats",
                        repeats, source_len, target_len, derived
                    );
                    if remainder != 0 {
                        message.push_str(&format!(
                            " ({} trailing row(s) not covered by the repeat)",
                            remainder
                        ));
                    }
                    self.warn(WarningKind::ArithmeticMismatch, message, Some(target_start));
                    repeats = derived;
                }

                for i in 0..repeats {
                    for j in 0..source_len {
                        let row = target_start + i * source_len + j;
                        self.insert(
                            row,
                            format!("{} (repeat of row {})", line, source_start + j),
                        );
                    }
                }
            }
            None => {
                for row in source_start..=source_end {
                    self.insert(row, line.to_string());
                }
            }
        }
    }

    /// First-writer-wins insert; every referenced row widens the span.
    fn insert(&mut self, row: u32, instruction: String) {
        if row == 0 {
            self.warn(
                WarningKind::Structural,
                "row numbers start at 1; row 0 ignored".to_string(),
                Some(0),
            );
            return;
        }
        self.observe(row);
        self.rows
            .entry(row)
            .or_insert_with(|| RowEntry::new(row, instruction));
    }

    fn observe(&mut self, row: u32) {
        if row == 0 {
            return;
        }
        self.span = Some(match self.span {
            None => (row, row),
            Some((lo, hi)) => (lo.min(row), hi.max(row)),
        });
    }

    /// Order a range's endpoints and reject absurd expansions.
    fn bounded(&mut self, a: u32, b: u32) -> Option<(u32, u32)> {
        let (start, end) = if a > b {
            self.warn(
                WarningKind::Structural,
                format!("descending range {}..{} treated as {}..{}", a, b, b, a),
                Some(b),
            );
            (b, a)
        } else {
            (a, b)
        };
        if end - start >= MAX_RANGE_ROWS {
            self.warn(
                WarningKind::Structural,
                format!(
                    "range {}..{} spans {} rows, beyond any plausible pattern; directive skipped",
                    start,
                    end,
                    u64::from(end) - u64::from(start) + 1
                ),
                Some(start),
            );
            return None;
        }
        Some((start, end))
    }

    fn warn(&mut self, kind: WarningKind, message: String, row: Option<u32>) {
        let mut warning = Warning::new(kind, message).with_section(&self.section.title);
        if let Some(row) = row {
            warning = warning.with_row(row);
        }
        self.warnings.push(warning);
    }

    fn finish(mut self) -> (ResolvedSection, Vec<Warning>) {
        self.warnings.extend(gapfill::fill_gaps(
            &self.section.title,
            &mut self.rows,
            self.span,
            &self.parity_rules,
        ));

        let (start_row, end_row) = match self.span {
            Some((lo, hi)) => (Some(lo), Some(hi)),
            None => (None, None),
        };
        let rows: Vec<RowEntry> = self.rows.into_values().collect();
        let row_count = rows.len();

        (
            ResolvedSection {
                title: self.section.title.clone(),
                rows,
                start_row,
                end_row,
                row_count,
            },
            self.warnings,
        )
    }
}
