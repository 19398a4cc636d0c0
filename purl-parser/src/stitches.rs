//! Stitch vocabulary and stitch-count validation
//!
//! A stitch type contributes a signed delta to the running stitch count:
//! multi-stitch decreases −1 per occurrence, made/yarn-over increases +1,
//! everything else 0. A row's computed count is the previous row's declared
//! count plus the deltas of its repeat groups; computed and declared are
//! reconciled here and every disagreement is reported — the engine never
//! silently replaces one with the other.
//!
//! A group worked "to the end" arrives with an unknown repeat count. When
//! its per-repetition delta is non-zero the count is back-solved from the
//! declared totals and written back into the group; when it cannot be
//! determined, that is reported too.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Warning, WarningKind};
use crate::resolve::ResolvedSection;

/// A run of stitch types worked as a unit a number of times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StitchRepeatGroup {
    /// `None` means "repeat to the end of the row" with no explicit count.
    pub repeat: Option<u32>,
    pub stitches: Vec<String>,
}

impl StitchRepeatGroup {
    pub fn new(repeat: impl Into<Option<u32>>, stitches: &[&str]) -> Self {
        Self {
            repeat: repeat.into(),
            stitches: stitches.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Classification of stitch types into increases and decreases; everything
/// else is neutral. Lookup is case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StitchVocabulary {
    increases: BTreeSet<String>,
    decreases: BTreeSet<String>,
}

impl Default for StitchVocabulary {
    fn default() -> Self {
        Self::new(
            &[
                "yo", "m1", "m1l", "m1r", "m1lp", "m1rp", "kfb", "空加针", "挂针", "加针",
            ],
            &[
                "k2tog", "ssk", "p2tog", "ssp", "左上2并1", "左下二并一", "右上二并一",
                "右下二并一",
            ],
        )
    }
}

impl StitchVocabulary {
    pub fn new(increases: &[&str], decreases: &[&str]) -> Self {
        Self {
            increases: increases.iter().map(|s| s.to_lowercase()).collect(),
            decreases: decreases.iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    pub fn from_lists(increases: Vec<String>, decreases: Vec<String>) -> Self {
        Self {
            increases: increases.into_iter().map(|s| s.to_lowercase()).collect(),
            decreases: decreases.into_iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    /// Signed stitch-count delta of one occurrence of `stitch`.
    pub fn delta(&self, stitch: &str) -> i64 {
        let key = stitch.trim().to_lowercase();
        if self.decreases.contains(&key) {
            -1
        } else if self.increases.contains(&key) {
            1
        } else {
            0
        }
    }

    /// Delta of one repetition of a group's stitch run.
    pub fn group_delta(&self, group: &StitchRepeatGroup) -> i64 {
        group.stitches.iter().map(|s| self.delta(s)).sum()
    }
}

/// Validate stitch counts across a section's rows in order.
///
/// Rows without a declared count, or without repeat groups, assert nothing:
/// a declared count with no groups is authoritative and re-seeds the chain.
/// Back-solved repeat counts are written into the section's groups.
pub fn validate_section(section: &mut ResolvedSection, vocabulary: &StitchVocabulary) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let title = section.title.clone();
    let mut previous: Option<i64> = None;

    for entry in &mut section.rows {
        let Some(declared) = entry.stitch_count else {
            continue;
        };
        let declared = i64::from(declared);

        if entry.stitch_repeat_groups.is_empty() {
            previous = Some(declared);
            continue;
        }
        let Some(prev) = previous else {
            // Nothing to chain from; the first declared count seeds the chain.
            previous = Some(declared);
            continue;
        };

        let open_groups: Vec<usize> = entry
            .stitch_repeat_groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.repeat.is_none())
            .map(|(idx, _)| idx)
            .collect();
        let fixed_delta: i64 = entry
            .stitch_repeat_groups
            .iter()
            .filter_map(|g| {
                g.repeat
                    .map(|repeat| i64::from(repeat) * vocabulary.group_delta(g))
            })
            .sum();

        match open_groups.as_slice() {
            [] => {
                let computed = prev + fixed_delta;
                if computed != declared {
                    warnings.push(
                        Warning::new(
                            WarningKind::ArithmeticMismatch,
                            format!(
                                "declared stitch count {} but computed {} (previous row {}, repeat groups {})",
                                declared,
                                computed,
                                prev,
                                render_groups(&entry.stitch_repeat_groups)
                            ),
                        )
                        .with_section(&title)
                        .with_row(entry.row_number),
                    );
                }
            }
            [open_idx] => {
                let per_repetition = vocabulary.group_delta(&entry.stitch_repeat_groups[*open_idx]);
                let numerator = declared - prev - fixed_delta;
                if per_repetition == 0 {
                    warnings.push(
                        Warning::new(
                            WarningKind::UndeterminedRepeat,
                            "open-ended repeat group has zero net delta per repetition; repeat count cannot be determined from stitch counts".to_string(),
                        )
                        .with_section(&title)
                        .with_row(entry.row_number),
                    );
                } else if numerator % per_repetition != 0 || numerator / per_repetition < 0 {
                    warnings.push(
                        Warning::new(
                            WarningKind::UndeterminedRepeat,
                            format!(
                                "repeat count could not be determined: delta {} does not divide evenly by {} per repetition",
                                numerator, per_repetition
                            ),
                        )
                        .with_section(&title)
                        .with_row(entry.row_number),
                    );
                } else {
                    let solved = numerator / per_repetition;
                    entry.stitch_repeat_groups[*open_idx].repeat = Some(solved as u32);
                }
            }
            _ => {
                warnings.push(
                    Warning::new(
                        WarningKind::UndeterminedRepeat,
                        "more than one open-ended repeat group in a single row; repeat counts cannot be determined".to_string(),
                    )
                    .with_section(&title)
                    .with_row(entry.row_number),
                );
            }
        }

        // The declared count is the more-trusted value from here on.
        previous = Some(declared);
    }

    warnings
}

fn render_groups(groups: &[StitchRepeatGroup]) -> String {
    let rendered: Vec<String> = groups
        .iter()
        .map(|g| {
            let repeat = g
                .repeat
                .map(|r| r.to_string())
                .unwrap_or_else(|| "?".to_string());
            format!("{}×[{}]", repeat, g.stitches.join(", "))
        })
        .collect();
    rendered.join(" ")
}
