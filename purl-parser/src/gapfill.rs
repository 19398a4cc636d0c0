//! Gap-fill inference
//!
//! Sections often spell out only the interesting rows and cover the rest
//! with a blanket rule ("odd rows: purl"). After explicit directives are
//! resolved, every row number inside the observed span with no entry is
//! checked against the section's parity rules; a matching rule synthesizes
//! a one-stitch entry, a missing rule leaves the row absent and reported.
//!
//! Gap-fill never overwrites an explicit entry.

use std::collections::BTreeMap;

use crate::diagnostics::{Warning, WarningKind};
use crate::directive::Parity;
use crate::resolve::RowEntry;
use crate::stitches::StitchRepeatGroup;

/// Fill span gaps from parity rules; report rows no rule covers.
pub fn fill_gaps(
    title: &str,
    rows: &mut BTreeMap<u32, RowEntry>,
    span: Option<(u32, u32)>,
    rules: &[(Parity, String)],
) -> Vec<Warning> {
    let Some((start, end)) = span else {
        return Vec::new();
    };

    let mut unfilled = Vec::new();
    for row in start..=end {
        if rows.contains_key(&row) {
            continue;
        }
        match rules.iter().find(|(parity, _)| parity.matches(row)) {
            Some((_, stitch)) => {
                rows.insert(
                    row,
                    RowEntry {
                        row_number: row,
                        instruction: format!("row {}: {}", row, stitch),
                        stitch_count: None,
                        stitch_repeat_groups: vec![StitchRepeatGroup {
                            repeat: Some(1),
                            stitches: vec![stitch.clone()],
                        }],
                    },
                );
            }
            None => unfilled.push(row),
        }
    }

    if unfilled.is_empty() {
        return Vec::new();
    }
    let listed = unfilled
        .iter()
        .map(|row| row.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    vec![Warning::new(
        WarningKind::UnresolvedGap,
        format!(
            "uncovered rows inside section span {}..{}: {}",
            start, end, listed
        ),
    )
    .with_section(title)]
}
