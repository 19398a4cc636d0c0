//! Resolution pipeline
//!
//! Chains the engine stages over one document: tidy the OCR text, collapse
//! size sequences, segment into sections, then resolve each section and
//! validate its stitch counts. Sections share no state, so they are
//! resolved on the rayon pool; results are collected back in input order
//! because section order is significant. Resolution inside a section stays
//! strictly sequential.
//!
//! The pipeline always returns a complete [`ResolvedPattern`]: malformed
//! input degrades to partial results with warnings, never an error.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cleanup::{self, CleanupRules};
use crate::diagnostics::Warning;
use crate::resolve::{self, ResolvedSection};
use crate::segment;
use crate::sizing;
use crate::stitches::{self, StitchRepeatGroup, StitchVocabulary};

/// Configuration for one resolution pass, passed explicitly; the engine
/// keeps no global state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveOptions {
    /// Which bracketed size variant to keep (0-based within the bracket).
    pub variant_index: usize,
    pub vocabulary: StitchVocabulary,
    pub cleanup: CleanupRules,
}

/// Declared stitch-count hints from the upstream classifier, keyed by
/// section title (unique within a document) and row number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternHints {
    pub sections: HashMap<String, SectionHints>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionHints {
    pub rows: HashMap<u32, RowHint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowHint {
    pub stitch_count: Option<u32>,
    pub stitch_repeat_groups: Vec<StitchRepeatGroup>,
}

impl PatternHints {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// The resolved document: sections in input order plus the flat warning
/// list. Always complete; warnings never block the structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPattern {
    pub sections: Vec<ResolvedSection>,
    pub total_rows: usize,
    pub warnings: Vec<Warning>,
}

impl ResolvedPattern {
    /// Look up a section by title.
    pub fn section(&self, title: &str) -> Option<&ResolvedSection> {
        self.sections.iter().find(|s| s.title == title)
    }
}

/// Resolve a document without stitch-count hints.
pub fn resolve_pattern(text: &str, options: &ResolveOptions) -> ResolvedPattern {
    resolve_pattern_with_hints(text, &PatternHints::default(), options)
}

/// Resolve a document, attaching declared stitch counts and repeat groups
/// before validation.
pub fn resolve_pattern_with_hints(
    text: &str,
    hints: &PatternHints,
    options: &ResolveOptions,
) -> ResolvedPattern {
    let tidied = cleanup::tidy(text, &options.cleanup);
    let (sized, mut warnings) = sizing::select_sizes(&tidied, options.variant_index);
    let sections = segment::split_sections(&sized);

    let resolved: Vec<(ResolvedSection, Vec<Warning>)> = sections
        .par_iter()
        .map(|section| {
            let (mut resolved, mut section_warnings) = resolve::resolve_section(section);
            if let Some(section_hints) = hints.sections.get(&section.title) {
                apply_hints(&mut resolved, section_hints);
            }
            section_warnings.extend(stitches::validate_section(
                &mut resolved,
                &options.vocabulary,
            ));
            (resolved, section_warnings)
        })
        .collect();

    let mut sections = Vec::with_capacity(resolved.len());
    let mut total_rows = 0;
    for (section, section_warnings) in resolved {
        total_rows += section.row_count;
        warnings.extend(section_warnings);
        sections.push(section);
    }

    ResolvedPattern {
        sections,
        total_rows,
        warnings,
    }
}

/// Attach declared counts and groups to the rows they hint at. A hint's
/// groups replace synthesized gap-fill groups; rows the hints do not name
/// are left alone.
fn apply_hints(section: &mut ResolvedSection, hints: &SectionHints) {
    for entry in &mut section.rows {
        if let Some(hint) = hints.rows.get(&entry.row_number) {
            if hint.stitch_count.is_some() {
                entry.stitch_count = hint.stitch_count;
            }
            if !hint.stitch_repeat_groups.is_empty() {
                entry.stitch_repeat_groups = hint.stitch_repeat_groups.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_resolve_in_input_order() {
        let text = "# folded hem\nrow 1: purl\n# lace panel\nrow 9: purl\n# medium length\nrow 60: knit";
        let pattern = resolve_pattern(text, &ResolveOptions::default());
        let titles: Vec<&str> = pattern.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["folded hem", "lace panel", "medium length"]);
        assert_eq!(pattern.total_rows, 3);
    }

    #[test]
    fn test_hints_reach_validation() {
        let text = "# hem\nrow 1: cast on\nrow 2: decrease row";
        let mut hints = PatternHints::default();
        hints.sections.insert(
            "hem".to_string(),
            SectionHints {
                rows: HashMap::from([
                    (
                        1,
                        RowHint {
                            stitch_count: Some(20),
                            stitch_repeat_groups: vec![],
                        },
                    ),
                    (
                        2,
                        RowHint {
                            stitch_count: Some(20),
                            stitch_repeat_groups: vec![StitchRepeatGroup::new(
                                2,
                                &["k2tog"],
                            )],
                        },
                    ),
                ]),
            },
        );
        let pattern = resolve_pattern_with_hints(text, &hints, &ResolveOptions::default());
        // 20 declared, 18 computed: the mismatch must surface.
        assert_eq!(pattern.warnings.len(), 1);
        assert!(pattern.warnings[0].message.contains("computed 18"));
    }

    #[test]
    fn test_warnings_from_all_stages_collected() {
        let text = "# hem\nrow 1 (56-65\nrow 99999999999 purl";
        let pattern = resolve_pattern(text, &ResolveOptions::default());
        assert!(pattern
            .warnings
            .iter()
            .any(|w| w.message.contains("unbalanced bracket")));
        assert!(pattern
            .warnings
            .iter()
            .any(|w| w.message.contains("unrecognized row directive")));
    }
}
