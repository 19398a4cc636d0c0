//! Section segmentation
//!
//! Pattern text is split into titled sections on heading lines: lines whose
//! first non-whitespace character is `#` (or its fullwidth form `＃`).
//! Everything before the first heading is front matter and is discarded.
//! Section content is the verbatim run of lines up to the next heading,
//! newline-joined; order of sections follows heading order in the input.
//!
//! Segmentation is a fixed point: re-segmenting a rendered section list
//! yields the same sections again.

use serde::Serialize;

/// A titled block of pattern text between two headings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub content: String,
}

/// Split text into ordered sections on heading lines.
pub fn split_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<Section> = None;

    for line in text.lines() {
        if let Some(title) = heading_title(line) {
            if let Some(section) = current.take() {
                sections.push(section);
            }
            // A bare marker with no title separates front matter but opens
            // no section, matching how untitled blocks are dropped upstream.
            if !title.is_empty() {
                current = Some(Section {
                    title,
                    content: String::new(),
                });
            }
        } else if let Some(section) = current.as_mut() {
            if !section.content.is_empty() {
                section.content.push('\n');
            }
            section.content.push_str(line);
        }
    }

    if let Some(section) = current.take() {
        sections.push(section);
    }

    sections
}

/// Extract the title from a heading line, if the line is one.
fn heading_title(line: &str) -> Option<String> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') || trimmed.starts_with('＃') {
        Some(trimmed.trim_matches(['#', '＃', ' ', '\t']).to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_headings() {
        let text = "# folded hem\nrow 1: purl\nrow 2: knit\n# lace panel\nrow 9: purl";
        let sections = split_sections(text);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "folded hem");
        assert_eq!(sections[0].content, "row 1: purl\nrow 2: knit");
        assert_eq!(sections[1].title, "lace panel");
        assert_eq!(sections[1].content, "row 9: purl");
    }

    #[test]
    fn test_front_matter_discarded() {
        let text = "cast on 406 stitches\n\n# body\nrow 1: purl";
        let sections = split_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "body");
    }

    #[test]
    fn test_fullwidth_marker_and_indented_heading() {
        let text = "  ＃ 左前片\nrow 61: purl";
        let sections = split_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "左前片");
    }

    #[test]
    fn test_bare_marker_drops_block() {
        let text = "#\nthis content belongs to no section\n# real\nrow 1: knit";
        let sections = split_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "real");
    }

    #[test]
    fn test_resegmenting_is_a_fixed_point() {
        let text = "# a\nrow 1: knit\n\nrow 2: purl\n# b\nrow 3: knit";
        let first = split_sections(text);
        let rendered = first
            .iter()
            .map(|s| format!("# {}\n{}", s.title, s.content))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(split_sections(&rendered), first);
    }

    #[test]
    fn test_empty_input() {
        assert!(split_sections("").is_empty());
    }
}
