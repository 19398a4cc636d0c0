//! # purl-parser
//!
//! A row resolution engine for OCR'd knitting patterns.
//!
//! Pattern text reaches this crate already OCR'd and assembled into one
//! blob. The engine recovers, per titled section, the exact set of row
//! numbers the section covers and the stitch-count evolution across them,
//! from loosely-structured row directives ("row 9", "rows 11-18, all odd
//! rows", "repeat rows 40 to 59 again once"). It performs no I/O and calls
//! no external services; upstream OCR and stitch classification, and
//! downstream storage and rendering, are collaborators behind the
//! [`pipeline`] surface.
//!
//! Stages, in pipeline order:
//!
//! - [`cleanup`] — OCR text tidying
//! - [`sizing`] — bracket scanning and size-variant selection
//! - [`segment`] — heading-based section segmentation
//! - [`directive`] — row directive grammar
//! - [`resolve`] — row range resolution
//! - [`gapfill`] — parity-rule gap inference
//! - [`stitches`] — stitch-count delta validation
//!
//! Malformed input never aborts resolution: every recovery is reported
//! through [`diagnostics`] and the caller always receives a complete
//! structure.

pub mod cleanup;
pub mod diagnostics;
pub mod directive;
pub mod gapfill;
pub mod pipeline;
pub mod resolve;
pub mod segment;
pub mod sizing;
pub mod stitches;
pub mod token;

pub use cleanup::CleanupRules;
pub use diagnostics::{Warning, WarningKind};
pub use pipeline::{
    resolve_pattern, resolve_pattern_with_hints, PatternHints, ResolveOptions, ResolvedPattern,
    RowHint, SectionHints,
};
pub use resolve::{ResolvedSection, RowEntry};
pub use segment::Section;
pub use stitches::{StitchRepeatGroup, StitchVocabulary};
