//! Structured warnings produced during pattern resolution
//!
//! The engine never fails on malformed input: every local recovery (an
//! unbalanced bracket, a repeat count that does not divide, a row with no
//! parity rule to fill it) is recorded as a [`Warning`] and resolution
//! continues. Callers receive the full warning list next to the resolved
//! structure and decide what to surface.

use serde::Serialize;
use std::fmt;

/// Warning categories, one per recovery strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// Unbalanced brackets, unusable size variants, unrecognized directives.
    Structural,
    /// Declared and computed values disagree; the more-trusted value won.
    ArithmeticMismatch,
    /// A row inside the section span has no entry and no parity rule covers it.
    UnresolvedGap,
    /// An open-ended repeat count could not be back-solved from stitch counts.
    UndeterminedRepeat,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::Structural => write!(f, "structural"),
            WarningKind::ArithmeticMismatch => write!(f, "arithmetic-mismatch"),
            WarningKind::UnresolvedGap => write!(f, "unresolved-gap"),
            WarningKind::UndeterminedRepeat => write!(f, "undetermined-repeat"),
        }
    }
}

/// A non-fatal finding attached to the resolved pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub section: Option<String>,
    pub row: Option<u32>,
    pub message: String,
}

impl Warning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            section: None,
            row: None,
            message: message.into(),
        }
    }

    pub fn with_section(mut self, title: impl Into<String>) -> Self {
        self.section = Some(title.into());
        self
    }

    pub fn with_row(mut self, row: u32) -> Self {
        self.row = Some(row);
        self
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "warning [{}]: {}", self.kind, self.message)?;
        if let Some(section) = &self.section {
            write!(f, " (section \"{}\"", section)?;
            if let Some(row) = self.row {
                write!(f, ", row {}", row)?;
            }
            write!(f, ")")?;
        } else if let Some(row) = self.row {
            write!(f, " (row {})", row)?;
        }
        Ok(())
    }
}
