//! Source positions attached to compiler diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where a diagnostic points in the sources, as reported by the compiler.
///
/// Every field is optional because compilers report positions of varying
/// precision (a whole file, a line, or a line and column). `line` and
/// `column` are 1-based.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// The source file, if known.
    pub source: Option<PathBuf>,
    /// The 1-based line number.
    pub line: Option<u32>,
    /// The 1-based column number.
    pub column: Option<u32>,
    /// The text of the offending line, if the compiler supplied it.
    pub line_content: Option<String>,
}

impl Position {
    /// A position with no location information.
    pub const NONE: Position = Position {
        source: None,
        line: None,
        column: None,
        line_content: None,
    };

    /// Creates a position at `line:column` in `source`.
    pub fn new(source: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            source: Some(source.into()),
            line: Some(line),
            column: Some(column),
            line_content: None,
        }
    }

    /// Attaches the text of the offending line.
    pub fn with_line_content(mut self, content: impl Into<String>) -> Self {
        self.line_content = Some(content.into());
        self
    }

    /// Returns `true` if no location information is present.
    pub fn is_none(&self) -> bool {
        self.source.is_none() && self.line.is_none()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}", source.display())?,
            None => write!(f, "<unknown>")?,
        }
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
            if let Some(column) = self.column {
                write!(f, ":{column}")?;
            }
        }
        Ok(())
    }
}
