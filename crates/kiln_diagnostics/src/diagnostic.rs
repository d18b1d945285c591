//! Compiler diagnostic messages with severity and position.

use crate::position::Position;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// A diagnostic message reported by the wrapped compiler.
///
/// The position is kept exactly as the compiler reported it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The diagnostic message.
    pub message: String,
    /// Where the diagnostic points.
    pub position: Position,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    pub fn error(message: impl Into<String>, position: Position) -> Self {
        Self::new(Severity::Error, message, position)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(message: impl Into<String>, position: Position) -> Self {
        Self::new(Severity::Warning, message, position)
    }

    /// Creates a new informational diagnostic.
    pub fn info(message: impl Into<String>, position: Position) -> Self {
        Self::new(Severity::Info, message, position)
    }

    /// Creates a diagnostic with an explicit severity.
    pub fn new(severity: Severity, message: impl Into<String>, position: Position) -> Self {
        Self {
            severity,
            message: message.into(),
            position,
        }
    }

    /// Returns `true` if this diagnostic fails the compile.
    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }
}
