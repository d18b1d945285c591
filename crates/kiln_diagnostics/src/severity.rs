//! How bad a compiler-reported problem is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity attached by scalac or javac to each reported problem.
///
/// Only [`Error`](Severity::Error) fails a compile; warnings and infos are
/// handed back with a successful outcome. Variants compare by how serious
/// they are, so `max()` over a compile's diagnostics gives its worst one.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// Compiler chatter such as progress notes.
    Info,
    /// Reported, but the class files are still written.
    Warning,
    /// The compile failed.
    Error,
}

impl Severity {
    /// Whether a diagnostic of this severity fails the compile.
    pub fn is_error(self) -> bool {
        matches!(self, Severity::Error)
    }

    /// The label compilers print in front of the message.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// ANSI colour code used when rendering to a terminal.
    pub(crate) fn ansi_color(self) -> &'static str {
        match self {
            Severity::Info => "36",
            Severity::Warning => "33",
            Severity::Error => "31",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worst_of_a_compile_is_the_maximum() {
        let reported = [Severity::Warning, Severity::Info, Severity::Error, Severity::Warning];
        assert_eq!(reported.iter().max(), Some(&Severity::Error));
        assert_eq!(reported[..2].iter().max(), Some(&Severity::Warning));
    }

    #[test]
    fn only_errors_fail_the_compile() {
        let failing: Vec<_> = [Severity::Info, Severity::Warning, Severity::Error]
            .into_iter()
            .filter(|s| s.is_error())
            .collect();
        assert_eq!(failing, [Severity::Error]);
    }

    #[test]
    fn labels_match_compiler_output() {
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::Error.as_str(), "error");
        assert_eq!(Severity::Info.as_str(), "info");
    }
}
