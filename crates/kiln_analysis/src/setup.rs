//! Compile setups and the analysis/setup pair.

use std::path::PathBuf;

use kiln_common::CompileOrder;
use serde::{Deserialize, Serialize};

use crate::analysis::CompileAnalysis;

/// The options an analysis was produced under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setup {
    /// Output directory of the compile.
    pub output_dir: PathBuf,
    /// Full compiler version.
    pub compiler_version: String,
    /// Options passed to the Scala compiler.
    pub scalac_options: Vec<String>,
    /// Options passed to the Java compiler.
    pub javac_options: Vec<String>,
    /// Mixed-language ordering policy.
    pub order: CompileOrder,
}

impl Setup {
    /// Returns `true` if an analysis produced under `self` may be reused by
    /// a compile configured as `other`.
    pub fn is_compatible(&self, other: &Setup) -> bool {
        self == other
    }
}

/// An analysis together with the setup that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisContents {
    /// The analysis.
    pub analysis: CompileAnalysis,
    /// The setup it was produced under.
    pub setup: Setup,
}

/// The outcome of the previous compile, if there was one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviousResult(Option<AnalysisContents>);

impl PreviousResult {
    /// No previous compile.
    pub fn empty() -> Self {
        Self(None)
    }

    /// A previous compile with `contents`.
    pub fn new(contents: AnalysisContents) -> Self {
        Self(Some(contents))
    }

    /// Returns `true` when there is no previous compile.
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// The previous analysis.
    pub fn analysis(&self) -> Option<&CompileAnalysis> {
        self.0.as_ref().map(|c| &c.analysis)
    }

    /// The previous setup.
    pub fn setup(&self) -> Option<&Setup> {
        self.0.as_ref().map(|c| &c.setup)
    }

    /// The analysis and setup together.
    pub fn contents(&self) -> Option<&AnalysisContents> {
        self.0.as_ref()
    }

    /// Consumes the result, returning its contents.
    pub fn into_contents(self) -> Option<AnalysisContents> {
        self.0
    }
}

impl From<Option<AnalysisContents>> for PreviousResult {
    fn from(contents: Option<AnalysisContents>) -> Self {
        Self(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Setup {
        Setup {
            output_dir: PathBuf::from("target/classes"),
            compiler_version: "2.13.12".to_string(),
            scalac_options: vec!["-deprecation".to_string()],
            javac_options: Vec::new(),
            order: CompileOrder::Mixed,
        }
    }

    #[test]
    fn identical_setups_are_compatible() {
        assert!(setup().is_compatible(&setup()));
    }

    #[test]
    fn any_difference_is_incompatible() {
        let mut other = setup();
        other.scalac_options.push("-feature".to_string());
        assert!(!setup().is_compatible(&other));

        let mut other = setup();
        other.order = CompileOrder::JavaThenScala;
        assert!(!setup().is_compatible(&other));

        let mut other = setup();
        other.compiler_version = "2.13.11".to_string();
        assert!(!setup().is_compatible(&other));
    }

    #[test]
    fn previous_result_views() {
        let empty = PreviousResult::empty();
        assert!(empty.is_empty());
        assert!(empty.analysis().is_none());
        assert!(empty.setup().is_none());

        let full = PreviousResult::new(AnalysisContents {
            analysis: CompileAnalysis::new(),
            setup: setup(),
        });
        assert!(!full.is_empty());
        assert!(full.analysis().is_some());
        assert_eq!(full.setup(), Some(&setup()));
        assert!(full.into_contents().is_some());
    }
}
