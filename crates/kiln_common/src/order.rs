//! Source ordering policy for mixed-language compiles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decides whether Java and Scala sources are compiled together or one
/// language strictly before the other.
///
/// With a strict order, dependents written in the second language wait for
/// a full pass over the first language before they are compiled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompileOrder {
    /// Both languages in one pass; the Scala compiler parses Java sources
    /// for their signatures.
    #[default]
    Mixed,
    /// All Java sources first, then all Scala sources.
    JavaThenScala,
    /// All Scala sources first, then all Java sources.
    ScalaThenJava,
}

impl fmt::Display for CompileOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileOrder::Mixed => write!(f, "Mixed"),
            CompileOrder::JavaThenScala => write!(f, "JavaThenScala"),
            CompileOrder::ScalaThenJava => write!(f, "ScalaThenJava"),
        }
    }
}

/// Error returned when parsing an unknown compile order name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCompileOrderError(pub String);

impl fmt::Display for ParseCompileOrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown compile order '{}' (expected mixed, java-then-scala or scala-then-java)",
            self.0
        )
    }
}

impl std::error::Error for ParseCompileOrderError {}

impl FromStr for CompileOrder {
    type Err = ParseCompileOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "mixed" => Ok(CompileOrder::Mixed),
            "java-then-scala" | "javathenscala" => Ok(CompileOrder::JavaThenScala),
            "scala-then-java" | "scalathenjava" => Ok(CompileOrder::ScalaThenJava),
            _ => Err(ParseCompileOrderError(s.to_string())),
        }
    }
}
