//! Per-invocation compile options.

use std::path::PathBuf;

use kiln_common::CompileOrder;

/// What to compile and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Full classpath, the output directory first.
    pub classpath: Vec<PathBuf>,
    /// Every source of the module.
    pub sources: Vec<PathBuf>,
    /// Directory receiving class files.
    pub output_dir: PathBuf,
    /// Options passed to the Scala compiler.
    pub scalac_options: Vec<String>,
    /// Options passed to the Java compiler.
    pub javac_options: Vec<String>,
    /// Cap on reported errors.
    pub max_errors: usize,
    /// Mixed-language ordering policy.
    pub order: CompileOrder,
}

impl CompileOptions {
    /// Classpath entries other than the output directory.
    pub fn external_classpath(&self) -> impl Iterator<Item = &PathBuf> {
        self.classpath.iter().filter(move |e| **e != self.output_dir)
    }
}
