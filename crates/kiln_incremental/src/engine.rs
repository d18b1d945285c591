//! The engine trait the orchestrator delegates to.

use std::path::PathBuf;

use kiln_analysis::{CompileAnalysis, CrossModuleAnalysisLookup, PreviousResult, Setup};
use kiln_diagnostics::DiagnosticSink;

use crate::compiler::Compilers;
use crate::error::EngineError;
use crate::options::CompileOptions;

/// Everything an engine needs for one compile.
pub struct EngineInputs<'a> {
    /// Toolchain and bridge.
    pub compilers: &'a Compilers,
    /// What to compile.
    pub options: &'a CompileOptions,
    /// The setup of this compile.
    pub setup: &'a Setup,
    /// The previous compile's analysis and setup.
    pub previous: &'a PreviousResult,
    /// Analyses of upstream modules on the classpath.
    pub lookup: &'a CrossModuleAnalysisLookup,
    /// Receives compiler diagnostics.
    pub sink: &'a DiagnosticSink,
}

/// The state after a successful compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOutput {
    /// The new analysis.
    pub analysis: CompileAnalysis,
    /// The setup it was produced under.
    pub setup: Setup,
    /// Sources that were compiled, in path order.
    pub recompiled: Vec<PathBuf>,
}

/// Brings an output directory up to date with its sources.
pub trait IncrementalEngine: Send + Sync {
    /// Runs one incremental compile.
    ///
    /// On `Err` the output directory may have been partly updated, but the
    /// caller must keep the previous analysis.
    fn compile(&self, inputs: EngineInputs<'_>) -> Result<EngineOutput, EngineError>;
}
