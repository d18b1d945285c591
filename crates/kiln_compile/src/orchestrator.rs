//! One module's compile: load, delegate, commit.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use kiln_analysis::{
    AnalysisError, AnalysisLayout, AnalysisStore, CompileAnalysis, CrossModuleAnalysisLookup, Setup,
};
use kiln_common::CompileOrder;
use kiln_config::KilnConfig;
use kiln_diagnostics::sink::DEFAULT_MAX_ERRORS;
use kiln_diagnostics::{Diagnostic, DiagnosticSink, Position};
use kiln_incremental::{CompileOptions, Compilers, EngineError, EngineInputs, IncrementalEngine};
use tracing::{debug, info};

use crate::error::CompileError;

/// The result of a successful compile.
#[derive(Debug, Clone)]
pub struct CompileOutcome {
    /// Every diagnostic reported, warnings included.
    pub diagnostics: Vec<Diagnostic>,
    /// Sources that were compiled, in path order.
    pub recompiled: Vec<PathBuf>,
    /// The analysis that was committed.
    pub analysis: CompileAnalysis,
}

/// Runs incremental compiles of one module against its analysis store.
///
/// The store is read before every compile and replaced only after a
/// successful one, so a failed compile leaves the previous analysis as the
/// baseline for the next attempt. Concurrent compiles of the same module
/// must be serialised by the caller.
pub struct CompileOrchestrator {
    compilers: Compilers,
    engine: Arc<dyn IncrementalEngine>,
    store: AnalysisStore,
    layout: AnalysisLayout,
    order: CompileOrder,
    max_errors: usize,
    scalac_options: Vec<String>,
    javac_options: Vec<String>,
}

impl CompileOrchestrator {
    /// Creates an orchestrator persisting to `store`, with the default
    /// layout, mixed compile order and error cap.
    pub fn new(
        compilers: Compilers,
        engine: Arc<dyn IncrementalEngine>,
        store: AnalysisStore,
    ) -> Self {
        Self {
            compilers,
            engine,
            store,
            layout: AnalysisLayout::default(),
            order: CompileOrder::default(),
            max_errors: DEFAULT_MAX_ERRORS,
            scalac_options: Vec::new(),
            javac_options: Vec::new(),
        }
    }

    /// Creates an orchestrator taking its compile order, error cap and
    /// compiler options from `[compile]` and its layout from `[analysis]`.
    pub fn configured(
        compilers: Compilers,
        engine: Arc<dyn IncrementalEngine>,
        store: AnalysisStore,
        config: &KilnConfig,
    ) -> Self {
        let compile = &config.compile;
        Self::new(compilers, engine, store)
            .with_layout(AnalysisLayout::new(config.analysis.layout.clone()))
            .with_order(compile.order)
            .with_max_errors(compile.max_errors)
            .with_options(compile.scalac_options.clone(), compile.javac_options.clone())
    }

    /// Uses `layout` to find upstream modules' analyses.
    pub fn with_layout(mut self, layout: AnalysisLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the mixed-language compile order.
    pub fn with_order(mut self, order: CompileOrder) -> Self {
        self.order = order;
        self
    }

    /// Caps the number of reported errors.
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    /// Sets the options [`compile_sources`](Self::compile_sources) passes
    /// to the compilers.
    pub fn with_options(mut self, scalac_options: Vec<String>, javac_options: Vec<String>) -> Self {
        self.scalac_options = scalac_options;
        self.javac_options = javac_options;
        self
    }

    /// The store this orchestrator reads and commits.
    pub fn store(&self) -> &AnalysisStore {
        &self.store
    }

    /// The compilers every compile uses.
    pub fn compilers(&self) -> &Compilers {
        &self.compilers
    }

    /// Compiles `sources` into `output_dir`.
    ///
    /// `classpath` excludes the output directory, which is prepended. On
    /// success the new analysis is committed and returned with every
    /// diagnostic. On a compile error nothing is committed and the
    /// diagnostics are returned in [`CompileError::DelegatedCompileFailure`].
    pub fn compile(
        &self,
        classpath: &[PathBuf],
        sources: &[PathBuf],
        output_dir: &Path,
        scalac_options: &[String],
        javac_options: &[String],
    ) -> Result<CompileOutcome, CompileError> {
        let previous = self.store.load()?;

        let mut full_classpath = Vec::with_capacity(classpath.len() + 1);
        full_classpath.push(output_dir.to_path_buf());
        full_classpath.extend(classpath.iter().filter(|e| *e != output_dir).cloned());

        std::fs::create_dir_all(output_dir).map_err(|e| CompileError::Io {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

        let setup = Setup {
            output_dir: output_dir.to_path_buf(),
            compiler_version: self.compilers.toolchain.version_string().to_string(),
            scalac_options: scalac_options.to_vec(),
            javac_options: javac_options.to_vec(),
            order: self.order,
        };
        let options = CompileOptions {
            classpath: full_classpath,
            sources: sources.to_vec(),
            output_dir: output_dir.to_path_buf(),
            scalac_options: scalac_options.to_vec(),
            javac_options: javac_options.to_vec(),
            max_errors: self.max_errors,
            order: self.order,
        };
        debug!(
            sources = sources.len(),
            classpath = options.classpath.len(),
            previous = !previous.is_empty(),
            "starting incremental compile"
        );

        let sink = DiagnosticSink::with_max_errors(self.max_errors);
        let lookup = CrossModuleAnalysisLookup::new(self.layout.clone());
        let result = self.engine.compile(EngineInputs {
            compilers: &self.compilers,
            options: &options,
            setup: &setup,
            previous: &previous,
            lookup: &lookup,
            sink: &sink,
        });

        let output = match result {
            Ok(output) => output,
            Err(EngineError::Io { path, source }) => return Err(CompileError::Io { path, source }),
            Err(EngineError::Compiler { reason }) => {
                sink.emit(Diagnostic::error(reason, Position::NONE));
                return Err(CompileError::DelegatedCompileFailure {
                    diagnostics: sink.take_all(),
                });
            }
            Err(EngineError::CompileFailed { errors }) => {
                info!(errors, "compilation failed, keeping previous analysis");
                return Err(CompileError::DelegatedCompileFailure {
                    diagnostics: sink.take_all(),
                });
            }
        };

        self.store
            .commit(&output.analysis, &output.setup)
            .map_err(|e| self.commit_error(e))?;
        info!(
            recompiled = output.recompiled.len(),
            warnings = sink.warning_count(),
            "compilation succeeded"
        );

        Ok(CompileOutcome {
            diagnostics: sink.take_all(),
            recompiled: output.recompiled,
            analysis: output.analysis,
        })
    }

    /// Compiles `sources` into `output_dir` with the orchestrator's own
    /// compiler options.
    pub fn compile_sources(
        &self,
        classpath: &[PathBuf],
        sources: &[PathBuf],
        output_dir: &Path,
    ) -> Result<CompileOutcome, CompileError> {
        self.compile(
            classpath,
            sources,
            output_dir,
            &self.scalac_options,
            &self.javac_options,
        )
    }

    fn commit_error(&self, err: AnalysisError) -> CompileError {
        match err {
            AnalysisError::Serialization { reason } => CompileError::Io {
                path: self.store.path().to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, reason),
            },
            other => other.into(),
        }
    }
}

impl std::fmt::Debug for CompileOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompileOrchestrator")
            .field("store", &self.store)
            .field("order", &self.order)
            .field("max_errors", &self.max_errors)
            .field("scalac_options", &self.scalac_options)
            .field("javac_options", &self.javac_options)
            .finish_non_exhaustive()
    }
}
