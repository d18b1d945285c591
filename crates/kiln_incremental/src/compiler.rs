//! The seam between the engine and the wrapped compiler.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use kiln_common::ContentHash;
use kiln_diagnostics::Diagnostic;
use kiln_toolchain::Toolchain;

use crate::error::EngineError;

/// A provisioned toolchain and the bridge jar that drives it.
#[derive(Debug, Clone)]
pub struct Compilers {
    /// The compiler toolchain.
    pub toolchain: Toolchain,
    /// The compiled bridge for that toolchain.
    pub bridge_jar: PathBuf,
}

/// One batch of sources handed to the compiler.
#[derive(Debug)]
pub struct CompileRequest<'a> {
    /// Sources to compile.
    pub sources: &'a [PathBuf],
    /// Full classpath, the output directory first.
    pub classpath: &'a [PathBuf],
    /// Directory receiving class files.
    pub output_dir: &'a Path,
    /// Options passed to the Scala compiler.
    pub scalac_options: &'a [String],
    /// Options passed to the Java compiler.
    pub javac_options: &'a [String],
}

/// A class produced by the compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledClass {
    /// Binary class name.
    pub name: String,
    /// Class file path relative to the output directory.
    pub class_file: PathBuf,
    /// Fingerprint of the class's public API.
    pub api_hash: ContentHash,
}

/// Everything the compiler produced for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledUnit {
    /// The source file.
    pub source: PathBuf,
    /// Classes it defines.
    pub classes: Vec<CompiledClass>,
    /// Binary names of every class it references.
    pub references: BTreeSet<String>,
}

/// The result of one compiler run.
#[derive(Debug, Clone, Default)]
pub struct CompilerOutput {
    /// One unit per compiled source.
    pub units: Vec<CompiledUnit>,
    /// Diagnostics in the order the compiler reported them.
    pub diagnostics: Vec<Diagnostic>,
}

/// Compiles a batch of sources, writing class files to the output directory.
///
/// Compile errors are reported as error diagnostics in the output, not as an
/// `Err`; `Err` is reserved for failing to run the compiler.
pub trait SourceCompiler: Send + Sync {
    /// Compiles `request.sources`.
    fn compile(
        &self,
        compilers: &Compilers,
        request: &CompileRequest<'_>,
    ) -> Result<CompilerOutput, EngineError>;
}

impl<C: SourceCompiler + ?Sized> SourceCompiler for Arc<C> {
    fn compile(
        &self,
        compilers: &Compilers,
        request: &CompileRequest<'_>,
    ) -> Result<CompilerOutput, EngineError> {
        (**self).compile(compilers, request)
    }
}
