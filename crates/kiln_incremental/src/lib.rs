//! The incremental engine seam and a reference engine.
//!
//! [`IncrementalEngine`] is what the orchestrator delegates a compile to.
//! [`HashingEngine`] implements it on top of any [`SourceCompiler`]: it
//! detects changed sources by content hash, follows the recorded dependency
//! graph to invalidate dependents, and recompiles in rounds until no class
//! API changes any more.

#![warn(missing_docs)]

pub mod changes;
pub mod classpath;
pub mod compiler;
pub mod engine;
pub mod error;
pub mod hashing;
pub mod options;

pub use changes::ChangeSet;
pub use classpath::ClasspathIndex;
pub use compiler::{
    CompileRequest, CompiledClass, CompiledUnit, CompilerOutput, Compilers, SourceCompiler,
};
pub use engine::{EngineInputs, EngineOutput, IncrementalEngine};
pub use error::EngineError;
pub use hashing::HashingEngine;
pub use options::CompileOptions;
