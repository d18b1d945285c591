//! Incremental compile orchestration.
//!
//! [`prepare_compilers`] does the once-per-toolchain work: provisioning the
//! compiler and making sure its bridge jar exists. A [`CompileOrchestrator`]
//! then runs each compile of one module: it loads the previous analysis,
//! delegates to an [`IncrementalEngine`](kiln_incremental::IncrementalEngine),
//! and commits the new analysis only when the compile succeeds.

#![warn(missing_docs)]

pub mod error;
pub mod orchestrator;
pub mod prepare;

pub use error::CompileError;
pub use orchestrator::{CompileOrchestrator, CompileOutcome};
pub use prepare::prepare_compilers;
