//! Persisted compile analysis and cross-module lookups.
//!
//! A [`CompileAnalysis`] records, for one output directory, which classes
//! each source produced and what each source depended on. It is persisted
//! together with the [`Setup`] it was produced under by an
//! [`AnalysisStore`], and read back by downstream modules through a
//! [`CrossModuleAnalysisLookup`] keyed by classpath entry.

#![warn(missing_docs)]

pub mod analysis;
pub mod error;
pub mod layout;
pub mod lookup;
pub mod setup;
pub mod store;

pub use analysis::{ClassInfo, CompileAnalysis, SourceInfo};
pub use error::AnalysisError;
pub use layout::AnalysisLayout;
pub use lookup::{ClassKind, CrossModuleAnalysisLookup, DefinesClass};
pub use setup::{AnalysisContents, PreviousResult, Setup};
pub use store::AnalysisStore;
