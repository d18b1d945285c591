//! Error types for analysis persistence.

use std::path::PathBuf;

/// Errors that can occur while loading or committing an analysis store.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The store exists but cannot be decoded.
    #[error("corrupt analysis store {path}: {reason}")]
    CorruptStore {
        /// The store file.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// An I/O error occurred while reading or writing a store.
    #[error("analysis store I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The analysis could not be encoded.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the failure.
        reason: String,
    },
}
