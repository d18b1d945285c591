//! Error types for incremental compiles.

use std::path::PathBuf;

/// Errors that can occur during an incremental compile.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The compiler reported errors. The diagnostics are in the sink.
    #[error("compilation failed with {errors} error(s)")]
    CompileFailed {
        /// Number of error diagnostics reported.
        errors: usize,
    },

    /// The compiler could not be run at all.
    #[error("compiler failure: {reason}")]
    Compiler {
        /// Description of the failure.
        reason: String,
    },

    /// A source or class file could not be read or removed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_failed_display() {
        let err = EngineError::CompileFailed { errors: 3 };
        assert_eq!(err.to_string(), "compilation failed with 3 error(s)");
    }

    #[test]
    fn compiler_display() {
        let err = EngineError::Compiler {
            reason: "bridge jar missing".to_string(),
        };
        assert_eq!(err.to_string(), "compiler failure: bridge jar missing");
    }

    #[test]
    fn io_display() {
        let err = EngineError::Io {
            path: PathBuf::from("src/A.scala"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().starts_with("I/O error at src/A.scala"));
    }
}
