//! The error type reported to the host build.

use std::path::PathBuf;

use kiln_analysis::AnalysisError;
use kiln_bridge::BridgeError;
use kiln_diagnostics::Diagnostic;
use kiln_toolchain::ToolchainError;

/// Why a compile, or the preparation for one, failed.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// A toolchain artifact does not exist or cannot be read.
    #[error("toolchain artifact not found: {path}")]
    ResourceNotFound {
        /// The missing artifact.
        path: PathBuf,
    },

    /// The toolchain description is unusable.
    #[error("invalid toolchain: {reason}")]
    InvalidToolchain {
        /// Description of the problem.
        reason: String,
    },

    /// The bridge sources or their dependencies could not be resolved.
    #[error("failed to resolve {coordinate}: {reason}")]
    DependencyResolution {
        /// The artifact coordinate that failed.
        coordinate: String,
        /// Description of the failure.
        reason: String,
    },

    /// The bridge could not be compiled.
    #[error("compiler bridge compilation failed: {reason}")]
    BootstrapCompile {
        /// Compiler output or launch failure.
        reason: String,
    },

    /// The bridge jar could not be packaged.
    #[error("failed to package {path}: {reason}")]
    Packaging {
        /// The archive being written.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// The previous analysis exists but cannot be decoded.
    #[error("corrupt analysis store {path}: {reason}")]
    CorruptStore {
        /// The store file.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// The compiler reported errors.
    #[error(
        "compilation failed with {} error(s)",
        .diagnostics.iter().filter(|d| d.is_error()).count()
    )]
    DelegatedCompileFailure {
        /// Every diagnostic of the failed compile, positions unchanged.
        diagnostics: Vec<Diagnostic>,
    },

    /// Reading or writing a file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl CompileError {
    /// The stage that failed, for human-readable reports.
    pub fn stage(&self) -> &'static str {
        match self {
            CompileError::ResourceNotFound { .. } | CompileError::InvalidToolchain { .. } => {
                "toolchain"
            }
            CompileError::DependencyResolution { .. }
            | CompileError::BootstrapCompile { .. }
            | CompileError::Packaging { .. } => "bridge",
            CompileError::CorruptStore { .. } => "analysis",
            CompileError::DelegatedCompileFailure { .. } => "compile",
            CompileError::Io { .. } => "io",
        }
    }
}

impl From<ToolchainError> for CompileError {
    fn from(err: ToolchainError) -> Self {
        match err {
            ToolchainError::ResourceNotFound { path } => CompileError::ResourceNotFound { path },
            other => CompileError::InvalidToolchain {
                reason: other.to_string(),
            },
        }
    }
}

impl From<BridgeError> for CompileError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::DependencyResolution { coordinate, reason } => {
                CompileError::DependencyResolution { coordinate, reason }
            }
            BridgeError::BootstrapCompile { reason } => CompileError::BootstrapCompile { reason },
            BridgeError::Packaging { path, reason } => CompileError::Packaging { path, reason },
            BridgeError::Io { path, source } => CompileError::Io { path, source },
            BridgeError::Toolchain(err) => err.into(),
        }
    }
}

impl From<AnalysisError> for CompileError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::CorruptStore { path, reason } => {
                CompileError::CorruptStore { path, reason }
            }
            AnalysisError::Io { path, source } => CompileError::Io { path, source },
            AnalysisError::Serialization { reason } => CompileError::Io {
                path: PathBuf::new(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, reason),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_diagnostics::Position;

    #[test]
    fn delegated_failure_counts_errors() {
        let err = CompileError::DelegatedCompileFailure {
            diagnostics: vec![
                Diagnostic::error("type mismatch", Position::new("A.scala", 3, 7)),
                Diagnostic::warning("deprecated", Position::NONE),
            ],
        };
        assert_eq!(err.to_string(), "compilation failed with 1 error(s)");
        assert_eq!(err.stage(), "compile");
    }

    #[test]
    fn toolchain_errors_map_to_resource_not_found() {
        let err: CompileError = ToolchainError::ResourceNotFound {
            path: PathBuf::from("lib.jar"),
        }
        .into();
        assert!(matches!(err, CompileError::ResourceNotFound { .. }));
        assert_eq!(err.stage(), "toolchain");

        let err: CompileError = ToolchainError::InvalidVersion {
            version: "x".to_string(),
        }
        .into();
        assert!(matches!(err, CompileError::InvalidToolchain { .. }));
    }

    #[test]
    fn bridge_errors_keep_their_stage() {
        let err: CompileError = BridgeError::BootstrapCompile {
            reason: "boom".to_string(),
        }
        .into();
        assert_eq!(err.stage(), "bridge");
        assert_eq!(err.to_string(), "compiler bridge compilation failed: boom");

        let err: CompileError = BridgeError::Toolchain(ToolchainError::ResourceNotFound {
            path: PathBuf::from("compiler.jar"),
        })
        .into();
        assert!(matches!(err, CompileError::ResourceNotFound { .. }));
    }

    #[test]
    fn corrupt_store_display() {
        let err: CompileError = AnalysisError::CorruptStore {
            path: PathBuf::from("target/analysis/compile"),
            reason: "bad magic bytes".to_string(),
        }
        .into();
        assert_eq!(err.stage(), "analysis");
        assert_eq!(
            err.to_string(),
            "corrupt analysis store target/analysis/compile: bad magic bytes"
        );
    }
}
