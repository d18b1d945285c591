//! Error types for bridge resolution and compilation.

use std::path::PathBuf;

use kiln_toolchain::ToolchainError;

/// Errors that can occur while producing a compiler bridge jar.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The bridge sources or one of their dependencies could not be resolved.
    #[error("failed to resolve {coordinate}: {reason}")]
    DependencyResolution {
        /// The artifact coordinate that failed.
        coordinate: String,
        /// Description of the failure.
        reason: String,
    },

    /// The non-incremental compile of the bridge sources failed.
    #[error("compiler bridge compilation failed: {reason}")]
    BootstrapCompile {
        /// Compiler output or launch failure.
        reason: String,
    },

    /// The bridge archive could not be read or written.
    #[error("failed to package {path}: {reason}")]
    Packaging {
        /// The archive being read or written.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// An I/O error occurred on a scratch or cache path.
    #[error("bridge I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The toolchain the bridge is built for could not be provisioned.
    #[error(transparent)]
    Toolchain(#[from] ToolchainError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_resolution_display() {
        let err = BridgeError::DependencyResolution {
            coordinate: "org.scala-sbt:compiler-bridge_2.13:1.9.3:sources".to_string(),
            reason: "not found in /repo".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to resolve org.scala-sbt:compiler-bridge_2.13:1.9.3:sources: not found in /repo"
        );
    }

    #[test]
    fn bootstrap_compile_display() {
        let err = BridgeError::BootstrapCompile {
            reason: "error: not found: type Foo".to_string(),
        };
        assert!(err.to_string().contains("not found: type Foo"));
    }

    #[test]
    fn io_display() {
        let err = BridgeError::Io {
            path: PathBuf::from("/cache/bridge.jar"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/cache/bridge.jar"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn toolchain_is_transparent() {
        let err: BridgeError = ToolchainError::InvalidVersion {
            version: "x".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "invalid compiler version 'x'");
    }
}
