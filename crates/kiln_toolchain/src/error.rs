//! Error types for toolchain provisioning.

use std::path::PathBuf;

/// Errors that can occur while provisioning a compiler toolchain.
#[derive(Debug, thiserror::Error)]
pub enum ToolchainError {
    /// A toolchain artifact does not exist or cannot be read.
    #[error("toolchain artifact not found: {path}")]
    ResourceNotFound {
        /// The missing artifact.
        path: PathBuf,
    },

    /// A toolchain jar exists but could not be read as an archive.
    #[error("failed to read toolchain archive {path}: {reason}")]
    Archive {
        /// The unreadable archive.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// A compiler version string could not be parsed.
    #[error("invalid compiler version '{version}'")]
    InvalidVersion {
        /// The rejected version string.
        version: String,
    },
}
