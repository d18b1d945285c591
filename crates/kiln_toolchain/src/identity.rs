//! Toolchain identities used as loading-context cache keys.

use std::fmt;
use std::path::{Path, PathBuf};

/// A compiler version plus the ordered artifacts it is loaded from.
///
/// Two identities are equal only if their versions match and their artifact
/// lists are equal in the same order, since artifact order decides which jar
/// wins when several define the same class.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ToolchainIdentity {
    version: String,
    artifacts: Vec<PathBuf>,
}

impl ToolchainIdentity {
    /// Creates an identity from an explicit artifact list.
    pub fn new(version: impl Into<String>, artifacts: Vec<PathBuf>) -> Self {
        Self {
            version: version.into(),
            artifacts,
        }
    }

    /// Creates an identity in loader order: extra jars, then the library
    /// jar, then the compiler jar.
    pub fn from_jars(
        version: impl Into<String>,
        library_jar: &Path,
        compiler_jar: &Path,
        extra_jars: &[PathBuf],
    ) -> Self {
        let mut artifacts = extra_jars.to_vec();
        artifacts.push(library_jar.to_path_buf());
        artifacts.push(compiler_jar.to_path_buf());
        Self::new(version, artifacts)
    }

    /// The compiler version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The artifacts, in loader order.
    pub fn artifacts(&self) -> &[PathBuf] {
        &self.artifacts
    }
}

impl fmt::Display for ToolchainIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} artifacts)", self.version, self.artifacts.len())
    }
}
