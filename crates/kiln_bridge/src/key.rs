//! Bridge cache keys.

use std::fmt;

/// The incremental engine release a bridge is compiled against.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EngineRelease {
    /// Engine version (e.g. "1.9.3").
    pub version: String,
    /// Build timestamp of the engine release.
    pub timestamp: String,
}

impl EngineRelease {
    /// Creates a release description.
    pub fn new(version: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Identifies one compiled bridge jar in the cache directory.
///
/// Rendered as
/// `<group>-<artifact>-<version>-bin_<compiler>__<class version>-<version>_<timestamp>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BridgeCacheKey {
    /// Bridge group id.
    pub group: String,
    /// Bridge artifact id.
    pub artifact: String,
    /// Bridge version.
    pub version: String,
    /// Full compiler version the bridge is compiled with.
    pub compiler_version: String,
    /// Class-file version of the host runtime.
    pub class_version: String,
    /// Engine build timestamp.
    pub timestamp: String,
}

impl BridgeCacheKey {
    /// The cache file name, `<key>.jar`.
    pub fn file_name(&self) -> String {
        format!("{self}.jar")
    }
}

impl fmt::Display for BridgeCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-bin_{}__{}-{}_{}",
            self.group,
            self.artifact,
            self.version,
            self.compiler_version,
            self.class_version,
            self.version,
            self.timestamp
        )
    }
}
