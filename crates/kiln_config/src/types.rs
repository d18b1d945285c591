//! Configuration types deserialized from `kiln.toml`.

use kiln_common::CompileOrder;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// The top-level build configuration parsed from `kiln.toml`.
#[derive(Debug, Deserialize)]
pub struct KilnConfig {
    /// The compiler toolchain jars and version.
    pub toolchain: ToolchainConfig,
    /// The incremental engine release the bridge is built for.
    pub engine: EngineConfig,
    /// Overrides for the derived bridge coordinates.
    #[serde(default)]
    pub bridge: BridgeConfig,
    /// Properties of the host JVM.
    #[serde(default)]
    pub runtime: RuntimeConfig,
    /// Compiler options and ordering policy.
    #[serde(default)]
    pub compile: CompileConfig,
    /// Cache locations.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Local artifact repository settings.
    #[serde(default)]
    pub repository: RepositoryConfig,
    /// Analysis-store layout for cross-module lookups.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// The compiler toolchain: version and the jars it is loaded from.
#[derive(Debug, Deserialize)]
pub struct ToolchainConfig {
    /// The full compiler version (e.g. "2.13.12").
    pub version: String,
    /// The standard library jar.
    pub library_jar: PathBuf,
    /// The compiler jar.
    pub compiler_jar: PathBuf,
    /// The reflection jar, kept for reference but not placed on the loader path.
    #[serde(default)]
    pub reflect_jar: Option<PathBuf>,
    /// Additional jars the compiler needs at runtime.
    #[serde(default)]
    pub extra_jars: Vec<PathBuf>,
    /// Overrides the compiler driver's main class used for bootstrap
    /// compiles. Derived from the version when absent.
    #[serde(default)]
    pub main_class: Option<String>,
}

/// The incremental engine release that compiled bridges must match.
#[derive(Debug, Deserialize)]
pub struct EngineConfig {
    /// Engine version (e.g. "1.9.3").
    pub version: String,
    /// Build timestamp of the engine release.
    #[serde(default)]
    pub timestamp: String,
}

/// Optional overrides of the bridge coordinates derived from the toolchain.
#[derive(Debug, Default, Deserialize)]
pub struct BridgeConfig {
    /// Bridge group id.
    pub group: Option<String>,
    /// Bridge artifact id.
    pub artifact: Option<String>,
    /// Bridge version.
    pub version: Option<String>,
    /// The bridge's compile-time dependency closure, for repositories that
    /// cannot compute it.
    #[serde(default)]
    pub dependencies: Vec<DependencyConfig>,
}

/// One entry of the bridge dependency closure.
#[derive(Debug, Clone, Deserialize)]
pub struct DependencyConfig {
    /// Group id.
    pub group: String,
    /// Artifact id.
    pub artifact: String,
    /// Version.
    pub version: String,
    /// Optional classifier (e.g. "sources").
    #[serde(default)]
    pub classifier: Option<String>,
    /// Dependency scope.
    #[serde(default)]
    pub scope: DependencyScope,
}

/// Maven dependency scope of a configured dependency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyScope {
    /// Needed to compile and run.
    #[default]
    Compile,
    /// Needed only at runtime.
    Runtime,
    /// Supplied by the environment (the compiler toolchain).
    Provided,
    /// Needed only by tests.
    Test,
    /// Supplied from an explicit system path.
    System,
}

/// Properties of the host JVM.
#[derive(Debug, Deserialize)]
pub struct RuntimeConfig {
    /// The class-file version of the host runtime (e.g. "52.0" for Java 8).
    #[serde(default = "default_class_version")]
    pub class_version: String,
    /// Java installation used to run bootstrap compiles.
    #[serde(default)]
    pub java_home: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            class_version: default_class_version(),
            java_home: None,
        }
    }
}

fn default_class_version() -> String {
    "52.0".to_string()
}

/// Compiler options and ordering policy.
#[derive(Debug, Deserialize)]
pub struct CompileConfig {
    /// Mixed-language ordering policy.
    #[serde(default)]
    pub order: CompileOrder,
    /// Options passed to the Scala compiler.
    #[serde(default)]
    pub scalac_options: Vec<String>,
    /// Options passed to the Java compiler.
    #[serde(default)]
    pub javac_options: Vec<String>,
    /// Maximum number of errors reported per compile.
    #[serde(default = "default_max_errors")]
    pub max_errors: usize,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            order: CompileOrder::default(),
            scalac_options: Vec::new(),
            javac_options: Vec::new(),
            max_errors: default_max_errors(),
        }
    }
}

fn default_max_errors() -> usize {
    100
}

/// Cache locations.
#[derive(Debug, Default, Deserialize)]
pub struct CacheConfig {
    /// Directory holding compiled bridge jars.
    pub secondary_dir: Option<PathBuf>,
}

impl CacheConfig {
    /// Returns the configured bridge cache directory, or
    /// `$HOME/.sbt/1.0/zinc/org.scala-sbt` when none is configured.
    pub fn secondary_dir_or_default(&self) -> Result<PathBuf, ConfigError> {
        match &self.secondary_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(home_dir()?
                .join(".sbt")
                .join("1.0")
                .join("zinc")
                .join("org.scala-sbt")),
        }
    }
}

/// Local artifact repository settings.
#[derive(Debug, Default, Deserialize)]
pub struct RepositoryConfig {
    /// Root of a Maven-layout repository.
    pub local: Option<PathBuf>,
}

impl RepositoryConfig {
    /// Returns the configured repository root, or `$HOME/.m2/repository`.
    pub fn local_or_default(&self) -> Result<PathBuf, ConfigError> {
        match &self.local {
            Some(dir) => Ok(dir.clone()),
            None => Ok(home_dir()?.join(".m2").join("repository")),
        }
    }
}

fn home_dir() -> Result<PathBuf, ConfigError> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| ConfigError::MissingField("HOME environment variable".to_string()))
}

/// Analysis-store layout: output directory name to store file name.
#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    /// Maps an output directory's own name (e.g. "classes") to the name of
    /// its analysis store under the sibling `analysis/` directory.
    #[serde(default = "default_layout")]
    pub layout: BTreeMap<String, String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            layout: default_layout(),
        }
    }
}

fn default_layout() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("classes".to_string(), "compile".to_string()),
        ("test-classes".to_string(), "test-compile".to_string()),
    ])
}

impl KilnConfig {
    /// Rewrites every relative path in the configuration against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.toolchain.library_jar);
        resolve(&mut self.toolchain.compiler_jar);
        if let Some(reflect) = self.toolchain.reflect_jar.as_mut() {
            resolve(reflect);
        }
        for jar in &mut self.toolchain.extra_jars {
            resolve(jar);
        }
        if let Some(java_home) = self.runtime.java_home.as_mut() {
            resolve(java_home);
        }
        if let Some(dir) = self.cache.secondary_dir.as_mut() {
            resolve(dir);
        }
        if let Some(dir) = self.repository.local.as_mut() {
            resolve(dir);
        }
    }
}
