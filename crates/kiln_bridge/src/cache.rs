//! The secondary cache of compiled bridge jars.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use kiln_common::SingleFlight;
use kiln_toolchain::{CompilerCoordinates, Toolchain};
use tracing::info;

use crate::bootstrap::{BootstrapCompiler, BootstrapRequest};
use crate::error::BridgeError;
use crate::jar::{self, Manifest};
use crate::key::{BridgeCacheKey, EngineRelease};
use crate::resolver::{ArtifactResolver, Coordinate, Scope};

/// Classifier of the published bridge sources.
const SOURCES_CLASSIFIER: &str = "sources";

/// Builds compiler bridge jars on demand and keeps them in a directory
/// shared between builds.
///
/// A jar is only ever built when `<cache dir>/<key>.jar` is missing. Callers
/// in one process asking for the same key share a single build; separate
/// processes may race, but each publishes with an atomic rename and
/// packaging is reproducible, so the loser's rename is harmless.
pub struct BridgeArtifactCache {
    cache_dir: PathBuf,
    engine: EngineRelease,
    class_version: String,
    resolver: Arc<dyn ArtifactResolver>,
    compiler: Arc<dyn BootstrapCompiler>,
    in_flight: SingleFlight<BridgeCacheKey, PathBuf>,
}

impl BridgeArtifactCache {
    /// Creates a cache rooted at `cache_dir` for bridges targeting `engine`
    /// on a host runtime with class-file version `class_version`.
    pub fn new(
        cache_dir: impl Into<PathBuf>,
        engine: EngineRelease,
        class_version: impl Into<String>,
        resolver: Arc<dyn ArtifactResolver>,
        compiler: Arc<dyn BootstrapCompiler>,
    ) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            engine,
            class_version: class_version.into(),
            resolver,
            compiler,
            in_flight: SingleFlight::new(),
        }
    }

    /// The directory bridge jars are stored in.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// The engine release bridges are built for.
    pub fn engine(&self) -> &EngineRelease {
        &self.engine
    }

    /// Computes the cache key of the bridge for `toolchain`, deriving the
    /// bridge version from the engine release.
    pub fn key_for(
        &self,
        toolchain: &Toolchain,
        coordinates: &dyn CompilerCoordinates,
    ) -> BridgeCacheKey {
        let version = coordinates.bridge_version(toolchain.version(), &self.engine.version);
        self.key_for_version(toolchain, coordinates, &version)
    }

    /// Computes the cache key of bridge `version` for `toolchain`.
    pub fn key_for_version(
        &self,
        toolchain: &Toolchain,
        coordinates: &dyn CompilerCoordinates,
        version: &str,
    ) -> BridgeCacheKey {
        BridgeCacheKey {
            group: coordinates.bridge_group_id(),
            artifact: coordinates.bridge_artifact_id(toolchain.version()),
            version: version.to_string(),
            compiler_version: toolchain.version_string().to_string(),
            class_version: self.class_version.clone(),
            timestamp: self.engine.timestamp.clone(),
        }
    }

    /// Returns the bridge jar for `toolchain`, building it if necessary.
    pub fn ensure_bridge(
        &self,
        toolchain: &Toolchain,
        coordinates: &dyn CompilerCoordinates,
    ) -> Result<PathBuf, BridgeError> {
        let key = self.key_for(toolchain, coordinates);
        self.ensure(toolchain, coordinates, key)
    }

    /// Returns the jar of bridge `version` for `toolchain`, building it if
    /// necessary.
    pub fn ensure_bridge_version(
        &self,
        toolchain: &Toolchain,
        coordinates: &dyn CompilerCoordinates,
        version: &str,
    ) -> Result<PathBuf, BridgeError> {
        let key = self.key_for_version(toolchain, coordinates, version);
        self.ensure(toolchain, coordinates, key)
    }

    fn ensure(
        &self,
        toolchain: &Toolchain,
        coordinates: &dyn CompilerCoordinates,
        key: BridgeCacheKey,
    ) -> Result<PathBuf, BridgeError> {
        let path = self.cache_dir.join(key.file_name());
        info!("Compiler bridge file: {}", path.display());
        if path.is_file() {
            return Ok(path);
        }

        let built = self.in_flight.get_or_try_init(&key, || {
            if path.is_file() {
                return Ok::<PathBuf, BridgeError>(path.clone());
            }
            info!("Compiler bridge file is not installed yet");
            self.build(toolchain, coordinates, &key, &path)?;
            info!("Compiler bridge installed");
            Ok(path.clone())
        })?;

        if built.is_file() {
            return Ok(built);
        }
        // Deleted after this process built it.
        self.in_flight.forget(&key);
        self.in_flight.get_or_try_init(&key, || {
            self.build(toolchain, coordinates, &key, &path)?;
            Ok(path.clone())
        })
    }

    fn build(
        &self,
        toolchain: &Toolchain,
        coordinates: &dyn CompilerCoordinates,
        key: &BridgeCacheKey,
        dest: &Path,
    ) -> Result<(), BridgeError> {
        let sources_coordinate = Coordinate::new(&key.group, &key.artifact, &key.version)
            .with_classifier(SOURCES_CLASSIFIER);
        let sources_jar = self.resolver.resolve(&sources_coordinate)?;

        let mut classpath: Vec<PathBuf> = self
            .resolver
            .resolve_with_dependencies(&sources_coordinate)?
            .into_iter()
            .filter(|artifact| artifact.scope != Scope::Provided)
            .map(|artifact| artifact.path)
            .collect();
        classpath.extend(toolchain.all_jars().iter().cloned());
        let mut seen = HashSet::new();
        classpath.retain(|entry| seen.insert(entry.clone()));

        let sources_dir = scratch_dir("kiln-compiler-bridge-sources")?;
        let classes_dir = scratch_dir("kiln-compiler-bridge-classes")?;

        jar::unzip(&sources_jar, sources_dir.path())?;
        let sources = kiln_common::fs::list_directory(sources_dir.path(), |p| {
            p.is_file()
                && p.extension()
                    .is_some_and(|ext| ext == "scala" || ext == "java")
        })
        .map_err(|e| BridgeError::Io {
            path: sources_dir.path().to_path_buf(),
            source: e,
        })?;

        self.compiler.compile(&BootstrapRequest {
            toolchain,
            main_class: &coordinates.main_class(),
            sources: &sources,
            classpath: &classpath,
            output_dir: classes_dir.path(),
            options: &[],
        })?;

        jar::package(classes_dir.path(), &Manifest::for_bridge(&key.version), dest)
    }
}

impl std::fmt::Debug for BridgeArtifactCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeArtifactCache")
            .field("cache_dir", &self.cache_dir)
            .field("engine", &self.engine)
            .field("class_version", &self.class_version)
            .finish_non_exhaustive()
    }
}

fn scratch_dir(prefix: &str) -> Result<tempfile::TempDir, BridgeError> {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .map_err(|e| BridgeError::Io {
            path: std::env::temp_dir(),
            source: e,
        })
}
