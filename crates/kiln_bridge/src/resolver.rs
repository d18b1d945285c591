//! Artifact resolution boundary and a local Maven-layout implementation.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::BridgeError;

/// Maven coordinates of one artifact.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Coordinate {
    /// Group id.
    pub group: String,
    /// Artifact id.
    pub artifact: String,
    /// Version.
    pub version: String,
    /// Optional classifier (e.g. "sources").
    pub classifier: Option<String>,
}

impl Coordinate {
    /// Creates a coordinate without a classifier.
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
            classifier: None,
        }
    }

    /// Returns this coordinate with `classifier` set.
    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{classifier}")?;
        }
        Ok(())
    }
}

/// Maven dependency scope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Needed to compile and run.
    #[default]
    Compile,
    /// Needed only at runtime.
    Runtime,
    /// Supplied by the environment.
    Provided,
    /// Needed only by tests.
    Test,
    /// Supplied from an explicit system path.
    System,
}

/// One resolved artifact and the scope it was reached through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedArtifact {
    /// The coordinate that was resolved.
    pub coordinate: Coordinate,
    /// Local file of the artifact.
    pub path: PathBuf,
    /// Scope of the dependency edge.
    pub scope: Scope,
}

/// Locates artifacts on the local filesystem, downloading them if the
/// implementation supports it.
pub trait ArtifactResolver: Send + Sync {
    /// Returns the local file of `coordinate`.
    fn resolve(&self, coordinate: &Coordinate) -> Result<PathBuf, BridgeError>;

    /// Returns `coordinate` itself followed by its transitive dependencies.
    fn resolve_with_dependencies(
        &self,
        coordinate: &Coordinate,
    ) -> Result<Vec<ResolvedArtifact>, BridgeError>;
}

/// Resolves artifacts from a Maven-layout directory such as `~/.m2/repository`.
///
/// A local repository has no dependency metadata of its own, so the
/// dependency closure is supplied up front and returned for every request.
#[derive(Clone, Debug)]
pub struct LocalRepository {
    root: PathBuf,
    dependencies: Vec<(Coordinate, Scope)>,
}

impl LocalRepository {
    /// Creates a resolver rooted at `root` with no declared dependencies.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dependencies: Vec::new(),
        }
    }

    /// Declares the dependency closure returned by
    /// [`resolve_with_dependencies`](ArtifactResolver::resolve_with_dependencies).
    pub fn with_dependencies(mut self, dependencies: Vec<(Coordinate, Scope)>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// The repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns where `coordinate` lives in the repository, whether or not
    /// the file exists.
    pub fn artifact_path(&self, coordinate: &Coordinate) -> PathBuf {
        let mut dir = self.root.clone();
        for segment in coordinate.group.split('.') {
            dir.push(segment);
        }
        dir.push(&coordinate.artifact);
        dir.push(&coordinate.version);
        let file = match &coordinate.classifier {
            Some(classifier) => format!(
                "{}-{}-{}.jar",
                coordinate.artifact, coordinate.version, classifier
            ),
            None => format!("{}-{}.jar", coordinate.artifact, coordinate.version),
        };
        dir.join(file)
    }
}

impl ArtifactResolver for LocalRepository {
    fn resolve(&self, coordinate: &Coordinate) -> Result<PathBuf, BridgeError> {
        let path = self.artifact_path(coordinate);
        if path.is_file() {
            debug!(%coordinate, path = %path.display(), "resolved artifact");
            Ok(path)
        } else {
            Err(BridgeError::DependencyResolution {
                coordinate: coordinate.to_string(),
                reason: format!("{} does not exist", path.display()),
            })
        }
    }

    fn resolve_with_dependencies(
        &self,
        coordinate: &Coordinate,
    ) -> Result<Vec<ResolvedArtifact>, BridgeError> {
        let mut resolved = vec![ResolvedArtifact {
            coordinate: coordinate.clone(),
            path: self.resolve(coordinate)?,
            scope: Scope::Compile,
        }];
        for (dependency, scope) in &self.dependencies {
            // Provided artifacts come from the toolchain and need not be installed.
            let path = match scope {
                Scope::Provided => self.artifact_path(dependency),
                _ => self.resolve(dependency)?,
            };
            resolved.push(ResolvedArtifact {
                coordinate: dependency.clone(),
                path,
                scope: *scope,
            });
        }
        Ok(resolved)
    }
}
