//! Maven coordinates of the compiler and its bridge artifact.

use crate::version::VersionNumber;

/// Describes where a compiler and its matching bridge are published.
///
/// The bridge coordinates depend on the compiler version and on the
/// incremental engine release the bridge is compiled against.
pub trait CompilerCoordinates: Send + Sync {
    /// Compiler group id.
    fn group_id(&self) -> String;

    /// Compiler artifact id.
    fn artifact_id(&self) -> String;

    /// Main class of the compiler driver.
    fn main_class(&self) -> String;

    /// Group id of the bridge artifact.
    fn bridge_group_id(&self) -> String;

    /// Artifact id of the bridge built for `compiler_version`.
    fn bridge_artifact_id(&self, compiler_version: &VersionNumber) -> String;

    /// Version of the bridge artifact, given the engine release version.
    fn bridge_version(&self, compiler_version: &VersionNumber, engine_version: &str) -> String;
}

/// Coordinates of the Scala compiler family.
///
/// Scala 2 bridges are published by the engine project per binary version;
/// Scala 3 ships its own bridge alongside each compiler release.
#[derive(Clone, Debug, Default)]
pub struct ScalaCoordinates {
    version: Option<VersionNumber>,
}

impl ScalaCoordinates {
    /// Coordinates for a specific compiler version.
    pub fn for_version(version: VersionNumber) -> Self {
        Self {
            version: Some(version),
        }
    }

    fn is_scala3(&self) -> bool {
        self.version.as_ref().is_some_and(VersionNumber::is_scala3)
    }
}

impl CompilerCoordinates for ScalaCoordinates {
    fn group_id(&self) -> String {
        "org.scala-lang".to_string()
    }

    fn artifact_id(&self) -> String {
        if self.is_scala3() {
            "scala3-compiler_3".to_string()
        } else {
            "scala-compiler".to_string()
        }
    }

    fn main_class(&self) -> String {
        if self.is_scala3() {
            "dotty.tools.dotc.Main".to_string()
        } else {
            "scala.tools.nsc.Main".to_string()
        }
    }

    fn bridge_group_id(&self) -> String {
        if self.is_scala3() {
            "org.scala-lang".to_string()
        } else {
            "org.scala-sbt".to_string()
        }
    }

    fn bridge_artifact_id(&self, compiler_version: &VersionNumber) -> String {
        if compiler_version.is_scala3() {
            "scala3-sbt-bridge".to_string()
        } else {
            format!("compiler-bridge_{}", compiler_version.binary_version())
        }
    }

    fn bridge_version(&self, compiler_version: &VersionNumber, engine_version: &str) -> String {
        if compiler_version.is_scala3() {
            compiler_version.to_string()
        } else {
            engine_version.to_string()
        }
    }
}

/// Wraps another set of coordinates, replacing whichever bridge coordinates
/// the build configuration pins.
#[derive(Clone, Debug, Default)]
pub struct OverriddenCoordinates<C> {
    inner: C,
    main_class: Option<String>,
    bridge_group_id: Option<String>,
    bridge_artifact_id: Option<String>,
    bridge_version: Option<String>,
}

impl<C: CompilerCoordinates> OverriddenCoordinates<C> {
    /// Wraps `inner` with no overrides.
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            main_class: None,
            bridge_group_id: None,
            bridge_artifact_id: None,
            bridge_version: None,
        }
    }

    /// Pins the compiler driver's main class.
    pub fn with_main_class(mut self, main_class: Option<String>) -> Self {
        self.main_class = main_class;
        self
    }

    /// Pins the bridge group id.
    pub fn with_bridge_group_id(mut self, group: Option<String>) -> Self {
        self.bridge_group_id = group;
        self
    }

    /// Pins the bridge artifact id.
    pub fn with_bridge_artifact_id(mut self, artifact: Option<String>) -> Self {
        self.bridge_artifact_id = artifact;
        self
    }

    /// Pins the bridge version.
    pub fn with_bridge_version(mut self, version: Option<String>) -> Self {
        self.bridge_version = version;
        self
    }
}

impl<C: CompilerCoordinates> CompilerCoordinates for OverriddenCoordinates<C> {
    fn group_id(&self) -> String {
        self.inner.group_id()
    }

    fn artifact_id(&self) -> String {
        self.inner.artifact_id()
    }

    fn main_class(&self) -> String {
        self.main_class
            .clone()
            .unwrap_or_else(|| self.inner.main_class())
    }

    fn bridge_group_id(&self) -> String {
        self.bridge_group_id
            .clone()
            .unwrap_or_else(|| self.inner.bridge_group_id())
    }

    fn bridge_artifact_id(&self, compiler_version: &VersionNumber) -> String {
        self.bridge_artifact_id
            .clone()
            .unwrap_or_else(|| self.inner.bridge_artifact_id(compiler_version))
    }

    fn bridge_version(&self, compiler_version: &VersionNumber, engine_version: &str) -> String {
        self.bridge_version
            .clone()
            .unwrap_or_else(|| self.inner.bridge_version(compiler_version, engine_version))
    }
}
