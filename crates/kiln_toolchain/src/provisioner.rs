//! Turning toolchain descriptions into shared compiler instances.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::context::LoadingContext;
use crate::error::ToolchainError;
use crate::identity::ToolchainIdentity;
use crate::registry::LoadingContextRegistry;
use crate::version::VersionNumber;

/// Where the compiler toolchain's jars live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolchainSpec {
    /// Full compiler version (e.g. "2.13.12").
    pub version: String,
    /// Standard library jar.
    pub library_jar: PathBuf,
    /// Compiler jar.
    pub compiler_jar: PathBuf,
    /// Reflection jar. Recorded but not placed on the loader path.
    pub reflect_jar: Option<PathBuf>,
    /// Additional runtime jars of the compiler.
    pub extra_jars: Vec<PathBuf>,
}

impl ToolchainSpec {
    /// The identity this spec provisions.
    pub fn identity(&self) -> ToolchainIdentity {
        ToolchainIdentity::from_jars(
            self.version.clone(),
            &self.library_jar,
            &self.compiler_jar,
            &self.extra_jars,
        )
    }
}

/// A provisioned compiler toolchain.
#[derive(Clone, Debug)]
pub struct Toolchain {
    version: VersionNumber,
    library_jar: PathBuf,
    compiler_jar: PathBuf,
    context: Arc<LoadingContext>,
}

impl Toolchain {
    /// Parsed compiler version.
    pub fn version(&self) -> &VersionNumber {
        &self.version
    }

    /// The version string exactly as configured.
    pub fn version_string(&self) -> &str {
        self.context.identity().version()
    }

    /// Standard library jar.
    pub fn library_jar(&self) -> &Path {
        &self.library_jar
    }

    /// Compiler jar.
    pub fn compiler_jar(&self) -> &Path {
        &self.compiler_jar
    }

    /// Every jar on the compiler's loader path, in loader order.
    pub fn all_jars(&self) -> &[PathBuf] {
        self.context.identity().artifacts()
    }

    /// The shared class-resolution context.
    pub fn context(&self) -> &Arc<LoadingContext> {
        &self.context
    }
}

/// Provisions loading contexts through a shared registry.
#[derive(Clone, Debug)]
pub struct ToolchainProvisioner {
    registry: Arc<LoadingContextRegistry>,
}

impl ToolchainProvisioner {
    /// Creates a provisioner backed by `registry`.
    pub fn new(registry: Arc<LoadingContextRegistry>) -> Self {
        Self { registry }
    }

    /// The registry contexts are memoised in.
    pub fn registry(&self) -> &Arc<LoadingContextRegistry> {
        &self.registry
    }

    /// Returns the loading context for `identity`, building it on first use.
    ///
    /// Concurrent calls for the same identity share one construction and
    /// receive the same `Arc`. A failed construction is not remembered.
    pub fn provision(
        &self,
        identity: &ToolchainIdentity,
    ) -> Result<Arc<LoadingContext>, ToolchainError> {
        if let Some(missing) = identity.artifacts().iter().find(|a| !a.exists()) {
            return Err(ToolchainError::ResourceNotFound {
                path: missing.clone(),
            });
        }
        if self.registry.contains(identity) {
            debug!(toolchain = %identity, "reusing loading context");
        }
        let context = self.registry.get_or_build(identity)?;
        debug!(
            toolchain = %identity,
            classes = context.class_count(),
            "loading context ready"
        );
        Ok(context)
    }

    /// Provisions the toolchain described by `spec`.
    pub fn instance(&self, spec: &ToolchainSpec) -> Result<Toolchain, ToolchainError> {
        let version: VersionNumber = spec.version.parse()?;
        let identity = spec.identity();
        info!(
            version = %spec.version,
            jars = identity.artifacts().len(),
            "provisioning compiler toolchain"
        );
        let context = self.provision(&identity)?;
        Ok(Toolchain {
            version,
            library_jar: spec.library_jar.clone(),
            compiler_jar: spec.compiler_jar.clone(),
            context,
        })
    }
}
