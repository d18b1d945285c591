//! Compiler bridge artifacts: resolution, bootstrap compilation and caching.
//!
//! A bridge is a small adapter library, shipped as sources, that lets the
//! incremental engine drive one specific compiler version. The
//! [`BridgeArtifactCache`] compiles it once per
//! [`BridgeCacheKey`] and keeps the resulting jar in a shared directory.
//!
//! Resolving artifacts and running the compiler are boundaries expressed as
//! traits ([`ArtifactResolver`], [`BootstrapCompiler`]) with a local Maven
//! repository and a `java` subprocess as the shipped implementations.

#![warn(missing_docs)]

pub mod bootstrap;
pub mod cache;
pub mod error;
pub mod jar;
pub mod key;
pub mod resolver;

pub use bootstrap::{BootstrapCompiler, BootstrapRequest, ProcessBootstrapCompiler};
pub use cache::BridgeArtifactCache;
pub use error::BridgeError;
pub use jar::Manifest;
pub use key::{BridgeCacheKey, EngineRelease};
pub use resolver::{ArtifactResolver, Coordinate, LocalRepository, ResolvedArtifact, Scope};
