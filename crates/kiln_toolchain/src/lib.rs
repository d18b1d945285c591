//! Provisioning of reusable compiler toolchain instances.
//!
//! A [`ToolchainIdentity`] names a compiler version and the ordered jars it
//! is loaded from. The [`ToolchainProvisioner`] turns an identity into a
//! [`LoadingContext`] (an index of every class those jars define) and
//! memoises it in a [`LoadingContextRegistry`] owned by the caller, so that
//! modules built in one process share one context per toolchain.

#![warn(missing_docs)]

pub mod context;
pub mod coordinates;
pub mod error;
pub mod identity;
pub mod provisioner;
pub mod registry;
pub mod version;

pub use context::LoadingContext;
pub use coordinates::{CompilerCoordinates, OverriddenCoordinates, ScalaCoordinates};
pub use error::ToolchainError;
pub use identity::ToolchainIdentity;
pub use provisioner::{Toolchain, ToolchainProvisioner, ToolchainSpec};
pub use registry::LoadingContextRegistry;
pub use version::VersionNumber;
