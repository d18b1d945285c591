//! Once-per-toolchain preparation.

use kiln_bridge::BridgeArtifactCache;
use kiln_common::CompileOrder;
use kiln_incremental::Compilers;
use kiln_toolchain::{CompilerCoordinates, ToolchainProvisioner, ToolchainSpec};
use tracing::info;

use crate::error::CompileError;

/// Provisions the toolchain described by `spec` and ensures its bridge jar.
///
/// Both steps are memoised (the toolchain in the provisioner's registry, the
/// bridge on disk), so calling this for every module of a build is cheap
/// after the first call.
pub fn prepare_compilers(
    provisioner: &ToolchainProvisioner,
    bridge_cache: &BridgeArtifactCache,
    spec: &ToolchainSpec,
    coordinates: &dyn CompilerCoordinates,
    order: CompileOrder,
) -> Result<Compilers, CompileError> {
    let toolchain = provisioner.instance(spec)?;
    let bridge_jar = bridge_cache.ensure_bridge(&toolchain, coordinates)?;
    info!("Using incremental compilation using {order} compile order");
    Ok(Compilers {
        toolchain,
        bridge_jar,
    })
}
