//! `kiln key` and `kiln bridge`.

use tracing::info;

use crate::project;
use crate::{BridgeArgs, GlobalArgs};

/// Prints the cache key of the configured toolchain's bridge.
pub fn run_key(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = project::load(global)?;
    let toolchain = project::toolchain(&config)?;
    let cache = project::bridge_cache(&config)?;
    let key = cache.key_for(&toolchain, &project::coordinates(&config, &toolchain));
    println!("{key}");
    Ok(0)
}

/// Builds the bridge jar if the cache lacks it and prints its path.
pub fn run_bridge(
    args: &BridgeArgs,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    let config = project::load(global)?;
    let toolchain = project::toolchain(&config)?;
    info!(toolchain = %toolchain.version(), "preparing compiler bridge");
    let cache = project::bridge_cache(&config)?;
    let coordinates = project::coordinates(&config, &toolchain);
    let jar = match &args.version {
        Some(version) => cache.ensure_bridge_version(&toolchain, &coordinates, version)?,
        None => cache.ensure_bridge(&toolchain, &coordinates)?,
    };
    println!("{}", jar.display());
    Ok(0)
}
