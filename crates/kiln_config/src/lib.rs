//! Parsing and validation of `kiln.toml` build configuration files.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`KilnConfig`] describing the compiler toolchain, the incremental engine
//! release, bridge coordinate overrides, compile options, cache locations,
//! and the analysis-store layout used for cross-module lookups.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE};
pub use types::*;
