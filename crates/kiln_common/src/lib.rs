//! Shared foundational types used across the Kiln build orchestration crates.
//!
//! This crate provides content hashing, the mixed-language compile order,
//! crash-safe file writes, sorted directory listing, and a keyed
//! single-flight cell used by the toolchain registry and the bridge cache.

#![warn(missing_docs)]

pub mod fs;
pub mod hash;
pub mod order;
pub mod single_flight;

pub use hash::ContentHash;
pub use order::{CompileOrder, ParseCompileOrderError};
pub use single_flight::SingleFlight;
