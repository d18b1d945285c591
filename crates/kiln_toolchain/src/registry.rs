//! Process-wide memoisation of loading contexts.

use std::sync::Arc;

use kiln_common::SingleFlight;

use crate::context::LoadingContext;
use crate::error::ToolchainError;
use crate::identity::ToolchainIdentity;

/// Owns every [`LoadingContext`] built in this process, one per identity.
///
/// The registry is created by the composition root and handed to each
/// [`ToolchainProvisioner`](crate::ToolchainProvisioner); nothing is kept in
/// a static. Lookups for the same identity are single-flight.
#[derive(Default)]
pub struct LoadingContextRegistry {
    contexts: SingleFlight<ToolchainIdentity, Arc<LoadingContext>>,
}

impl LoadingContextRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the context for `identity`, building it on first use.
    pub fn get_or_build(
        &self,
        identity: &ToolchainIdentity,
    ) -> Result<Arc<LoadingContext>, ToolchainError> {
        self.contexts.get_or_try_init(identity, || {
            LoadingContext::build(identity.clone()).map(Arc::new)
        })
    }

    /// Number of contexts built so far.
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Returns `true` if no context has been built.
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Returns `true` if a context for `identity` has been built.
    pub fn contains(&self, identity: &ToolchainIdentity) -> bool {
        self.contexts.get(identity).is_some()
    }

    /// Drops every context. Contexts still referenced elsewhere stay alive
    /// until their last `Arc` is released.
    pub fn clear(&self) {
        self.contexts.clear();
    }
}

impl std::fmt::Debug for LoadingContextRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadingContextRegistry")
            .field("contexts", &self.len())
            .finish()
    }
}
