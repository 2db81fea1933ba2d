//! Query engine session management.
//!
//! One engine handle exists per pipeline run: the orchestrator creates it,
//! both transformers share it, and it is dropped when the run finishes.
//! There is no global session and no reacquisition mid-run.

use datafusion::prelude::SessionContext;

use crate::storage::StorageProvider;

/// Scoped wrapper around the engine session.
pub struct Engine {
    ctx: SessionContext,
}

impl Engine {
    /// Create a fresh session.
    pub fn new() -> Self {
        Self {
            ctx: SessionContext::new(),
        }
    }

    /// Make a storage provider's backend reachable from engine queries.
    ///
    /// Local paths are served by the engine's built-in filesystem store and
    /// need no registration.
    pub fn register_storage(&self, storage: &StorageProvider) {
        if let Some(url) = storage.register_url() {
            self.ctx.register_object_store(url, storage.object_store());
        }
    }

    /// The underlying session context.
    pub fn ctx(&self) -> &SessionContext {
        &self.ctx
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
