//! Local filesystem backend, used for development and tests.

use object_store::ObjectStore;
use object_store::local::LocalFileSystem;
use snafu::prelude::*;
use std::sync::Arc;

use crate::error::{IoSnafu, LocalConfigSnafu, StorageError};

use super::{BackendConfig, StorageProvider};

/// Local filesystem configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalConfig {
    pub path: String,
}

impl StorageProvider {
    pub(super) async fn construct_local(config: LocalConfig) -> Result<Self, StorageError> {
        // The prefix must exist before the store can be rooted at it
        std::fs::create_dir_all(&config.path).context(IoSnafu)?;

        let store = LocalFileSystem::new_with_prefix(&config.path).context(LocalConfigSnafu)?;
        let engine_url = config.path.clone();

        Ok(Self {
            config: BackendConfig::Local(config),
            object_store: Arc::new(store),
            register_url: None,
            engine_url,
        })
    }
}
