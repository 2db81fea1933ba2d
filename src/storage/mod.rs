//! Object storage access for pipeline inputs and outputs.
//!
//! Parses storage URLs into backend configurations, builds the matching
//! `object_store` instances, and provides the prefix-clearing primitive the
//! sink's overwrite semantics rely on. The query engine does the actual
//! reading and writing through the stores registered here.

mod local;
mod s3;

use futures::{StreamExt, TryStreamExt};
use object_store::ObjectStore;
use object_store::path::Path;
use regex::Regex;
use snafu::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::debug;
use url::Url;

use crate::error::{InvalidUrlSnafu, ObjectStoreSnafu, StorageError};

// Re-export config types
pub use local::LocalConfig;
pub use s3::S3Config;

/// A reference-counted storage provider.
pub type StorageProviderRef = Arc<StorageProvider>;

/// Storage provider that abstracts over the supported storage backends.
#[derive(Clone)]
pub struct StorageProvider {
    pub(crate) config: BackendConfig,
    pub(crate) object_store: Arc<dyn ObjectStore>,
    /// URL the engine's object-store registry keys on. None for local paths,
    /// which the engine serves with its built-in filesystem store.
    pub(crate) register_url: Option<Url>,
    /// Normalized root used when building table URLs for the engine.
    pub(crate) engine_url: String,
}

impl std::fmt::Debug for StorageProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StorageProvider<{}>", self.engine_url)
    }
}

// URL patterns for the supported storage backends
const S3_URL: &str = r"^[sS]3[aA]?://(?P<bucket>[a-z0-9\-\.]+)(/(?P<key>.+))?$";

const FILE_URI: &str = r"^file://(?P<path>.*)$";
const FILE_PATH: &str = r"^/(?P<path>.*)$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    S3,
    Local,
}

fn matchers() -> &'static Vec<(Backend, Regex)> {
    static MATCHERS: OnceLock<Vec<(Backend, Regex)>> = OnceLock::new();
    MATCHERS.get_or_init(|| {
        vec![
            (Backend::S3, Regex::new(S3_URL).unwrap()),
            (Backend::Local, Regex::new(FILE_URI).unwrap()),
            (Backend::Local, Regex::new(FILE_PATH).unwrap()),
        ]
    })
}

/// Backend configuration enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    S3(S3Config),
    Local(LocalConfig),
}

impl BackendConfig {
    /// Parse a URL into a backend configuration.
    ///
    /// Trailing slashes are accepted and ignored, so configured roots can be
    /// written either way.
    pub fn parse_url(url: &str) -> Result<Self, StorageError> {
        let trimmed = url.trim_end_matches('/');

        for (backend, regex) in matchers() {
            if let Some(matches) = regex.captures(trimmed) {
                return match backend {
                    Backend::S3 => Self::parse_s3(matches),
                    Backend::Local => Self::parse_local(matches),
                };
            }
        }

        InvalidUrlSnafu {
            url: url.to_string(),
        }
        .fail()
    }

    fn parse_s3(matches: regex::Captures) -> Result<Self, StorageError> {
        let bucket = matches
            .name("bucket")
            .expect("bucket should always be available")
            .as_str()
            .to_string();

        let key = matches.name("key").map(|m| m.as_str().into());

        Ok(BackendConfig::S3(S3Config { bucket, key }))
    }

    fn parse_local(matches: regex::Captures) -> Result<Self, StorageError> {
        let path = matches
            .name("path")
            .expect("path regex must contain a path group")
            .as_str();

        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        Ok(BackendConfig::Local(LocalConfig { path }))
    }

    pub(crate) fn key(&self) -> Option<&Path> {
        match self {
            BackendConfig::S3(s3) => s3.key.as_ref(),
            BackendConfig::Local(_) => None,
        }
    }
}

impl StorageProvider {
    /// Create a storage provider for the given URL with storage options.
    pub async fn for_url_with_options(
        url: &str,
        options: HashMap<String, String>,
    ) -> Result<Self, StorageError> {
        let config = BackendConfig::parse_url(url)?;

        match config {
            BackendConfig::S3(config) => Self::construct_s3(config, options).await,
            BackendConfig::Local(config) => Self::construct_local(config).await,
        }
    }

    /// The object store backing this provider.
    pub fn object_store(&self) -> Arc<dyn ObjectStore> {
        self.object_store.clone()
    }

    /// URL to register with the engine's object-store registry, if the
    /// backend needs registering.
    pub fn register_url(&self) -> Option<&Url> {
        self.register_url.as_ref()
    }

    /// Normalized root for building table URLs the engine can resolve.
    pub fn engine_url(&self) -> &str {
        &self.engine_url
    }

    /// Delete every object under a prefix (relative to the provider root).
    ///
    /// Returns the number of objects removed. A prefix that does not exist
    /// yet removes nothing: overwriting a table that has never been written
    /// is not an error.
    pub async fn clear_prefix(&self, prefix: &str) -> Result<usize, StorageError> {
        let full_prefix = self.qualify_prefix(prefix);

        let mut stream = self.object_store.list(Some(&full_prefix));
        let mut locations = Vec::new();
        while let Some(meta) = stream.next().await {
            match meta {
                Ok(meta) => locations.push(Ok(meta.location)),
                // Listing a prefix that was never written is fine
                Err(object_store::Error::NotFound { .. }) => {}
                Err(source) => return Err(StorageError::ObjectStore { source }),
            }
        }

        if locations.is_empty() {
            return Ok(0);
        }

        let removed: Vec<Path> = self
            .object_store
            .delete_stream(futures::stream::iter(locations).boxed())
            .try_collect()
            .await
            .context(ObjectStoreSnafu)?;

        debug!("Removed {} objects under {}", removed.len(), full_prefix);
        Ok(removed.len())
    }

    /// Qualify a prefix with the configured key prefix.
    fn qualify_prefix(&self, prefix: &str) -> Path {
        match self.config.key() {
            Some(key) => key.parts().chain(Path::from(prefix).parts()).collect(),
            None => Path::from(prefix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_s3_url_parsing() {
        let config = BackendConfig::parse_url("s3://mybucket/path/to/data").unwrap();
        match config {
            BackendConfig::S3(s3) => {
                assert_eq!(s3.bucket, "mybucket");
                assert_eq!(s3.key, Some(Path::from("path/to/data")));
            }
            _ => panic!("Expected S3 config"),
        }
    }

    #[test]
    fn test_s3a_url_with_trailing_slash() {
        let config = BackendConfig::parse_url("s3a://mybucket/").unwrap();
        match config {
            BackendConfig::S3(s3) => {
                assert_eq!(s3.bucket, "mybucket");
                assert_eq!(s3.key, None);
            }
            _ => panic!("Expected S3 config"),
        }
    }

    #[test]
    fn test_local_url_parsing() {
        let config = BackendConfig::parse_url("/local/path/to/data").unwrap();
        match config {
            BackendConfig::Local(local) => {
                assert_eq!(local.path, "/local/path/to/data");
            }
            _ => panic!("Expected Local config"),
        }
    }

    #[test]
    fn test_file_url_parsing() {
        let config = BackendConfig::parse_url("file:///local/path/to/data").unwrap();
        match config {
            BackendConfig::Local(local) => {
                assert_eq!(local.path, "/local/path/to/data");
            }
            _ => panic!("Expected Local config"),
        }
    }

    #[test]
    fn test_invalid_url() {
        let result = BackendConfig::parse_url("gs://bucket/data");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_clear_prefix_removes_only_target_table() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();

        let songs = base.join("star_tables/dim_tables/songs/year=1969/artist_id=AR1");
        let artists = base.join("star_tables/dim_tables/artists");
        std::fs::create_dir_all(&songs).unwrap();
        std::fs::create_dir_all(&artists).unwrap();
        std::fs::write(songs.join("part-0.parquet"), b"songs data").unwrap();
        std::fs::write(artists.join("part-0.parquet"), b"artists data").unwrap();

        let storage =
            StorageProvider::for_url_with_options(base.to_str().unwrap(), HashMap::new())
                .await
                .unwrap();

        let removed = storage
            .clear_prefix("star_tables/dim_tables/songs")
            .await
            .unwrap();
        assert_eq!(removed, 1);

        assert!(!songs.join("part-0.parquet").exists());
        assert!(artists.join("part-0.parquet").exists());
    }

    #[tokio::test]
    async fn test_clear_prefix_missing_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let storage = StorageProvider::for_url_with_options(
            temp_dir.path().to_str().unwrap(),
            HashMap::new(),
        )
        .await
        .unwrap();

        let removed = storage.clear_prefix("star_tables/dim_tables/time").await.unwrap();
        assert_eq!(removed, 0);
    }
}
