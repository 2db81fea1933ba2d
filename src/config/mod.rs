//! Configuration parsing and validation.
//!
//! Handles loading configuration from YAML files, with environment variable
//! interpolation for credential material.

mod vars;

use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{
    ConfigError, EmptyInputPathSnafu, EmptyOutputPathSnafu, EnvInterpolationSnafu, ReadFileSnafu,
    YamlParseSnafu,
};

/// Main configuration structure for the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root location holding the raw song metadata and event logs.
    pub input: LocationConfig,
    /// Root location the star-schema tables are written under.
    pub output: LocationConfig,
}

/// A storage root plus the options needed to reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Storage root URL or path.
    /// Examples: "s3://bucket/prefix", "/local/path/lake"
    pub path: String,

    /// Storage options (credentials, region, etc.)
    #[serde(default)]
    pub storage_options: HashMap<String, String>,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_file_with_options(path, true)
    }

    /// Load configuration from a YAML file with optional environment variable interpolation.
    pub fn from_file_with_options(
        path: impl AsRef<Path>,
        interpolate_env: bool,
    ) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).context(ReadFileSnafu)?;

        let content = if interpolate_env {
            let result = vars::interpolate(&content);
            if !result.is_ok() {
                let error_msg = result.errors.join("\n");
                return EnvInterpolationSnafu { message: error_msg }.fail();
            }
            result.text
        } else {
            content
        };

        let config: Config = serde_yaml::from_str(&content).context(YamlParseSnafu)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        ensure!(!self.input.path.is_empty(), EmptyInputPathSnafu);
        ensure!(!self.output.path.is_empty(), EmptyOutputPathSnafu);
        Ok(())
    }
}
