//! Error types for stardust using snafu.
//!
//! This module defines structured error types with context selectors for
//! all error conditions in the codebase.

use datafusion::error::DataFusionError;
use snafu::prelude::*;

// ============ Storage Errors ============

/// Errors that can occur during storage operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StorageError {
    /// Invalid storage URL format.
    #[snafu(display("Invalid storage URL: {url}"))]
    InvalidUrl { url: String },

    /// Object store operation failed.
    #[snafu(display("Storage operation failed"))]
    ObjectStore { source: object_store::Error },

    /// IO error during storage operations.
    #[snafu(display("IO error"))]
    Io { source: std::io::Error },

    /// S3 configuration error.
    #[snafu(display("S3 configuration error"))]
    S3Config { source: object_store::Error },

    /// Local filesystem configuration error.
    #[snafu(display("Local filesystem configuration error"))]
    LocalConfig { source: object_store::Error },
}

// ============ Config Errors ============

/// Errors that can occur during configuration parsing and validation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigError {
    /// Input path is empty.
    #[snafu(display("Input path cannot be empty"))]
    EmptyInputPath,

    /// Output path is empty.
    #[snafu(display("Output path cannot be empty"))]
    EmptyOutputPath,

    /// Environment variable interpolation failed.
    #[snafu(display("Environment variable interpolation failed:\n{message}"))]
    EnvInterpolation { message: String },

    /// Failed to parse YAML configuration.
    #[snafu(display("Failed to parse YAML configuration"))]
    YamlParse { source: serde_yaml::Error },

    /// Failed to read configuration file.
    #[snafu(display("Failed to read configuration file"))]
    ReadFile { source: std::io::Error },
}

// ============ Transform Errors ============

/// Errors that can occur while deriving the star-schema tables.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum TransformError {
    /// Failed to read raw records from storage.
    #[snafu(display("Failed to read records from {url}"))]
    ReadRecords {
        source: DataFusionError,
        url: String,
    },

    /// Failed to drop exact-duplicate rows.
    #[snafu(display("Failed to deduplicate the {dataset} records"))]
    Deduplicate {
        source: DataFusionError,
        dataset: &'static str,
    },

    /// Failed to filter the event log down to song plays.
    #[snafu(display("Failed to filter events to song plays"))]
    FilterPlays { source: DataFusionError },

    /// Failed to derive the wall-clock timestamp column.
    #[snafu(display("Failed to derive the event timestamp"))]
    DeriveTimestamp { source: DataFusionError },

    /// Failed to register a record set as a query view.
    #[snafu(display("Failed to register the {view} view"))]
    RegisterView {
        source: DataFusionError,
        view: &'static str,
    },

    /// Failed to derive an output table.
    #[snafu(display("Failed to derive the {table} table"))]
    Derive {
        source: DataFusionError,
        table: &'static str,
    },
}

// ============ Sink Errors ============

/// Errors that can occur while writing output tables.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// Failed to clear a table's previous data before overwriting.
    #[snafu(display("Failed to clear existing {table} data"))]
    ClearTable {
        source: StorageError,
        table: &'static str,
    },

    /// Failed to write a table as partitioned Parquet.
    #[snafu(display("Failed to write the {table} table"))]
    WriteTable {
        source: DataFusionError,
        table: &'static str,
    },
}

// ============ Pipeline Error (top-level) ============

/// Top-level pipeline errors that aggregate all error types.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PipelineError {
    /// Storage error.
    #[snafu(display("Storage error"))]
    PipelineStorage { source: StorageError },

    /// Configuration error.
    #[snafu(display("Configuration error"))]
    Config { source: ConfigError },

    /// Transform error.
    #[snafu(display("Transform error"))]
    Transform { source: TransformError },

    /// Sink error.
    #[snafu(display("Sink error"))]
    Sink { source: SinkError },
}
