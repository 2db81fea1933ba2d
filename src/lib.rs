//! stardust: A library for rebuilding star-schema tables from raw JSON logs.
//!
//! This library reads song metadata and play-event logs from object storage,
//! deduplicates them, derives four dimension tables and one fact table, and
//! writes each back as (optionally hive-partitioned) Parquet with overwrite
//! semantics.
//!
//! # Example
//!
//! ```ignore
//! use stardust::{Config, run_pipeline, error::PipelineError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), PipelineError> {
//!     let config = Config::from_file("config.yaml")?;
//!     let stats = run_pipeline(config).await?;
//!     println!("Wrote {} songplay rows", stats.songplays_rows);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod schema;
pub mod sink;
pub mod storage;
pub mod tables;
pub mod transform;

// Re-export main types
pub use config::Config;
pub use engine::Engine;
pub use pipeline::{Pipeline, RunStats, run_pipeline};
pub use storage::{StorageProvider, StorageProviderRef};
