//! stardust: a batch tool that rebuilds star-schema tables from raw JSON logs.
//!
//! This tool reads song metadata and play-event logs from object storage
//! (S3 or local filesystem), derives dimension and fact tables, and writes
//! them back as partitioned Parquet with overwrite semantics.

mod config;
mod engine;
mod error;
mod pipeline;
mod schema;
mod sink;
mod storage;
mod tables;
mod transform;

use clap::Parser;
use snafu::prelude::*;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use error::{ConfigSnafu, PipelineError};
use pipeline::run_pipeline;
use tables::Table;

/// Raw JSON logs to star-schema Parquet tables.
#[derive(Parser, Debug)]
#[command(name = "stardust")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file.
    #[arg(short, long)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Dry run - validate configuration without processing.
    #[arg(long)]
    dry_run: bool,
}

#[snafu::report]
#[tokio::main]
async fn main() -> Result<(), PipelineError> {
    let args = Args::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("stardust starting");

    let config = Config::from_file(&args.config).context(ConfigSnafu)?;

    if args.dry_run {
        info!("Dry run mode - validating configuration");
        info!("Input root: {}", config.input.path);
        info!("Output root: {}", config.output.path);
        for table in Table::ALL {
            let partitions = table.partition_columns();
            if partitions.is_empty() {
                info!("  - {}: {} (unpartitioned)", table, table.relative_path());
            } else {
                info!(
                    "  - {}: {} partitioned by {:?}",
                    table,
                    table.relative_path(),
                    partitions
                );
            }
        }
        info!("Configuration is valid");
        return Ok(());
    }

    // Run the pipeline
    let stats = run_pipeline(config).await?;

    info!("Pipeline completed successfully");
    info!("  songs rows: {}", stats.songs_rows);
    info!("  artists rows: {}", stats.artists_rows);
    info!("  users rows: {}", stats.users_rows);
    info!("  time rows: {}", stats.time_rows);
    info!("  songplays rows: {}", stats.songplays_rows);

    Ok(())
}
