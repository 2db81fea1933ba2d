//! Table writes: overwrite, then write partitioned Parquet.
//!
//! The engine's Parquet writer only ever adds files, so overwrite semantics
//! come from clearing the table's prefix first. The two steps are not atomic;
//! a failure between them leaves the table empty rather than stale.

use datafusion::arrow::array::{RecordBatch, UInt64Array};
use datafusion::dataframe::{DataFrame, DataFrameWriteOptions};
use snafu::prelude::*;
use tracing::{debug, info};

use crate::error::{ClearTableSnafu, SinkError, WriteTableSnafu};
use crate::storage::StorageProvider;
use crate::tables::{Locations, Table};

/// Overwrite one output table with the given record set.
///
/// Returns the number of rows written.
pub async fn overwrite_table(
    df: DataFrame,
    table: Table,
    locations: &Locations,
    output: &StorageProvider,
) -> Result<u64, SinkError> {
    let removed = output
        .clear_prefix(table.relative_path())
        .await
        .context(ClearTableSnafu {
            table: table.name(),
        })?;
    if removed > 0 {
        debug!("Cleared {} objects of previous {} data", removed, table);
    }

    let partition_by: Vec<String> = table
        .partition_columns()
        .iter()
        .map(|column| column.to_string())
        .collect();

    let url = locations.table_url(table);
    let counts = df
        .write_parquet(
            &url,
            DataFrameWriteOptions::new().with_partition_by(partition_by),
            None,
        )
        .await
        .context(WriteTableSnafu {
            table: table.name(),
        })?;

    let rows = rows_written(&counts);
    info!("Wrote {} rows to {}", rows, url);
    Ok(rows)
}

/// Sum the row counts the engine reports back from a write.
fn rows_written(batches: &[RecordBatch]) -> u64 {
    batches
        .iter()
        .filter_map(|batch| batch.column_by_name("count"))
        .filter_map(|column| column.as_any().downcast_ref::<UInt64Array>())
        .map(|counts| counts.iter().flatten().sum::<u64>())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use datafusion::arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    fn count_batch(count: u64) -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![Field::new(
            "count",
            DataType::UInt64,
            false,
        )]));
        RecordBatch::try_new(schema, vec![Arc::new(UInt64Array::from(vec![count]))]).unwrap()
    }

    #[test]
    fn test_rows_written_sums_count_batches() {
        let batches = vec![count_batch(3), count_batch(7)];
        assert_eq!(rows_written(&batches), 10);
    }

    #[test]
    fn test_rows_written_empty() {
        assert_eq!(rows_written(&[]), 0);
    }
}
