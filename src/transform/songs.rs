//! Song-catalog transformer.
//!
//! Derives the `songs` and `artists` dimension tables from raw song metadata
//! records (one JSON object per file, nested four levels under the input
//! root).

use datafusion::dataframe::DataFrame;
use datafusion::prelude::NdJsonReadOptions;
use snafu::prelude::*;
use tracing::info;

use crate::engine::Engine;
use crate::error::{
    DeduplicateSnafu, DeriveSnafu, PipelineError, ReadRecordsSnafu, SinkSnafu, TransformSnafu,
};
use crate::schema::song_record_schema;
use crate::sink;
use crate::storage::StorageProvider;
use crate::tables::{Locations, Table};

/// Row counts for the tables this transformer writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SongCatalogStats {
    pub songs_rows: u64,
    pub artists_rows: u64,
}

const SONGS_COLUMNS: [&str; 5] = ["song_id", "title", "artist_id", "year", "duration"];

const ARTISTS_COLUMNS: [&str; 5] = [
    "artist_id",
    "artist_name",
    "artist_location",
    "artist_latitude",
    "artist_longitude",
];

/// Build the `songs` and `artists` dimension tables.
///
/// Reads every song metadata record under the input root, drops exact
/// duplicate rows, and projects the two dimensions. Dedup is full-row on
/// purpose: catalog rows sharing a `song_id` but differing elsewhere both
/// survive, since collapsing on the key would pick a winner the upstream
/// never chose.
///
/// Returns the deduplicated record set so the event-log transformer can
/// join against it without re-reading the catalog.
pub async fn process_song_catalog(
    engine: &Engine,
    locations: &Locations,
    output: &StorageProvider,
) -> Result<(DataFrame, SongCatalogStats), PipelineError> {
    let url = locations.song_data();
    info!("Reading song metadata from {}", url);

    let schema = song_record_schema();
    let records = engine
        .ctx()
        .read_json(url.as_str(), NdJsonReadOptions::default().schema(&schema))
        .await
        .context(ReadRecordsSnafu { url: url.clone() })
        .context(TransformSnafu)?;

    // Reprocessing overlapping input partitions must not double rows
    let records = records
        .distinct()
        .context(DeduplicateSnafu {
            dataset: "song catalog",
        })
        .context(TransformSnafu)?;

    let songs = records
        .clone()
        .select_columns(&SONGS_COLUMNS)
        .and_then(|df| df.distinct())
        .context(DeriveSnafu { table: "songs" })
        .context(TransformSnafu)?;
    let songs_rows = sink::overwrite_table(songs, Table::Songs, locations, output)
        .await
        .context(SinkSnafu)?;

    let artists = records
        .clone()
        .select_columns(&ARTISTS_COLUMNS)
        .and_then(|df| df.distinct())
        .context(DeriveSnafu { table: "artists" })
        .context(TransformSnafu)?;
    let artists_rows = sink::overwrite_table(artists, Table::Artists, locations, output)
        .await
        .context(SinkSnafu)?;

    Ok((
        records,
        SongCatalogStats {
            songs_rows,
            artists_rows,
        },
    ))
}
