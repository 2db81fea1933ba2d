//! Event-log transformer.
//!
//! Derives the `users` and `time` dimension tables and the `songplays` fact
//! table from raw play-event logs, joining against the song catalog produced
//! by the song-catalog transformer.

use datafusion::arrow::datatypes::{DataType, TimeUnit};
use datafusion::dataframe::DataFrame;
use datafusion::prelude::{NdJsonReadOptions, cast, col, lit};
use snafu::prelude::*;
use tracing::info;

use crate::engine::Engine;
use crate::error::{
    DeduplicateSnafu, DeriveSnafu, DeriveTimestampSnafu, FilterPlaysSnafu, PipelineError,
    ReadRecordsSnafu, RegisterViewSnafu, SinkSnafu, TransformSnafu,
};
use crate::schema::log_event_schema;
use crate::sink;
use crate::storage::StorageProvider;
use crate::tables::{Locations, Table};

/// Row counts for the tables this transformer writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventLogStats {
    pub users_rows: u64,
    pub time_rows: u64,
    pub songplays_rows: u64,
}

/// One row per user, carrying the level from that user's most recent event.
///
/// The explicit ranking is what guarantees "latest wins" - it does not lean
/// on the engine preserving sort order through a later DISTINCT. Events with
/// an empty or missing user id never reach the ranking.
const USERS_QUERY: &str = r#"
SELECT "userId", "firstName", "lastName", gender, level
FROM (
    SELECT "userId", "firstName", "lastName", gender, level,
           ROW_NUMBER() OVER (PARTITION BY "userId" ORDER BY ts DESC) AS event_rank
    FROM log_events
    WHERE "userId" IS NOT NULL AND "userId" <> ''
) ranked
WHERE event_rank = 1
"#;

/// One row per distinct play instant, decomposed into calendar fields.
/// week is ISO week-of-year; weekday is ISO day-of-week (1 = Monday
/// through 7 = Sunday), so Sunday-based dow is rotated.
const TIME_QUERY: &str = r#"
SELECT DISTINCT
    start_time,
    CAST(date_part('hour', start_time) AS INT) AS hour,
    CAST(date_part('day', start_time) AS INT) AS day,
    CAST(date_part('week', start_time) AS INT) AS week,
    CAST(date_part('month', start_time) AS INT) AS month,
    CAST(date_part('year', start_time) AS INT) AS year,
    CAST((CAST(date_part('dow', start_time) AS INT) + 6) % 7 + 1 AS INT) AS weekday
FROM log_events
"#;

/// Fact rows require full dimensional context: an event whose song has no
/// exact (artist, title, duration) match in the catalog produces no row.
const SONGPLAYS_QUERY: &str = r#"
SELECT
    l.start_time,
    l."userId" AS user_id,
    l.level,
    s.song_id,
    s.artist_id,
    l."sessionId" AS session_id,
    l.location,
    l."userAgent" AS user_agent,
    CAST(date_part('year', l.start_time) AS INT) AS year,
    CAST(date_part('month', l.start_time) AS INT) AS month
FROM log_events l
INNER JOIN song_catalog s
    ON l.artist = s.artist_name
   AND l.song = s.title
   AND l.length = s.duration
"#;

/// Build the `users` and `time` dimension tables and the `songplays` fact
/// table.
///
/// Only `page = 'NextSong'` events count: users who never played a song do
/// not appear in `users`, and their event timestamps do not appear in
/// `time`.
pub async fn process_event_log(
    engine: &Engine,
    locations: &Locations,
    output: &StorageProvider,
    song_catalog: DataFrame,
) -> Result<EventLogStats, PipelineError> {
    let url = locations.log_data();
    info!("Reading play-event logs from {}", url);

    let ctx = engine.ctx();
    let schema = log_event_schema();
    let records = ctx
        .read_json(url.as_str(), NdJsonReadOptions::default().schema(&schema))
        .await
        .context(ReadRecordsSnafu { url: url.clone() })
        .context(TransformSnafu)?;

    let records = records
        .distinct()
        .context(DeduplicateSnafu {
            dataset: "event log",
        })
        .context(TransformSnafu)?;

    // Only actual song plays feed the derived tables
    let plays = records
        .filter(col("page").eq(lit("NextSong")))
        .context(FilterPlaysSnafu)
        .context(TransformSnafu)?;

    // Epoch milliseconds -> wall-clock instant
    let plays = plays
        .with_column(
            "start_time",
            cast(col("ts"), DataType::Timestamp(TimeUnit::Millisecond, None)),
        )
        .context(DeriveTimestampSnafu)
        .context(TransformSnafu)?;

    let _ = ctx
        .register_table("log_events", plays.into_view())
        .context(RegisterViewSnafu { view: "log_events" })
        .context(TransformSnafu)?;
    let _ = ctx
        .register_table("song_catalog", song_catalog.into_view())
        .context(RegisterViewSnafu {
            view: "song_catalog",
        })
        .context(TransformSnafu)?;

    let users = ctx
        .sql(USERS_QUERY)
        .await
        .context(DeriveSnafu { table: "users" })
        .context(TransformSnafu)?;
    let users_rows = sink::overwrite_table(users, Table::Users, locations, output)
        .await
        .context(SinkSnafu)?;

    let time = ctx
        .sql(TIME_QUERY)
        .await
        .context(DeriveSnafu { table: "time" })
        .context(TransformSnafu)?;
    let time_rows = sink::overwrite_table(time, Table::Time, locations, output)
        .await
        .context(SinkSnafu)?;

    let songplays = ctx
        .sql(SONGPLAYS_QUERY)
        .await
        .context(DeriveSnafu { table: "songplays" })
        .context(TransformSnafu)?;
    let songplays_rows = sink::overwrite_table(songplays, Table::Songplays, locations, output)
        .await
        .context(SinkSnafu)?;

    Ok(EventLogStats {
        users_rows,
        time_rows,
        songplays_rows,
    })
}
