//! Arrow schemas for the two raw record shapes.
//!
//! Reads use explicit schemas instead of inference: a glob matching zero
//! files still plans an empty scan, and fields absent from a record surface
//! as nulls rather than inference mismatches.

use datafusion::arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use std::sync::Arc;

/// Schema of raw song metadata records.
pub fn song_record_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("num_songs", DataType::Int64, true),
        Field::new("artist_id", DataType::Utf8, true),
        Field::new("artist_latitude", DataType::Float64, true),
        Field::new("artist_longitude", DataType::Float64, true),
        Field::new("artist_location", DataType::Utf8, true),
        Field::new("artist_name", DataType::Utf8, true),
        Field::new("song_id", DataType::Utf8, true),
        Field::new("title", DataType::Utf8, true),
        Field::new("duration", DataType::Float64, true),
        Field::new("year", DataType::Int64, true),
    ]))
}

/// Schema of raw play-event log records.
///
/// `userId` is a string in the raw logs (and empty for anonymous sessions),
/// `ts` is epoch milliseconds.
pub fn log_event_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("artist", DataType::Utf8, true),
        Field::new("auth", DataType::Utf8, true),
        Field::new("firstName", DataType::Utf8, true),
        Field::new("gender", DataType::Utf8, true),
        Field::new("itemInSession", DataType::Int64, true),
        Field::new("lastName", DataType::Utf8, true),
        Field::new("length", DataType::Float64, true),
        Field::new("level", DataType::Utf8, true),
        Field::new("location", DataType::Utf8, true),
        Field::new("method", DataType::Utf8, true),
        Field::new("page", DataType::Utf8, true),
        Field::new("registration", DataType::Float64, true),
        Field::new("sessionId", DataType::Int64, true),
        Field::new("song", DataType::Utf8, true),
        Field::new("status", DataType::Int64, true),
        Field::new("ts", DataType::Int64, true),
        Field::new("userAgent", DataType::Utf8, true),
        Field::new("userId", DataType::Utf8, true),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_record_schema_shape() {
        let schema = song_record_schema();
        assert_eq!(schema.fields().len(), 10);
        assert_eq!(
            schema.field_with_name("duration").unwrap().data_type(),
            &DataType::Float64
        );
        assert_eq!(
            schema.field_with_name("year").unwrap().data_type(),
            &DataType::Int64
        );
    }

    #[test]
    fn test_log_event_schema_shape() {
        let schema = log_event_schema();
        assert_eq!(schema.fields().len(), 18);
        // String in the raw logs, not a number
        assert_eq!(
            schema.field_with_name("userId").unwrap().data_type(),
            &DataType::Utf8
        );
        assert_eq!(
            schema.field_with_name("ts").unwrap().data_type(),
            &DataType::Int64
        );
    }
}
