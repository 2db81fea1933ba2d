//! Output layout contract.
//!
//! Fixed relative paths, partition columns and input globs shared by the
//! transformers and the sink. Partitioned tables use hive-style directories
//! (`year=2018/month=11/`).

use std::fmt;

/// Song metadata files sit four levels below the input root.
pub const SONG_DATA_GLOB: &str = "song-data/*/*/*/*.json";

/// Event log files sit three levels below the input root.
pub const LOG_DATA_GLOB: &str = "log_data/*/*/*.json";

/// The five output tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Songs,
    Artists,
    Users,
    Time,
    Songplays,
}

impl Table {
    pub const ALL: [Table; 5] = [
        Table::Songs,
        Table::Artists,
        Table::Users,
        Table::Time,
        Table::Songplays,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::Songs => "songs",
            Table::Artists => "artists",
            Table::Users => "users",
            Table::Time => "time",
            Table::Songplays => "songplays",
        }
    }

    /// Location of the table relative to the output root.
    pub fn relative_path(self) -> &'static str {
        match self {
            Table::Songs => "star_tables/dim_tables/songs",
            Table::Artists => "star_tables/dim_tables/artists",
            Table::Users => "star_tables/dim_tables/users",
            Table::Time => "star_tables/dim_tables/time",
            Table::Songplays => "star_tables/fact_tables/songplays",
        }
    }

    /// Hive partition columns, outermost first. Empty means unpartitioned.
    pub fn partition_columns(self) -> &'static [&'static str] {
        match self {
            Table::Songs => &["year", "artist_id"],
            Table::Time | Table::Songplays => &["year", "month"],
            Table::Artists | Table::Users => &[],
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved input and output roots, with helpers building the URLs handed
/// to the query engine.
#[derive(Debug, Clone)]
pub struct Locations {
    input_root: String,
    output_root: String,
}

impl Locations {
    pub fn new(input_root: &str, output_root: &str) -> Self {
        Self {
            input_root: input_root.trim_end_matches('/').to_string(),
            output_root: output_root.trim_end_matches('/').to_string(),
        }
    }

    /// Glob URL matching every song metadata file.
    pub fn song_data(&self) -> String {
        format!("{}/{}", self.input_root, SONG_DATA_GLOB)
    }

    /// Glob URL matching every event log file.
    pub fn log_data(&self) -> String {
        format!("{}/{}", self.input_root, LOG_DATA_GLOB)
    }

    /// Directory URL a table is written to.
    pub fn table_url(&self, table: Table) -> String {
        format!("{}/{}/", self.output_root, table.relative_path())
    }
}
