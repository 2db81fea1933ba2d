//! The two batch transformers that derive the star schema.
//!
//! `songs` runs first and hands its deduplicated record set to `events`,
//! which joins play events against it to build the fact table.

pub mod events;
pub mod songs;

pub use events::{EventLogStats, process_event_log};
pub use songs::{SongCatalogStats, process_song_catalog};
