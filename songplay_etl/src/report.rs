//! Row counters returned by extractors and the batch driver.

use std::ops::AddAssign;

/// Rows handed to the warehouse while processing one file.
///
/// Counts are writes issued, not rows that ended up new: an upsert that hits an
/// existing key still counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileReport {
    /// Song upserts.
    pub songs: usize,
    /// Artist upserts.
    pub artists: usize,
    /// Time upserts.
    pub time_rows: usize,
    /// User upserts.
    pub users: usize,
    /// Songplay inserts.
    pub songplays: usize,
    /// Songplays whose song/artist lookup found nothing.
    pub unmatched_plays: usize,
}

impl AddAssign for FileReport {
    fn add_assign(&mut self, rhs: Self) {
        self.songs += rhs.songs;
        self.artists += rhs.artists;
        self.time_rows += rhs.time_rows;
        self.users += rhs.users;
        self.songplays += rhs.songplays;
        self.unmatched_plays += rhs.unmatched_plays;
    }
}

/// Outcome of one [`crate::pipeline::process_data`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Files discovered and committed.
    pub files: usize,
    /// Sum over all files.
    pub rows: FileReport,
}

/// Outcome of a full [`crate::pipeline::run`]: song tree, then log tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EtlReport {
    /// Song-metadata batch.
    pub songs: BatchReport,
    /// Activity-log batch.
    pub logs: BatchReport,
}
