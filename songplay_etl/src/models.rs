//! Diesel models mapping to the star schema.
//!
//! One struct per table in [`crate::schema`]. Every row is built transiently by
//! an extractor and handed straight to a [`crate::warehouse::Warehouse`]:
//! - [`Song`] and [`Artist`] — dimensions fed by song-metadata files
//! - [`TimeRow`] and [`User`] — dimensions fed by activity logs
//! - [`Songplay`] — the fact table, one row per `NextSong` event

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::schema::*;

/// A row in [`crate::schema::songs`].
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = songs)]
pub struct Song {
    /// Primary key from the source file.
    pub song_id: String,
    /// Track title.
    pub title: String,
    /// Performing artist; see [`Artist::artist_id`].
    pub artist_id: String,
    /// Release year; `0` when unknown.
    pub year: i32,
    /// Length in seconds.
    pub duration: f64,
}

/// A row in [`crate::schema::artists`].
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = artists)]
pub struct Artist {
    /// Primary key from the source file.
    pub artist_id: String,
    /// Display name, matched against the `artist` field of log events.
    pub name: String,
    /// Free-form location, often empty in the sample data.
    pub location: Option<String>,
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
}

/// A row in [`crate::schema::time`]: calendar breakdown of one play timestamp.
///
/// All fields are derived in UTC; `week` is the ISO week and `weekday`
/// counts from Monday = 0.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = time)]
pub struct TimeRow {
    /// Natural key.
    pub start_time: NaiveDateTime,
    /// Hour of day, 0-23.
    pub hour: i32,
    /// Day of month, 1-31.
    pub day: i32,
    /// ISO 8601 week number, 1-53.
    pub week: i32,
    /// Month, 1-12.
    pub month: i32,
    /// Calendar year.
    pub year: i32,
    /// Day of week, Monday = 0 through Sunday = 6.
    pub weekday: i32,
}

/// A row in [`crate::schema::users`].
///
/// `level` is the only mutable column; the sink overwrites it on conflict.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
pub struct User {
    /// Primary key; numeric ids in the logs are stored as text.
    pub user_id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Gender code as reported by the client (e.g. "F", "M").
    pub gender: String,
    /// Subscription tier, "free" or "paid".
    pub level: String,
}

/// A row in [`crate::schema::songplays`].
///
/// `song_id` and `artist_id` stay `None` when the play could not be matched
/// to a known song.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = songplays)]
pub struct Songplay {
    /// Position of the play among the `NextSong` events of its log file.
    pub songplay_id: i64,
    /// Play timestamp; references [`TimeRow::start_time`].
    pub start_time: NaiveDateTime,
    /// References [`User::user_id`].
    pub user_id: String,
    /// Subscription tier at the time of the play.
    pub level: String,
    /// Resolved song, if any.
    pub song_id: Option<String>,
    /// Resolved artist, if any.
    pub artist_id: Option<String>,
    /// Client session identifier.
    pub session_id: i64,
    /// Client location string.
    pub location: Option<String>,
    /// Client user agent string.
    pub user_agent: Option<String>,
}

/// Result of a song lookup by title, artist name and duration.
#[derive(Debug, Clone, PartialEq, Eq, Queryable)]
pub struct SongMatch {
    /// Matched [`Song::song_id`].
    pub song_id: String,
    /// Matched [`Artist::artist_id`].
    pub artist_id: String,
}
