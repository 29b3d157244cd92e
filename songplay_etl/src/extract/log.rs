//! Activity-log files: newline-delimited JSON events.
//!
//! Only `NextSong` events are kept. Each one yields a [`TimeRow`], a [`User`] and a
//! [`Songplay`]; the rows are written in three passes (all time rows, then all users,
//! then the fact rows) so that every songplay finds its dimensions already stored.
//! A bad line fails the whole file before anything is written.

use std::path::Path;

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Deserializer};

use crate::errors::{EtlError, EtlResult};
use crate::models::{Songplay, TimeRow, User};
use crate::report::FileReport;
use crate::warehouse::Warehouse;

/// `page` value of a song-play event.
pub const NEXT_SONG: &str = "NextSong";

/// Raw shape of one log line. Everything but `page` is optional here, since
/// non-play events (logins, page views) omit most fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    page: String,
    ts: Option<i64>,
    #[serde(default, deserialize_with = "flexible_id")]
    user_id: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    gender: Option<String>,
    level: Option<String>,
    song: Option<String>,
    artist: Option<String>,
    length: Option<f64>,
    session_id: Option<i64>,
    location: Option<String>,
    user_agent: Option<String>,
}

/// Ids show up both as JSON strings and numbers depending on the log producer.
fn flexible_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<Id>::deserialize(deserializer)?.map(|id| match id {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Float(f) => f.to_string(),
    }))
}

/// A validated `NextSong` event.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayEvent {
    /// Play time, UTC.
    pub start_time: NaiveDateTime,
    /// Listener id.
    pub user_id: String,
    /// Listener given name.
    pub first_name: String,
    /// Listener family name.
    pub last_name: String,
    /// Listener gender code.
    pub gender: String,
    /// Subscription tier at play time.
    pub level: String,
    /// Song title as reported by the client.
    pub song: String,
    /// Artist name as reported by the client.
    pub artist: String,
    /// Track length in seconds.
    pub length: f64,
    /// Client session id.
    pub session_id: i64,
    /// Client location.
    pub location: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
}

impl PlayEvent {
    fn from_raw(raw: RawEvent, path: &Path, line: usize) -> EtlResult<Self> {
        let missing = |field: &'static str| EtlError::MissingField {
            path: path.to_path_buf(),
            line,
            field,
        };

        let ts = raw.ts.ok_or_else(|| missing("ts"))?;
        let start_time = timestamp_from_millis(ts).ok_or_else(|| EtlError::InvalidTimestamp {
            path: path.to_path_buf(),
            line,
            ts,
        })?;

        Ok(Self {
            start_time,
            user_id: raw.user_id.ok_or_else(|| missing("userId"))?,
            first_name: raw.first_name.ok_or_else(|| missing("firstName"))?,
            last_name: raw.last_name.ok_or_else(|| missing("lastName"))?,
            gender: raw.gender.ok_or_else(|| missing("gender"))?,
            level: raw.level.ok_or_else(|| missing("level"))?,
            song: raw.song.ok_or_else(|| missing("song"))?,
            artist: raw.artist.ok_or_else(|| missing("artist"))?,
            length: raw.length.ok_or_else(|| missing("length"))?,
            session_id: raw.session_id.ok_or_else(|| missing("sessionId"))?,
            location: raw.location,
            user_agent: raw.user_agent,
        })
    }

    /// Time-dimension row for this play.
    pub fn time_row(&self) -> TimeRow {
        time_row(self.start_time)
    }

    /// User-dimension row for this play.
    pub fn user(&self) -> User {
        User {
            user_id: self.user_id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            gender: self.gender.clone(),
            level: self.level.clone(),
        }
    }

    /// Fact row for this play, given its position in the file and the lookup result.
    pub fn songplay(
        &self,
        songplay_id: i64,
        song_id: Option<String>,
        artist_id: Option<String>,
    ) -> Songplay {
        Songplay {
            songplay_id,
            start_time: self.start_time,
            user_id: self.user_id.clone(),
            level: self.level.clone(),
            song_id,
            artist_id,
            session_id: self.session_id,
            location: self.location.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Epoch milliseconds to a naive UTC timestamp; `None` when out of range.
pub fn timestamp_from_millis(ts: i64) -> Option<NaiveDateTime> {
    DateTime::<Utc>::from_timestamp_millis(ts).map(|dt| dt.naive_utc())
}

/// Calendar breakdown of a UTC timestamp.
pub fn time_row(start_time: NaiveDateTime) -> TimeRow {
    TimeRow {
        start_time,
        hour: start_time.hour() as i32,
        day: start_time.day() as i32,
        week: start_time.iso_week().week() as i32,
        month: start_time.month() as i32,
        year: start_time.year(),
        weekday: start_time.weekday().num_days_from_monday() as i32,
    }
}

/// Parse newline-delimited events and keep the validated `NextSong` ones, in file order.
pub fn parse_log(path: &Path, content: &str) -> EtlResult<Vec<PlayEvent>> {
    let mut plays = Vec::new();
    for (idx, text) in content.lines().enumerate() {
        let line = idx + 1;
        if text.trim().is_empty() {
            continue;
        }
        let raw: RawEvent = serde_json::from_str(text).map_err(|source| EtlError::Json {
            path: path.to_path_buf(),
            line,
            source,
        })?;
        if raw.page != NEXT_SONG {
            continue;
        }
        plays.push(PlayEvent::from_raw(raw, path, line)?);
    }
    Ok(plays)
}

/// Read and parse an activity-log file.
pub fn parse_log_file(path: &Path) -> EtlResult<Vec<PlayEvent>> {
    let content = std::fs::read_to_string(path).map_err(|source| EtlError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_log(path, &content)
}

/// Extract one activity-log file into time, user and songplay rows.
pub fn process_log_file(wh: &mut dyn Warehouse, path: &Path) -> EtlResult<FileReport> {
    let plays = parse_log_file(path)?;
    let mut report = FileReport::default();

    for play in &plays {
        wh.upsert_time(&play.time_row())?;
        report.time_rows += 1;
    }

    for play in &plays {
        wh.upsert_user(&play.user())?;
        report.users += 1;
    }

    for (index, play) in plays.iter().enumerate() {
        let found = wh.find_song(&play.song, &play.artist, play.length)?;
        let (song_id, artist_id) = match found {
            Some(m) => (Some(m.song_id), Some(m.artist_id)),
            None => {
                report.unmatched_plays += 1;
                (None, None)
            }
        };
        tracing::debug!(
            index,
            song = %play.song,
            matched = song_id.is_some(),
            "songplay"
        );
        wh.insert_songplay(&play.songplay(index as i64, song_id, artist_id))?;
        report.songplays += 1;
    }

    Ok(report)
}
