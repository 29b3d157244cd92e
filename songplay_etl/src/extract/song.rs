//! Song-metadata files: one JSON object per file, one song and its artist.

use std::path::Path;

use serde::Deserialize;

use crate::errors::{EtlError, EtlResult};
use crate::models::{Artist, Song};
use crate::report::FileReport;
use crate::warehouse::Warehouse;

/// Raw shape of a song-metadata record. Unknown fields (`num_songs`, ...) are ignored.
#[derive(Debug, Deserialize)]
struct SongRecord {
    song_id: String,
    title: String,
    artist_id: String,
    year: i32,
    duration: f64,
    artist_name: String,
    #[serde(default)]
    artist_location: Option<String>,
    #[serde(default)]
    artist_latitude: Option<f64>,
    #[serde(default)]
    artist_longitude: Option<f64>,
}

impl SongRecord {
    fn split(self) -> (Song, Artist) {
        let song = Song {
            song_id: self.song_id,
            title: self.title,
            artist_id: self.artist_id.clone(),
            year: self.year,
            duration: self.duration,
        };
        let artist = Artist {
            artist_id: self.artist_id,
            name: self.artist_name,
            location: self.artist_location,
            latitude: self.artist_latitude,
            longitude: self.artist_longitude,
        };
        (song, artist)
    }
}

/// Parse the first JSON value of `content` into a song and its artist.
pub fn parse_song(path: &Path, content: &str) -> EtlResult<(Song, Artist)> {
    let mut stream = serde_json::Deserializer::from_str(content).into_iter::<SongRecord>();
    match stream.next() {
        Some(Ok(record)) => Ok(record.split()),
        Some(Err(source)) => Err(EtlError::Json {
            path: path.to_path_buf(),
            line: source.line(),
            source,
        }),
        None => Err(EtlError::EmptyFile {
            path: path.to_path_buf(),
        }),
    }
}

/// Read and parse a song-metadata file.
pub fn parse_song_file(path: &Path) -> EtlResult<(Song, Artist)> {
    let content = std::fs::read_to_string(path).map_err(|source| EtlError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_song(path, &content)
}

/// Extract one song-metadata file and write its song, then its artist.
pub fn process_song_file(wh: &mut dyn Warehouse, path: &Path) -> EtlResult<FileReport> {
    let (song, artist) = parse_song_file(path)?;
    tracing::debug!(song_id = %song.song_id, artist_id = %artist.artist_id, "song record");

    wh.upsert_song(&song)?;
    wh.upsert_artist(&artist)?;

    Ok(FileReport {
        songs: 1,
        artists: 1,
        ..FileReport::default()
    })
}
