#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use diesel::prelude::*;
use diesel::SqliteConnection;
use songplay_etl::schema::{artists, songplays, songs, time, users};
use songplay_etl::warehouse::DieselWarehouse;
use tempfile::TempDir;

pub struct TestEnv {
    pub dir: TempDir,           // keep alive for the life of the test
    pub db_path: String,        // <tmpdir>/warehouse.db
    pub song_data: PathBuf,     // <tmpdir>/song_data
    pub log_data: PathBuf,      // <tmpdir>/log_data
}

impl TestEnv {
    pub fn write_song(&self, rel: &str, body: &str) -> PathBuf {
        write(&self.song_data.join(rel), body)
    }

    pub fn write_log(&self, rel: &str, lines: &[String]) -> PathBuf {
        write(&self.log_data.join(rel), &lines.join("\n"))
    }
}

fn write(path: &Path, body: &str) -> PathBuf {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
    path.to_path_buf()
}

pub fn setup() -> (TestEnv, DieselWarehouse<SqliteConnection>) {
    let dir = TempDir::new().expect("tempdir");
    let db_path = dir.path().join("warehouse.db").to_string_lossy().to_string();
    let song_data = dir.path().join("song_data");
    let log_data = dir.path().join("log_data");

    let mut wh = DieselWarehouse::open_sqlite(&db_path).expect("open warehouse");
    wh.create_tables().expect("create tables");

    (
        TestEnv {
            dir,
            db_path,
            song_data,
            log_data,
        },
        wh,
    )
}

pub fn song_json(song_id: &str, title: &str, artist_id: &str, artist_name: &str, duration: f64) -> String {
    format!(
        r#"{{"num_songs": 1, "artist_id": "{artist_id}", "artist_latitude": null, "artist_longitude": null, "artist_location": "", "artist_name": "{artist_name}", "song_id": "{song_id}", "title": "{title}", "duration": {duration:?}, "year": 0}}"#
    )
}

/// A log event in the shape the client emits.
pub fn event(page: &str, ts: i64, user_id: &str, level: &str, song: &str, artist: &str, length: f64) -> String {
    format!(
        r#"{{"artist":"{artist}","auth":"Logged In","firstName":"Lily","gender":"F","itemInSession":1,"lastName":"Koch","length":{length:?},"level":"{level}","location":"Chicago-Naperville-Elgin, IL-IN-WI","method":"PUT","page":"{page}","registration":1541048010796.0,"sessionId":818,"song":"{song}","status":200,"ts":{ts},"userAgent":"Mozilla/5.0 (X11; Linux x86_64)","userId":"{user_id}"}}"#
    )
}

pub struct Counts {
    pub songs: i64,
    pub artists: i64,
    pub time: i64,
    pub users: i64,
    pub songplays: i64,
}

pub fn counts(conn: &mut SqliteConnection) -> Counts {
    Counts {
        songs: songs::table.count().get_result(conn).unwrap(),
        artists: artists::table.count().get_result(conn).unwrap(),
        time: time::table.count().get_result(conn).unwrap(),
        users: users::table.count().get_result(conn).unwrap(),
        songplays: songplays::table.count().get_result(conn).unwrap(),
    }
}
