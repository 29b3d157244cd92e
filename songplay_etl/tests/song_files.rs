mod common;
use common::{counts, setup, song_json};

use diesel::prelude::*;
use songplay_etl::extract::song::process_song_file;
use songplay_etl::models::{Artist, Song};
use songplay_etl::pipeline::process_data;
use songplay_etl::schema::{artists, songs};
use songplay_etl::warehouse::Warehouse;

#[test]
fn song_file_yields_one_song_and_one_artist() {
    let (env, mut wh) = setup();
    env.write_song(
        "A/A/A/TRAAAAW128F429D538.json",
        r#"{"song_id":"S1","title":"T","artist_id":"A1","year":2000,"duration":180.5,"artist_name":"N","artist_location":"L","artist_latitude":1.0,"artist_longitude":2.0}"#,
    );

    let report = process_data(&mut wh, &env.song_data, process_song_file).expect("song batch");
    assert_eq!(report.files, 1);
    assert_eq!((report.rows.songs, report.rows.artists), (1, 1));

    let conn = wh.connection();
    let stored_songs: Vec<Song> = songs::table.select(Song::as_select()).load(conn).unwrap();
    assert_eq!(
        stored_songs,
        vec![Song {
            song_id: "S1".into(),
            title: "T".into(),
            artist_id: "A1".into(),
            year: 2000,
            duration: 180.5,
        }]
    );

    let stored_artists: Vec<Artist> = artists::table.select(Artist::as_select()).load(conn).unwrap();
    assert_eq!(
        stored_artists,
        vec![Artist {
            artist_id: "A1".into(),
            name: "N".into(),
            location: Some("L".into()),
            latitude: Some(1.0),
            longitude: Some(2.0),
        }]
    );
}

#[test]
fn rerunning_a_song_file_is_idempotent() {
    let (env, mut wh) = setup();
    let path = env.write_song("S1.json", &song_json("S1", "Title", "A1", "Artist", 99.5));

    for _ in 0..2 {
        wh.begin().unwrap();
        process_song_file(&mut wh, &path).expect("extract");
        wh.commit().unwrap();
    }

    let c = counts(wh.connection());
    assert_eq!((c.songs, c.artists), (1, 1));
}

#[test]
fn artists_shared_by_songs_are_stored_once() {
    let (env, mut wh) = setup();
    env.write_song("a.json", &song_json("S1", "One", "A1", "Artist", 100.0));
    env.write_song("b.json", &song_json("S2", "Two", "A1", "Artist", 200.0));

    let report = process_data(&mut wh, &env.song_data, process_song_file).unwrap();
    assert_eq!(report.files, 2);

    let c = counts(wh.connection());
    assert_eq!((c.songs, c.artists), (2, 1));
}
