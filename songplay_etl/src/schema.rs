//! Diesel table definitions for the star schema.
//!
//! Kept in step with the DDL in [`crate::db::tables`].

diesel::table! {
    artists (artist_id) {
        artist_id -> Text,
        name -> Text,
        location -> Nullable<Text>,
        latitude -> Nullable<Double>,
        longitude -> Nullable<Double>,
    }
}

diesel::table! {
    songplays (start_time, user_id, session_id, songplay_id) {
        songplay_id -> BigInt,
        start_time -> Timestamp,
        user_id -> Text,
        level -> Text,
        song_id -> Nullable<Text>,
        artist_id -> Nullable<Text>,
        session_id -> BigInt,
        location -> Nullable<Text>,
        user_agent -> Nullable<Text>,
    }
}

diesel::table! {
    songs (song_id) {
        song_id -> Text,
        title -> Text,
        artist_id -> Text,
        year -> Integer,
        duration -> Double,
    }
}

diesel::table! {
    time (start_time) {
        start_time -> Timestamp,
        hour -> Integer,
        day -> Integer,
        week -> Integer,
        month -> Integer,
        year -> Integer,
        weekday -> Integer,
    }
}

diesel::table! {
    users (user_id) {
        user_id -> Text,
        first_name -> Text,
        last_name -> Text,
        gender -> Text,
        level -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(artists, songplays, songs, time, users,);
