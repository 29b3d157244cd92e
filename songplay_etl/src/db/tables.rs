//! Star-schema DDL.
//!
//! Plain `IF [NOT] EXISTS` statements accepted by both SQLite and PostgreSQL.
//! Types mirror [`crate::schema`]; the `songplays` composite key is what makes
//! a rerun over the same log file a no-op.

use diesel::connection::SimpleConnection;

use crate::errors::EtlResult;

/// Statements creating the five tables, dimensions first.
pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS songs (
    song_id    VARCHAR PRIMARY KEY,
    title      VARCHAR NOT NULL,
    artist_id  VARCHAR NOT NULL,
    year       INTEGER NOT NULL,
    duration   DOUBLE PRECISION NOT NULL
);

CREATE TABLE IF NOT EXISTS artists (
    artist_id  VARCHAR PRIMARY KEY,
    name       VARCHAR NOT NULL,
    location   VARCHAR,
    latitude   DOUBLE PRECISION,
    longitude  DOUBLE PRECISION
);

CREATE TABLE IF NOT EXISTS time (
    start_time TIMESTAMP PRIMARY KEY,
    hour       INTEGER NOT NULL,
    day        INTEGER NOT NULL,
    week       INTEGER NOT NULL,
    month      INTEGER NOT NULL,
    year       INTEGER NOT NULL,
    weekday    INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    user_id    VARCHAR PRIMARY KEY,
    first_name VARCHAR NOT NULL,
    last_name  VARCHAR NOT NULL,
    gender     VARCHAR NOT NULL,
    level      VARCHAR NOT NULL
);

CREATE TABLE IF NOT EXISTS songplays (
    songplay_id BIGINT NOT NULL,
    start_time  TIMESTAMP NOT NULL REFERENCES time (start_time),
    user_id     VARCHAR NOT NULL REFERENCES users (user_id),
    level       VARCHAR NOT NULL,
    song_id     VARCHAR REFERENCES songs (song_id),
    artist_id   VARCHAR REFERENCES artists (artist_id),
    session_id  BIGINT NOT NULL,
    location    VARCHAR,
    user_agent  VARCHAR,
    PRIMARY KEY (start_time, user_id, session_id, songplay_id)
);
";

/// Statements dropping the five tables, fact table first.
pub const DROP_TABLES: &str = "
DROP TABLE IF EXISTS songplays;
DROP TABLE IF EXISTS users;
DROP TABLE IF EXISTS time;
DROP TABLE IF EXISTS artists;
DROP TABLE IF EXISTS songs;
";

/// Create any missing table. Existing tables and their rows are left alone.
pub fn create_tables<C: SimpleConnection>(conn: &mut C) -> EtlResult<()> {
    conn.batch_execute(CREATE_TABLES)?;
    Ok(())
}

/// Drop all five tables and their data.
pub fn drop_tables<C: SimpleConnection>(conn: &mut C) -> EtlResult<()> {
    conn.batch_execute(DROP_TABLES)?;
    Ok(())
}

/// Drop and recreate all tables, leaving an empty warehouse.
pub fn reset_tables<C: SimpleConnection>(conn: &mut C) -> EtlResult<()> {
    drop_tables(conn)?;
    create_tables(conn)
}
